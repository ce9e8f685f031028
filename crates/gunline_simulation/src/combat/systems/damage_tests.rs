//! Tests for damage systems.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use super::super::damage::{apply_hitscan_damage, mark_dead};
    use crate::combat::{DamageDealt, Dead, EntityDied, HitscanDamage};
    use crate::components::Health;

    fn damage_app() -> App {
        let mut app = App::new();
        app.add_event::<HitscanDamage>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>();
        app.add_systems(Update, (apply_hitscan_damage, mark_dead).chain());
        app
    }

    fn hit(shooter: Entity, target: Entity, amount: f32) -> HitscanDamage {
        HitscanDamage {
            shooter,
            target,
            amount,
            point: Vec3::new(0.0, 1.0, -5.0),
            normal: Vec3::Z,
        }
    }

    #[test]
    fn test_damage_reduces_health() {
        let mut app = damage_app();
        let shooter = app.world_mut().spawn_empty().id();
        let target = app.world_mut().spawn(Health::new(100.0)).id();

        app.world_mut().send_event(hit(shooter, target, 30.0));
        app.update();

        assert_eq!(app.world().get::<Health>(target).unwrap().current, 70.0);
        assert!(app.world().get::<Dead>(target).is_none());

        let dealt: Vec<_> = app
            .world_mut()
            .resource_mut::<Events<DamageDealt>>()
            .drain()
            .collect();
        assert_eq!(dealt.len(), 1);
        assert_eq!(dealt[0].impact_point, Vec3::new(0.0, 1.0, -5.0));
        assert!(!dealt[0].target_died);
    }

    #[test]
    fn test_lethal_damage_marks_dead_once() {
        let mut app = damage_app();
        let shooter = app.world_mut().spawn_empty().id();
        let target = app.world_mut().spawn(Health::new(40.0)).id();

        app.world_mut().send_event(hit(shooter, target, 25.0));
        app.world_mut().send_event(hit(shooter, target, 25.0));
        app.world_mut().send_event(hit(shooter, target, 25.0));
        app.update();

        assert_eq!(app.world().get::<Health>(target).unwrap().current, 0.0);
        assert!(app.world().get::<Dead>(target).is_some());

        let died: Vec<_> = app
            .world_mut()
            .resource_mut::<Events<EntityDied>>()
            .drain()
            .collect();
        // Overkill не порождает повторную смерть
        assert_eq!(died.len(), 1);
        assert_eq!(died[0].killer, Some(shooter));
    }

    #[test]
    fn test_self_damage_ignored() {
        let mut app = damage_app();
        let shooter = app.world_mut().spawn(Health::new(100.0)).id();

        app.world_mut().send_event(hit(shooter, shooter, 50.0));
        app.update();

        assert_eq!(app.world().get::<Health>(shooter).unwrap().current, 100.0);
    }

    #[test]
    fn test_despawned_target_skipped() {
        let mut app = damage_app();
        let shooter = app.world_mut().spawn_empty().id();
        let target = app.world_mut().spawn(Health::new(100.0)).id();
        app.world_mut().despawn(target);

        app.world_mut().send_event(hit(shooter, target, 30.0));
        app.update();

        let dealt = app.world().resource::<Events<DamageDealt>>();
        assert!(dealt.is_empty());
    }
}

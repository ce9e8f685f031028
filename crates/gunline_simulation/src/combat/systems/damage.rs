//! Damage systems (hit-scan → Health).

use bevy::prelude::*;

use crate::combat::{Damageable, DamageDealt, Dead, EntityDied, HitscanDamage};
use crate::components::Health;
use crate::logger;

/// System: HitscanDamage → Health
///
/// Цель могла исчезнуть между выстрелом и обработкой - это её забота,
/// событие просто пропускается (без ретраев).
pub fn apply_hitscan_damage(
    mut hits: EventReader<HitscanDamage>,
    mut targets: Query<&mut Health>,
    mut dealt: EventWriter<DamageDealt>,
    mut died: EventWriter<EntityDied>,
) {
    for hit in hits.read() {
        // Ray cast уже исключает стрелка, но self-damage не пропускаем никогда
        if hit.shooter == hit.target {
            logger::log_warning(&format!(
                "⚠️ SELF-HIT ignored: weapon {:?} hit itself",
                hit.shooter
            ));
            continue;
        }

        let Ok(mut health) = targets.get_mut(hit.target) else {
            continue;
        };

        let was_alive = health.is_alive();
        health.apply_damage(hit.amount, hit.point, hit.normal);
        let target_died = was_alive && !health.is_alive();

        dealt.write(DamageDealt {
            attacker: hit.shooter,
            target: hit.target,
            amount: hit.amount,
            impact_point: hit.point,
            impact_normal: hit.normal,
            target_died,
        });

        logger::log(&format!(
            "💥 {:?} hit {:?} for {} (HP: {})",
            hit.shooter, hit.target, hit.amount, health.current
        ));

        if target_died {
            died.write(EntityDied {
                entity: hit.target,
                killer: Some(hit.shooter),
            });
        }
    }
}

/// System: EntityDied → маркер Dead
pub fn mark_dead(mut commands: Commands, mut deaths: EventReader<EntityDied>) {
    for death in deaths.read() {
        if let Ok(mut entity_commands) = commands.get_entity(death.entity) {
            entity_commands.insert(Dead);
            logger::log_info(&format!(
                "Entity {:?} killed by {:?}",
                death.entity, death.killer
            ));
        }
    }
}

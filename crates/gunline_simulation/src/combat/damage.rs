//! Damage events
//!
//! HitscanDamage (weapon) → apply_hitscan_damage → Health → DamageDealt / EntityDied.
//! Используются для UI, hit markers, звуков.

use bevy::prelude::*;

/// Событие: урон нанесен
#[derive(Event, Debug, Clone, Copy)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub amount: f32,
    pub impact_point: Vec3,
    pub impact_normal: Vec3,
    pub target_died: bool,
}

/// Событие: entity умер (health <= 0)
#[derive(Event, Debug, Clone, Copy)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Компонент-маркер: entity мертв (Health <= 0)
///
/// Деспавн не автоматический - мишени остаются на месте.
#[derive(Component, Debug)]
pub struct Dead;

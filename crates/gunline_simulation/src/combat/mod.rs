//! Combat module (hit-scan weapons)
//!
//! Ядро (без ECS):
//! - `WeaponController`: FSM Ready/Empty/Reloading, ammo, rate limit, deadlines
//! - `HitscanQuery` + `Damageable`: ray cast и capability цели
//! - `WeaponProfile`: параметры оружия (JSON)
//!
//! ECS слой:
//! - `Weapon` component, intents (FireIntent/ReloadIntent), feedback events
//! - Host ставит `HitscanWorld` (ray cast backend) - ECS физику не владеет

use bevy::prelude::*;

pub mod controller;
pub mod damage;
pub mod deferred;
pub mod error;
pub mod hitscan;
pub mod profile;
pub mod systems;
pub mod weapon;


// Re-export основных типов
pub use controller::{
    ReloadCompleted, ReloadScheduled, ShotFired, TickReport, Tracer, WeaponController,
    WeaponState, WeaponStatus,
};
pub use damage::{DamageDealt, Dead, EntityDied};
pub use deferred::{take_due, Deferred};
pub use error::{ProfileError, WeaponError};
pub use hitscan::{Damageable, HitscanQuery, Muzzle, RayHit};
pub use profile::WeaponProfile;
pub use weapon::{
    EntityHitscan, EquipWeapon, FireIntent, HitscanDamage, HitscanWorld, HolsterWeapon,
    PendingDamage, ReloadCancelled, ReloadFinished, ReloadIntent, ReloadStarted, TracerExpired,
    Weapon, WeaponFired, WorldRayHit, WorldRaycast,
};

/// Combat Plugin
///
/// Регистрирует weapon/damage системы в FixedUpdate.
///
/// Порядок выполнения:
/// 1. activate_weapons - initialize для новых Weapon
/// 2. holster_weapons / equip_weapons - teardown / re-initialize
/// 3. tick_weapons - reload completion, tracer expiry
/// 4. process_reload_intents
/// 5. process_fire_intents - hit-scan → HitscanDamage
/// 6. apply_hitscan_damage - Health → DamageDealt / EntityDied
/// 7. mark_dead
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<FireIntent>()
            .add_event::<ReloadIntent>()
            .add_event::<EquipWeapon>()
            .add_event::<HolsterWeapon>()
            .add_event::<WeaponFired>()
            .add_event::<TracerExpired>()
            .add_event::<ReloadStarted>()
            .add_event::<ReloadFinished>()
            .add_event::<ReloadCancelled>()
            .add_event::<HitscanDamage>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>();

        // Без host backend каждый выстрел - промах
        app.init_resource::<HitscanWorld>();

        app.add_systems(
            FixedUpdate,
            (
                // Фаза 1: Lifecycle
                systems::activate_weapons,
                systems::holster_weapons,
                systems::equip_weapons,

                // Фаза 2: Deadlines (до intents)
                systems::tick_weapons,

                // Фаза 3: Intents
                systems::process_reload_intents,
                systems::process_fire_intents,

                // Фаза 4: Damage + death
                systems::apply_hitscan_damage,
                systems::mark_dead,
            )
                .chain(), // Последовательное выполнение
        );
    }
}

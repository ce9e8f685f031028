//! Gunline Simulation Core
//!
//! Hit-scan оружие на Bevy 0.16 ECS (headless, детерминированно).
//!
//! Разделение ответственности:
//! - ECS = game state (ammo, reload deadlines, Health) и правила стрельбы
//! - Host = physics (ray cast через `WorldRaycast`), rendering трассеров, звук

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod combat;
pub mod components;
pub mod config;
pub mod logger;

// Re-export базовых типов для удобства
pub use combat::{
    CombatPlugin, DamageDealt, Damageable, Dead, EntityDied, EquipWeapon, FireIntent,
    HitscanQuery, HitscanWorld, HolsterWeapon, Muzzle, RayHit, ReloadCancelled, ReloadFinished,
    ReloadIntent, ReloadStarted, TracerExpired, Weapon, WeaponController, WeaponError,
    WeaponFired, WeaponProfile, WeaponState, WorldRayHit, WorldRaycast,
};
pub use components::*;
pub use config::{ConfigError, SimulationConfig};
pub use logger::{init_logger, LogLevel};

/// Частота fixed tick по умолчанию
pub const DEFAULT_TICK_HZ: f64 = 60.0;

/// Главный plugin симуляции
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Seed мог поставить create_headless_app - не перетираем
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        if !app.world().contains_resource::<Time<Fixed>>() {
            app.insert_resource(Time::<Fixed>::from_hz(DEFAULT_TICK_HZ));
        }

        app.add_plugins(CombatPlugin);
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Возвращает App БЕЗ SimulationPlugin - вызывающий добавляет его сам
/// (после того как поставил свой `HitscanWorld` / Time strategy).
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(DEFAULT_TICK_HZ));

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Debug-представление достаточно для побайтового сравнения
    let mut snapshot = Vec::new();
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}

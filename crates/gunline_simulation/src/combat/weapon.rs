//! Weapon ECS layer - component, events, host ray-cast seam
//!
//! Architecture:
//! - ECS: `Weapon` component владеет `WeaponController` (ammo, state, deadlines)
//! - Host (physics engine): реализует `WorldRaycast`, ставит `HitscanWorld` resource
//! - Events: FireIntent/ReloadIntent (input → ECS), WeaponFired/Reload* (ECS → VFX/audio),
//!   HitscanDamage (weapon → damage system)

use bevy::prelude::*;

use super::controller::WeaponController;
use super::hitscan::{Damageable, HitscanQuery, RayHit};
use super::profile::WeaponProfile;

/// Оружие на entity (transform entity = muzzle)
///
/// Controller инициализируется системой `activate_weapons` при добавлении компонента.
#[derive(Component, Debug, Clone)]
pub struct Weapon {
    pub controller: WeaponController,
}

impl Weapon {
    pub fn new(profile: WeaponProfile) -> Self {
        Self {
            controller: WeaponController::new(profile),
        }
    }
}

// === Input events (host → ECS) ===

/// Event: стрелок ХОЧЕТ выстрелить в этот tick
#[derive(Event, Debug, Clone, Copy)]
pub struct FireIntent {
    /// Entity с `Weapon`
    pub shooter: Entity,
}

/// Event: стрелок хочет перезарядиться
#[derive(Event, Debug, Clone, Copy)]
pub struct ReloadIntent {
    pub shooter: Entity,
}

/// Event: достать оружие (reactivation → initialize)
#[derive(Event, Debug, Clone, Copy)]
pub struct EquipWeapon {
    pub weapon: Entity,
}

/// Event: убрать оружие (deactivation → teardown, reload отменяется)
#[derive(Event, Debug, Clone, Copy)]
pub struct HolsterWeapon {
    pub weapon: Entity,
}

// === Feedback events (ECS → presentation) ===

/// Event: выстрел произошёл (muzzle flash, shell eject, gunshot, tracer)
#[derive(Event, Debug, Clone, Copy)]
pub struct WeaponFired {
    pub shooter: Entity,
    pub origin: Vec3,
    /// Точка попадания или конец луча
    pub impact_point: Vec3,
    /// Нормаль поверхности (None = промах)
    pub impact_normal: Option<Vec3>,
    /// Во что попали (любая entity, не только damageable)
    pub hit_entity: Option<Entity>,
    pub magazine_ammo: u32,
    /// Когда спрятать трассер (дублируется событием TracerExpired)
    pub tracer_hide_at: f32,
}

/// Event: трассер пора скрыть
#[derive(Event, Debug, Clone, Copy)]
pub struct TracerExpired {
    pub shooter: Entity,
}

/// Event: перезарядка началась (reload sound)
#[derive(Event, Debug, Clone, Copy)]
pub struct ReloadStarted {
    pub shooter: Entity,
    pub completes_at: f32,
}

/// Event: перезарядка завершилась
#[derive(Event, Debug, Clone, Copy)]
pub struct ReloadFinished {
    pub shooter: Entity,
    pub loaded: u32,
    pub magazine_ammo: u32,
    pub reserve_ammo: u32,
}

/// Event: перезарядка отменена (оружие убрали посреди reload)
#[derive(Event, Debug, Clone, Copy)]
pub struct ReloadCancelled {
    pub shooter: Entity,
}

/// Event: hit-scan попал в damageable entity (weapon → damage system)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct HitscanDamage {
    pub shooter: Entity,
    pub target: Entity,
    pub amount: f32,
    pub point: Vec3,
    pub normal: Vec3,
}

// === Host ray-cast seam ===

/// Попадание луча в world geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldRayHit {
    pub entity: Entity,
    pub point: Vec3,
    pub normal: Vec3,
}

/// Ray cast, который предоставляет host (physics engine)
///
/// Реализация ОБЯЗАНА игнорировать `exclude` (collider самого стрелка).
pub trait WorldRaycast: Send + Sync + 'static {
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Dir3,
        max_range: f32,
        exclude: Entity,
    ) -> Option<WorldRayHit>;
}

/// Мир без геометрии: каждый выстрел - промах
struct EmptyWorld;

impl WorldRaycast for EmptyWorld {
    fn cast_ray(&self, _: Vec3, _: Dir3, _: f32, _: Entity) -> Option<WorldRayHit> {
        None
    }
}

/// Resource: текущий ray-cast backend
#[derive(Resource)]
pub struct HitscanWorld {
    raycast: Box<dyn WorldRaycast>,
}

impl Default for HitscanWorld {
    fn default() -> Self {
        Self::new(EmptyWorld)
    }
}

impl HitscanWorld {
    pub fn new(raycast: impl WorldRaycast) -> Self {
        Self {
            raycast: Box::new(raycast),
        }
    }

    pub fn cast_ray(
        &self,
        origin: Vec3,
        direction: Dir3,
        max_range: f32,
        exclude: Entity,
    ) -> Option<WorldRayHit> {
        self.raycast.cast_ray(origin, direction, max_range, exclude)
    }
}

/// Damage handle на ECS entity: кладёт `HitscanDamage` в очередь
pub struct PendingDamage<'a> {
    shooter: Entity,
    target: Entity,
    queue: &'a mut Vec<HitscanDamage>,
}

impl Damageable for PendingDamage<'_> {
    fn apply_damage(&mut self, amount: f32, point: Vec3, normal: Vec3) {
        self.queue.push(HitscanDamage {
            shooter: self.shooter,
            target: self.target,
            amount,
            point,
            normal,
        });
    }
}

/// `HitscanQuery` поверх `HitscanWorld` для одного выстрела
///
/// Capability lookup ("у попавшего есть Damageable?") резолвится здесь
/// через `is_damageable`, а не в weapon.
pub struct EntityHitscan<'a, F> {
    world: &'a HitscanWorld,
    shooter: Entity,
    is_damageable: F,
    queue: &'a mut Vec<HitscanDamage>,
    last_hit: Option<Entity>,
}

impl<'a, F: Fn(Entity) -> bool> EntityHitscan<'a, F> {
    pub fn new(
        world: &'a HitscanWorld,
        shooter: Entity,
        is_damageable: F,
        queue: &'a mut Vec<HitscanDamage>,
    ) -> Self {
        Self {
            world,
            shooter,
            is_damageable,
            queue,
            last_hit: None,
        }
    }

    /// Entity, в которую попал последний cast
    pub fn last_hit(&self) -> Option<Entity> {
        self.last_hit
    }
}

impl<F: Fn(Entity) -> bool> HitscanQuery for EntityHitscan<'_, F> {
    type Target<'t> = PendingDamage<'t> where Self: 't;

    fn cast(
        &mut self,
        origin: Vec3,
        direction: Dir3,
        max_range: f32,
    ) -> Option<RayHit<Self::Target<'_>>> {
        let hit = self
            .world
            .cast_ray(origin, direction, max_range, self.shooter)?;
        self.last_hit = Some(hit.entity);

        if hit.entity == self.shooter || !(self.is_damageable)(hit.entity) {
            return Some(RayHit::surface(hit.point, hit.normal));
        }

        Some(RayHit::with_target(
            hit.point,
            hit.normal,
            PendingDamage {
                shooter: self.shooter,
                target: hit.entity,
                queue: &mut *self.queue,
            },
        ))
    }
}

//! Headless shooting range
//!
//! Стрелок в центре, мишени на seeded позициях. Каждый tick стрелок
//! целится в ближайшую живую мишень (с разбросом), стреляет, перезаряжается.
//!
//! Env: GUNLINE_SEED, GUNLINE_TICKS, GUNLINE_TICK_HZ, GUNLINE_PROFILE, GUNLINE_LOG_LEVEL

use std::time::Duration;

use bevy::math::bounding::{BoundingSphere, RayCast3d};
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::Rng;

use gunline_simulation::combat::systems::{apply_hitscan_damage, tick_weapons};
use gunline_simulation::logger::{self, set_log_level};
use gunline_simulation::{
    create_headless_app, Dead, DeterministicRng, EntityDied, FireIntent, Health, HitscanWorld,
    ReloadIntent, ShootingTarget, SimulationConfig, SimulationPlugin, Weapon, WeaponState,
    WorldRayHit, WorldRaycast,
};

const TARGET_COUNT: usize = 5;
const TARGET_RADIUS: f32 = 0.5;
const TARGET_HEALTH: f32 = 60.0;
/// Максимальное отклонение точки прицеливания от центра мишени
const AIM_SPREAD: f32 = 0.6;
const SHOOTER_POSITION: Vec3 = Vec3::new(0.0, 1.5, 0.0);

/// Ray cast по сферам живых мишеней
///
/// Мишени статичны: снимок строится при старте и пересобирается при каждой смерти.
struct TargetSpheres {
    targets: Vec<(Entity, BoundingSphere)>,
}

impl TargetSpheres {
    fn new(targets: impl IntoIterator<Item = (Entity, Vec3)>) -> Self {
        Self {
            targets: targets
                .into_iter()
                .map(|(entity, center)| (entity, BoundingSphere::new(center, TARGET_RADIUS)))
                .collect(),
        }
    }
}

impl WorldRaycast for TargetSpheres {
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Dir3,
        max_range: f32,
        exclude: Entity,
    ) -> Option<WorldRayHit> {
        let ray = RayCast3d::from_ray(Ray3d::new(origin, direction), max_range);

        self.targets
            .iter()
            .filter(|(entity, _)| *entity != exclude)
            .filter_map(|(entity, sphere)| {
                ray.sphere_intersection_at(sphere)
                    .map(|distance| (*entity, sphere, distance))
            })
            .min_by(|a, b| a.2.total_cmp(&b.2))
            .map(|(entity, sphere, distance)| {
                let point = origin + *direction * distance;
                let normal = (point - Vec3::from(sphere.center)).normalize_or(-*direction);
                WorldRayHit {
                    entity,
                    point,
                    normal,
                }
            })
    }
}

/// System: убрать убитые мишени из ray cast backend
///
/// `Dead` вставляется через commands, поэтому умерших в этот tick отсекаем по событию.
fn refresh_target_spheres(
    mut deaths: EventReader<EntityDied>,
    targets: Query<(Entity, &Transform), (With<ShootingTarget>, Without<Dead>)>,
    mut hitscan_world: ResMut<HitscanWorld>,
) {
    let died: Vec<Entity> = deaths.read().map(|death| death.entity).collect();
    if died.is_empty() {
        return;
    }

    let alive = targets
        .iter()
        .filter(|(entity, _)| !died.contains(entity))
        .map(|(entity, transform)| (entity, transform.translation));
    *hitscan_world = HitscanWorld::new(TargetSpheres::new(alive));

    logger::log(&format!("Ray cast backend rebuilt without {:?}", died));
}

/// System: AI стрелка - прицел + intents (до weapon систем)
fn drive_shooter(
    mut rng: ResMut<DeterministicRng>,
    mut shooters: Query<(Entity, &Weapon, &mut GlobalTransform)>,
    targets: Query<&Transform, (With<ShootingTarget>, Without<Dead>)>,
    mut fire: EventWriter<FireIntent>,
    mut reload: EventWriter<ReloadIntent>,
) {
    for (shooter, weapon, mut transform) in shooters.iter_mut() {
        let Ok(status) = weapon.controller.status() else {
            continue;
        };

        match status.state {
            WeaponState::Reloading => continue,
            WeaponState::Empty => {
                reload.write(ReloadIntent { shooter });
                continue;
            }
            WeaponState::Ready => {}
        }

        let Some(target) = targets.iter().min_by(|a, b| {
            let da = a.translation.distance_squared(SHOOTER_POSITION);
            let db = b.translation.distance_squared(SHOOTER_POSITION);
            da.total_cmp(&db)
        }) else {
            continue;
        };

        let jitter = Vec3::new(
            rng.rng.gen_range(-AIM_SPREAD..AIM_SPREAD),
            rng.rng.gen_range(-AIM_SPREAD..AIM_SPREAD),
            0.0,
        );
        let aim = target.translation + jitter;
        *transform =
            GlobalTransform::from(Transform::from_translation(SHOOTER_POSITION).looking_at(aim, Vec3::Y));

        fire.write(FireIntent { shooter });
    }
}

fn main() {
    logger::init_logger();

    let config = match SimulationConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            logger::log_error(&format!("Invalid configuration: {}", err));
            std::process::exit(1);
        }
    };
    set_log_level(config.log_level);

    let profile = match config.load_profile() {
        Ok(profile) => profile,
        Err(err) => {
            logger::log_error(&format!("{}", err));
            std::process::exit(1);
        }
    };

    logger::log_info(&format!(
        "Starting Gunline shooting range (seed: {}, ticks: {}, {} Hz)",
        config.seed, config.ticks, config.tick_hz
    ));

    let mut app = create_headless_app(config.seed);
    app.insert_resource(Time::<Fixed>::from_hz(config.tick_hz))
        // Один update = ровно один fixed tick
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / config.tick_hz,
        )));

    // Мишени на seeded позициях
    let mut targets = Vec::with_capacity(TARGET_COUNT);
    for i in 0..TARGET_COUNT {
        let position = {
            let mut rng = app.world_mut().resource_mut::<DeterministicRng>();
            Vec3::new(
                rng.rng.gen_range(-8.0..8.0),
                1.5,
                rng.rng.gen_range(-30.0..-10.0),
            )
        };

        let entity = app
            .world_mut()
            .spawn((
                ShootingTarget::new(format!("target-{}", i)),
                Health::new(TARGET_HEALTH),
                Transform::from_translation(position),
            ))
            .id();
        targets.push((entity, position));
    }

    app.insert_resource(HitscanWorld::new(TargetSpheres::new(targets)))
        .add_plugins(SimulationPlugin)
        .add_systems(
            FixedUpdate,
            (
                drive_shooter.before(tick_weapons),
                refresh_target_spheres.after(apply_hitscan_damage),
            ),
        );

    let shooter = app
        .world_mut()
        .spawn((Weapon::new(profile), GlobalTransform::from_translation(SHOOTER_POSITION)))
        .id();

    for tick in 0..config.ticks {
        app.update();

        let world = app.world_mut();
        let alive = world
            .query_filtered::<(), (With<ShootingTarget>, Without<Dead>)>()
            .iter(world)
            .count();

        if tick % 60 == 0 {
            logger::log_info(&format!("Tick {}: {} targets standing", tick, alive));
        }

        if alive == 0 {
            logger::log_info(&format!("All targets down at tick {}", tick));
            break;
        }
    }

    let status = app
        .world()
        .get::<Weapon>(shooter)
        .and_then(|weapon| weapon.controller.status().ok());
    logger::log_info(&format!("Range closed. Final weapon status: {:?}", status));
}

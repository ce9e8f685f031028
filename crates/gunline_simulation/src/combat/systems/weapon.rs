//! Weapon systems (lifecycle + deadlines + intents).
//!
//! Порядок в FixedUpdate (chain):
//! activate → holster → equip → tick → reload intents → fire intents

use bevy::prelude::*;

use crate::combat::{
    EntityHitscan, EquipWeapon, FireIntent, HitscanDamage, HitscanWorld, HolsterWeapon, Muzzle,
    ReloadCancelled, ReloadFinished, ReloadIntent, ReloadStarted, TracerExpired, Weapon,
    WeaponError, WeaponFired,
};
use crate::components::Health;
use crate::logger;

/// System: инициализация только что добавленных Weapon (activation)
pub fn activate_weapons(mut weapons: Query<(Entity, &mut Weapon), Added<Weapon>>) {
    for (entity, mut weapon) in weapons.iter_mut() {
        weapon.controller.initialize();

        if let Ok(status) = weapon.controller.status() {
            logger::log(&format!(
                "Weapon {:?} activated (magazine {}, reserve {})",
                entity, status.magazine_ammo, status.reserve_ammo
            ));
        }
    }
}

/// System: HolsterWeapon → teardown (in-flight reload отменяется)
pub fn holster_weapons(
    mut holsters: EventReader<HolsterWeapon>,
    mut weapons: Query<&mut Weapon>,
    mut cancelled: EventWriter<ReloadCancelled>,
) {
    for holster in holsters.read() {
        let Ok(mut weapon) = weapons.get_mut(holster.weapon) else {
            logger::log_warning(&format!(
                "HolsterWeapon: entity {:?} has no Weapon",
                holster.weapon
            ));
            continue;
        };

        if weapon.controller.teardown() {
            cancelled.write(ReloadCancelled {
                shooter: holster.weapon,
            });
            logger::log_info(&format!(
                "Weapon {:?} holstered mid-reload (reload cancelled)",
                holster.weapon
            ));
        } else {
            logger::log(&format!("Weapon {:?} holstered", holster.weapon));
        }
    }
}

/// System: EquipWeapon → initialize (ammo сбрасывается к профилю)
///
/// Только для убранного оружия: активное оружие не перезаряжается "бесплатно"
/// и не теряет текущий reload.
pub fn equip_weapons(mut equips: EventReader<EquipWeapon>, mut weapons: Query<&mut Weapon>) {
    for equip in equips.read() {
        let Ok(mut weapon) = weapons.get_mut(equip.weapon) else {
            logger::log_warning(&format!(
                "EquipWeapon: entity {:?} has no Weapon",
                equip.weapon
            ));
            continue;
        };

        if weapon.controller.is_initialized() {
            logger::log(&format!(
                "EquipWeapon ignored: weapon {:?} is already equipped",
                equip.weapon
            ));
            continue;
        }

        weapon.controller.initialize();
        logger::log(&format!("Weapon {:?} equipped", equip.weapon));
    }
}

/// System: tick deadlines (завершение reload, скрытие трассера)
///
/// Запускается ДО intents - истёкший reload уже не блокирует выстрел в этот tick.
pub fn tick_weapons(
    time: Res<Time>,
    mut weapons: Query<(Entity, &mut Weapon)>,
    mut finished: EventWriter<ReloadFinished>,
    mut tracers: EventWriter<TracerExpired>,
) {
    let now = time.elapsed_secs();

    for (entity, mut weapon) in weapons.iter_mut() {
        // Holstered оружие не тикает
        if !weapon.controller.is_initialized() {
            continue;
        }

        let report = match weapon.controller.update(now) {
            Ok(report) => report,
            Err(err) => {
                logger::log_error(&format!("tick_weapons: {:?}: {}", entity, err));
                continue;
            }
        };

        if report.tracer_hidden.is_some() {
            tracers.write(TracerExpired { shooter: entity });
        }

        if let Some(done) = report.reload_finished {
            finished.write(ReloadFinished {
                shooter: entity,
                loaded: done.loaded,
                magazine_ammo: done.magazine_ammo,
                reserve_ammo: done.reserve_ammo,
            });
            logger::log(&format!(
                "Weapon {:?} reloaded +{} (magazine {}, reserve {})",
                entity, done.loaded, done.magazine_ammo, done.reserve_ammo
            ));
        }
    }
}

/// System: ReloadIntent → WeaponController::reload
pub fn process_reload_intents(
    time: Res<Time>,
    mut intents: EventReader<ReloadIntent>,
    mut weapons: Query<&mut Weapon>,
    mut started: EventWriter<ReloadStarted>,
) {
    let now = time.elapsed_secs();

    for intent in intents.read() {
        let Ok(mut weapon) = weapons.get_mut(intent.shooter) else {
            logger::log_warning(&format!(
                "ReloadIntent: entity {:?} has no Weapon",
                intent.shooter
            ));
            continue;
        };

        match weapon.controller.reload(now) {
            Ok(Some(scheduled)) => {
                started.write(ReloadStarted {
                    shooter: intent.shooter,
                    completes_at: scheduled.completes_at,
                });
                logger::log(&format!(
                    "Weapon {:?} reloading until {:.2}s",
                    intent.shooter, scheduled.completes_at
                ));
            }
            // Уже перезаряжается / полный магазин / нет запаса - no-op
            Ok(None) => {}
            Err(WeaponError::NotInitialized) => {
                logger::log(&format!(
                    "ReloadIntent ignored: weapon {:?} is holstered",
                    intent.shooter
                ));
            }
        }
    }
}

/// System: FireIntent → hit-scan выстрел
///
/// Damage не применяется здесь: попадания уходят в HitscanDamage,
/// их обрабатывает `apply_hitscan_damage` дальше по цепочке.
pub fn process_fire_intents(
    time: Res<Time>,
    world: Res<HitscanWorld>,
    mut intents: EventReader<FireIntent>,
    mut weapons: Query<(&mut Weapon, &GlobalTransform)>,
    damageable: Query<(), With<Health>>,
    mut fired: EventWriter<WeaponFired>,
    mut damage: EventWriter<HitscanDamage>,
) {
    let now = time.elapsed_secs();
    let mut pending = Vec::new();

    for intent in intents.read() {
        let Ok((mut weapon, transform)) = weapons.get_mut(intent.shooter) else {
            logger::log_warning(&format!(
                "FireIntent: entity {:?} has no Weapon/GlobalTransform",
                intent.shooter
            ));
            continue;
        };

        let muzzle = Muzzle::from_transform(transform);
        let mut hitscan = EntityHitscan::new(
            &world,
            intent.shooter,
            |entity| damageable.contains(entity),
            &mut pending,
        );
        let result = weapon.controller.fire(now, muzzle, &mut hitscan);
        let hit_entity = hitscan.last_hit();

        match result {
            Ok(Some(shot)) => {
                fired.write(WeaponFired {
                    shooter: intent.shooter,
                    origin: shot.origin,
                    impact_point: shot.impact_point,
                    impact_normal: shot.hit_normal,
                    hit_entity,
                    magazine_ammo: shot.magazine_ammo,
                    tracer_hide_at: shot.tracer_hide_at,
                });
                logger::log(&format!(
                    "Weapon {:?} fired → {:?} (hit {:?}, magazine {})",
                    intent.shooter, shot.impact_point, hit_entity, shot.magazine_ammo
                ));
            }
            // Cooldown / Empty / Reloading - no-op
            Ok(None) => {}
            Err(WeaponError::NotInitialized) => {
                logger::log(&format!(
                    "FireIntent ignored: weapon {:?} is holstered",
                    intent.shooter
                ));
            }
        }
    }

    damage.write_batch(pending);
}

//! WeaponController - FSM одного ranged оружия (hit-scan)
//!
//! Состояния: Ready → (магазин пуст) → Empty → reload → Reloading → Ready
//!
//! Architecture:
//! - Host tick вызывает `update(now)` ПЕРВЫМ, затем `reload(now)` / `fire(now)`
//! - Reload и tracer - `Deferred` deadlines (не корутины, tick loop не блокируется)
//! - Ray cast и damage - через `HitscanQuery` / `Damageable` (weapon их не владеет)
//! - Отказ (cooldown, пустой магазин) = `Ok(None)`, ошибка только `NotInitialized`
//!
//! Инвариант (строгий): вне Reloading `state == Empty ⇔ magazine_ammo == 0`.

use bevy::prelude::*;

use super::deferred::{take_due, Deferred};
use super::error::WeaponError;
use super::hitscan::{Damageable, HitscanQuery, Muzzle, RayHit};
use super::profile::WeaponProfile;

/// Состояние оружия
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeaponState {
    /// Можно стрелять
    #[default]
    Ready,
    /// Магазин пуст: стрелять нельзя, перезаряжать можно
    Empty,
    /// Идёт перезарядка: ни выстрел, ни повторный reload
    Reloading,
}

/// Снимок состояния для UI / тестов
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeaponStatus {
    pub state: WeaponState,
    pub magazine_ammo: u32,
    pub reserve_ammo: u32,
}

/// Линия трассера (muzzle → impact)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tracer {
    pub from: Vec3,
    pub to: Vec3,
}

/// Результат успешного выстрела (для presentation layer)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotFired {
    /// Позиция muzzle в момент выстрела
    pub origin: Vec3,
    /// Точка попадания или конец луча при промахе
    pub impact_point: Vec3,
    /// Нормаль поверхности (None = промах)
    pub hit_normal: Option<Vec3>,
    /// Был ли вызван `apply_damage` на цели
    pub damaged_target: bool,
    /// Патронов в магазине после выстрела
    pub magazine_ammo: u32,
    /// Когда трассер будет скрыт
    pub tracer_hide_at: f32,
}

/// Перезарядка начата
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReloadScheduled {
    pub completes_at: f32,
}

/// Перезарядка завершена
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadCompleted {
    /// Сколько патронов перешло из запаса в магазин
    pub loaded: u32,
    pub magazine_ammo: u32,
    pub reserve_ammo: u32,
}

/// Что произошло за tick (`update`)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickReport {
    pub reload_finished: Option<ReloadCompleted>,
    pub tracer_hidden: Option<Tracer>,
}

/// Состояние между initialize() и teardown()
#[derive(Debug, Clone)]
struct Session {
    state: WeaponState,
    magazine_ammo: u32,
    reserve_ammo: u32,
    /// None = с активации ещё не стреляли
    last_fire: Option<f32>,
    reload: Option<Deferred<()>>,
    tracer: Option<Deferred<Tracer>>,
}

impl Session {
    fn fresh(profile: &WeaponProfile) -> Self {
        Self {
            state: WeaponState::Ready,
            magazine_ammo: profile.magazine_capacity,
            reserve_ammo: profile.starting_reserve_ammo,
            last_fire: None,
            reload: None,
            tracer: None,
        }
    }

    fn status(&self) -> WeaponStatus {
        WeaponStatus {
            state: self.state,
            magazine_ammo: self.magazine_ammo,
            reserve_ammo: self.reserve_ammo,
        }
    }

    fn is_consistent(&self, capacity: u32) -> bool {
        let coupling = match self.state {
            WeaponState::Ready => self.magazine_ammo > 0,
            WeaponState::Empty => self.magazine_ammo == 0,
            WeaponState::Reloading => self.reload.is_some(),
        };
        coupling && self.magazine_ammo <= capacity
    }
}

/// FSM одного оружия
#[derive(Debug, Clone)]
pub struct WeaponController {
    profile: WeaponProfile,
    session: Option<Session>,
}

impl WeaponController {
    /// Создать контроллер (НЕ инициализирован - нужен `initialize()`)
    pub fn new(profile: WeaponProfile) -> Self {
        Self {
            profile,
            session: None,
        }
    }

    pub fn profile(&self) -> &WeaponProfile {
        &self.profile
    }

    pub fn is_initialized(&self) -> bool {
        self.session.is_some()
    }

    /// Активация: магазин полный, запас из профиля, state = Ready
    ///
    /// Повторный вызов полностью сбрасывает состояние (как reactivation).
    pub fn initialize(&mut self) {
        self.session = Some(Session::fresh(&self.profile));
    }

    /// Деактивация: всё состояние выбрасывается
    ///
    /// Возвращает `true`, если была отменена незавершённая перезарядка
    /// (патроны в этом случае НЕ переносятся).
    pub fn teardown(&mut self) -> bool {
        self.session
            .take()
            .is_some_and(|session| session.reload.is_some())
    }

    pub fn status(&self) -> Result<WeaponStatus, WeaponError> {
        self.session().map(Session::status)
    }

    /// Прогресс перезарядки 0..1 (None = не перезаряжается)
    pub fn reload_progress(&self, now: f32) -> Result<Option<f32>, WeaponError> {
        Ok(self
            .session()?
            .reload
            .as_ref()
            .map(|reload| reload.progress(now)))
    }

    /// Видимая сейчас линия трассера
    pub fn active_tracer(&self) -> Option<&Tracer> {
        self.session
            .as_ref()
            .and_then(|session| session.tracer.as_ref())
            .map(Deferred::payload)
    }

    /// Tick: завершить перезарядку и скрыть трассер, если deadline наступил
    pub fn update(&mut self, now: f32) -> Result<TickReport, WeaponError> {
        let capacity = self.profile.magazine_capacity;
        let session = self.session.as_mut().ok_or(WeaponError::NotInitialized)?;

        let mut report = TickReport {
            tracer_hidden: take_due(&mut session.tracer, now),
            ..TickReport::default()
        };

        if take_due(&mut session.reload, now).is_some() {
            let ammo_to_fill = capacity
                .saturating_sub(session.magazine_ammo)
                .min(session.reserve_ammo);

            session.magazine_ammo += ammo_to_fill;
            session.reserve_ammo -= ammo_to_fill;
            // reload стартует только при reserve > 0 и неполном магазине → ammo_to_fill ≥ 1
            session.state = if session.magazine_ammo > 0 {
                WeaponState::Ready
            } else {
                WeaponState::Empty
            };

            report.reload_finished = Some(ReloadCompleted {
                loaded: ammo_to_fill,
                magazine_ammo: session.magazine_ammo,
                reserve_ammo: session.reserve_ammo,
            });
        }

        debug_assert!(session.is_consistent(capacity));
        Ok(report)
    }

    /// Попытка выстрела
    ///
    /// `Ok(None)` - guard не прошёл (не Ready или слишком рано), состояние не меняется.
    pub fn fire<Q: HitscanQuery>(
        &mut self,
        now: f32,
        muzzle: Muzzle,
        hitscan: &mut Q,
    ) -> Result<Option<ShotFired>, WeaponError> {
        let profile = &self.profile;
        let session = self.session.as_mut().ok_or(WeaponError::NotInitialized)?;

        let cooled_down = session
            .last_fire
            .map_or(true, |last| now >= last + profile.fire_interval);
        if session.state != WeaponState::Ready || !cooled_down {
            return Ok(None);
        }

        session.last_fire = Some(now);

        let (impact_point, hit_normal, damaged_target) =
            match hitscan.cast(muzzle.origin, muzzle.direction, profile.max_range) {
                Some(RayHit {
                    point,
                    normal,
                    target,
                }) => {
                    let damaged = match target {
                        Some(mut target) => {
                            target.apply_damage(profile.damage, point, normal);
                            true
                        }
                        None => false,
                    };
                    (point, Some(normal), damaged)
                }
                None => (muzzle.ray_end(profile.max_range), None, false),
            };

        // Повторный выстрел перезапускает окно трассера
        let tracer = Deferred::schedule(
            now,
            profile.tracer_duration,
            Tracer {
                from: muzzle.origin,
                to: impact_point,
            },
        );
        let tracer_hide_at = tracer.due_at();
        session.tracer = Some(tracer);

        session.magazine_ammo = session.magazine_ammo.saturating_sub(1);
        if session.magazine_ammo == 0 {
            session.state = WeaponState::Empty;
        }

        debug_assert!(session.is_consistent(profile.magazine_capacity));
        Ok(Some(ShotFired {
            origin: muzzle.origin,
            impact_point,
            hit_normal,
            damaged_target,
            magazine_ammo: session.magazine_ammo,
            tracer_hide_at,
        }))
    }

    /// Попытка начать перезарядку
    ///
    /// `Ok(None)` - уже перезаряжается, запас пуст или магазин полный.
    pub fn reload(&mut self, now: f32) -> Result<Option<ReloadScheduled>, WeaponError> {
        let profile = &self.profile;
        let session = self.session.as_mut().ok_or(WeaponError::NotInitialized)?;

        if session.state == WeaponState::Reloading
            || session.reserve_ammo == 0
            || session.magazine_ammo >= profile.magazine_capacity
        {
            return Ok(None);
        }

        // Переход в Reloading ДО возврата - следующие guard'ы его уже видят
        session.state = WeaponState::Reloading;
        let reload = Deferred::schedule(now, profile.reload_duration, ());
        let completes_at = reload.due_at();
        session.reload = Some(reload);

        debug_assert!(session.is_consistent(profile.magazine_capacity));
        Ok(Some(ReloadScheduled { completes_at }))
    }

    fn session(&self) -> Result<&Session, WeaponError> {
        self.session.as_ref().ok_or(WeaponError::NotInitialized)
    }
}

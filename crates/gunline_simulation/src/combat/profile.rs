//! Weapon profile - неизменяемые данные оружия
//!
//! Architecture:
//! - Профиль грузится ОДИН раз до активации (JSON или preset)
//! - WeaponController только читает профиль, никогда не мутирует
//! - Валидация при загрузке: invalid профиль не доходит до FSM

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::ProfileError;

/// Дальность hit-scan по умолчанию (distance units)
pub const DEFAULT_MAX_RANGE: f32 = 50.0;

/// Сколько видна линия трассера после выстрела (секунды)
pub const DEFAULT_TRACER_DURATION: f32 = 0.03;

/// Weapon profile (ranged, hit-scan)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponProfile {
    /// Минимальный интервал между выстрелами (секунды)
    pub fire_interval: f32,

    /// Ёмкость магазина (> 0)
    pub magazine_capacity: u32,

    /// Урон за попадание
    pub damage: f32,

    /// Длительность перезарядки (секунды)
    pub reload_duration: f32,

    /// Патроны в запасе при активации
    pub starting_reserve_ammo: u32,

    /// Дальность луча
    #[serde(default = "default_max_range")]
    pub max_range: f32,

    /// Видимость трассера (секунды)
    #[serde(default = "default_tracer_duration")]
    pub tracer_duration: f32,
}

fn default_max_range() -> f32 {
    DEFAULT_MAX_RANGE
}

fn default_tracer_duration() -> f32 {
    DEFAULT_TRACER_DURATION
}

impl Default for WeaponProfile {
    fn default() -> Self {
        Self::pistol()
    }
}

impl WeaponProfile {
    /// Полуавтоматический пистолет
    pub fn pistol() -> Self {
        Self {
            fire_interval: 0.12,
            magazine_capacity: 25,
            damage: 25.0,
            reload_duration: 1.8,
            starting_reserve_ammo: 100,
            max_range: DEFAULT_MAX_RANGE,
            tracer_duration: DEFAULT_TRACER_DURATION,
        }
    }

    /// Автоматическая винтовка
    pub fn rifle() -> Self {
        Self {
            fire_interval: 0.1,
            magazine_capacity: 30,
            damage: 18.0,
            reload_duration: 2.4,
            starting_reserve_ammo: 150,
            max_range: 80.0,
            tracer_duration: DEFAULT_TRACER_DURATION,
        }
    }

    /// Распарсить + провалидировать профиль из JSON
    pub fn from_json_str(json: &str) -> Result<Self, ProfileError> {
        let profile: Self = serde_json::from_str(json)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Загрузить профиль с диска
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Проверка инвариантов профиля
    ///
    /// NaN отсекается через `is_finite` (сравнения с NaN всегда false).
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.magazine_capacity == 0 {
            return Err(invalid("magazineCapacity", "must be greater than zero"));
        }
        if !self.damage.is_finite() || self.damage < 0.0 {
            return Err(invalid("damage", "must be a finite number >= 0"));
        }
        if !self.fire_interval.is_finite() || self.fire_interval < 0.0 {
            return Err(invalid("fireInterval", "must be a finite duration >= 0"));
        }
        if !self.reload_duration.is_finite() || self.reload_duration < 0.0 {
            return Err(invalid("reloadDuration", "must be a finite duration >= 0"));
        }
        if !self.tracer_duration.is_finite() || self.tracer_duration < 0.0 {
            return Err(invalid("tracerDuration", "must be a finite duration >= 0"));
        }
        if !self.max_range.is_finite() || self.max_range <= 0.0 {
            return Err(invalid("maxRange", "must be a finite distance > 0"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &'static str) -> ProfileError {
    ProfileError::Invalid { field, reason }
}

//! Weapon errors
//!
//! Отказ выстрела / перезарядки (cooldown, пустой магазин, уже перезаряжается)
//! - это НЕ ошибка, а `None`/`false`. Ошибки только для нарушения контракта.

use std::path::PathBuf;

/// Нарушение контракта WeaponController
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WeaponError {
    /// fire/reload/update вызваны до initialize() (или после teardown())
    #[error("weapon controller is not initialized (call initialize() on activation)")]
    NotInitialized,
}

/// Ошибки загрузки / валидации WeaponProfile
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("failed to read weapon profile {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed weapon profile: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid weapon profile: {field} {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

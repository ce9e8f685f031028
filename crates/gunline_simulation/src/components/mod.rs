//! ECS Components для world entities
//!
//! Организация по доменам:
//! - actor: здоровье и мишени (Health, ShootingTarget)
//!
//! Weapon component находится в crate::combat (рядом с FSM).

pub mod actor;

// Re-exports для удобного импорта
pub use actor::*;

//! Базовые компоненты world entities: Health, ShootingTarget

use bevy::prelude::*;

use crate::combat::Damageable;

/// Мишень / противник, по которому можно стрелять
///
/// Автоматически добавляет Health через Required Components.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
#[require(Health)]
pub struct ShootingTarget {
    /// Человекочитаемое имя (для логов)
    pub label: String,
}

impl ShootingTarget {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

/// Здоровье entity
///
/// Инвариант: 0.0 ≤ current ≤ max
/// Наличие Health = entity является Damageable для hit-scan.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0) // Default 100 HP
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.current = (self.current - amount.max(0.0)).max(0.0);
    }
}

impl Damageable for Health {
    fn apply_damage(&mut self, amount: f32, _point: Vec3, _normal: Vec3) {
        // Точка/нормаль нужны только VFX - здоровью достаточно amount
        self.take_damage(amount);
    }
}

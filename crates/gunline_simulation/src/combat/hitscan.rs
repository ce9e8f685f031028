//! Hit-scan contracts (weapon ↔ world)
//!
//! Architecture:
//! - WeaponController НЕ делает ray intersection сам - спрашивает `HitscanQuery`
//! - Query layer резолвит capability lookup: "есть ли у попавшего `Damageable`"
//! - Weapon только вызывает `apply_damage`, результат - забота цели

use bevy::prelude::*;

/// Любая world entity, способная принять урон
///
/// Failure (цель уже уничтожена и т.п.) обрабатывает сама цель -
/// weapon не наблюдает и не ретраит.
pub trait Damageable {
    fn apply_damage(&mut self, amount: f32, point: Vec3, normal: Vec3);
}

impl<T: Damageable + ?Sized> Damageable for &mut T {
    fn apply_damage(&mut self, amount: f32, point: Vec3, normal: Vec3) {
        (**self).apply_damage(amount, point, normal);
    }
}

/// Результат ray cast, когда луч во что-то попал
///
/// `target == None` - попали в геометрию без `Damageable` (стена, пол).
#[derive(Debug)]
pub struct RayHit<T> {
    pub point: Vec3,
    pub normal: Vec3,
    pub target: Option<T>,
}

impl<T> RayHit<T> {
    /// Попадание в геометрию без damage capability
    pub fn surface(point: Vec3, normal: Vec3) -> Self {
        Self {
            point,
            normal,
            target: None,
        }
    }

    pub fn with_target(point: Vec3, normal: Vec3, target: T) -> Self {
        Self {
            point,
            normal,
            target: Some(target),
        }
    }
}

/// Ray-cast сервис, который weapon потребляет
///
/// `None` = луч ни во что не попал в пределах `max_range`;
/// конечную точку луча weapon вычисляет сам.
pub trait HitscanQuery {
    /// Handle на damageable цель (может заимствовать query на время выстрела)
    type Target<'a>: Damageable
    where
        Self: 'a;

    fn cast(
        &mut self,
        origin: Vec3,
        direction: Dir3,
        max_range: f32,
    ) -> Option<RayHit<Self::Target<'_>>>;
}

/// Откуда и куда стреляет weapon в момент выстрела
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Muzzle {
    pub origin: Vec3,
    pub direction: Dir3,
}

impl Muzzle {
    pub fn new(origin: Vec3, direction: Dir3) -> Self {
        Self { origin, direction }
    }

    /// Muzzle из world transform (forward = -Z, как везде в Bevy)
    pub fn from_transform(transform: &GlobalTransform) -> Self {
        Self {
            origin: transform.translation(),
            direction: transform.forward(),
        }
    }

    /// Конечная точка луча, если ничего не задели
    pub fn ray_end(&self, max_range: f32) -> Vec3 {
        self.origin + *self.direction * max_range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dummy {
        received: f32,
    }

    impl Damageable for Dummy {
        fn apply_damage(&mut self, amount: f32, _point: Vec3, _normal: Vec3) {
            self.received += amount;
        }
    }

    #[test]
    fn test_ray_end() {
        let muzzle = Muzzle::new(Vec3::new(1.0, 2.0, 3.0), Dir3::X);
        assert_eq!(muzzle.ray_end(50.0), Vec3::new(51.0, 2.0, 3.0));
    }

    #[test]
    fn test_muzzle_from_transform_faces_forward() {
        let transform = GlobalTransform::from_translation(Vec3::new(0.0, 1.5, 0.0));
        let muzzle = Muzzle::from_transform(&transform);

        assert_eq!(muzzle.origin, Vec3::new(0.0, 1.5, 0.0));
        assert_eq!(muzzle.direction, Dir3::NEG_Z);
    }

    #[test]
    fn test_damageable_through_mut_ref() {
        fn strike<D: Damageable>(mut target: D) {
            target.apply_damage(12.5, Vec3::ZERO, Vec3::Y);
        }

        let mut dummy = Dummy { received: 0.0 };
        strike(&mut dummy);
        strike(&mut dummy);
        assert_eq!(dummy.received, 25.0);
    }
}

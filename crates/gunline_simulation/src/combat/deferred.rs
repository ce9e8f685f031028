//! Deferred completion handles
//!
//! Кооперативная "пауза" (reload, tracer) без блокировки tick loop:
//! вместо корутины храним deadline + payload, host tick спрашивает `is_due`.

/// Отложенное событие с deadline (секунды simulation time)
#[derive(Debug, Clone, PartialEq)]
pub struct Deferred<T> {
    started_at: f32,
    due_at: f32,
    payload: T,
}

impl<T> Deferred<T> {
    /// Запланировать payload через `delay` секунд от `now`
    ///
    /// Отрицательный delay трактуется как 0 (срабатывает на ближайшем tick).
    pub fn schedule(now: f32, delay: f32, payload: T) -> Self {
        Self {
            started_at: now,
            due_at: now + delay.max(0.0),
            payload,
        }
    }

    pub fn due_at(&self) -> f32 {
        self.due_at
    }

    pub fn is_due(&self, now: f32) -> bool {
        now >= self.due_at
    }

    /// Прогресс 0.0 → 1.0 (zero-length deadline сразу 1.0)
    pub fn progress(&self, now: f32) -> f32 {
        let total = self.due_at - self.started_at;
        if total <= 0.0 {
            return 1.0;
        }
        ((now - self.started_at) / total).clamp(0.0, 1.0)
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    pub fn into_payload(self) -> T {
        self.payload
    }
}

/// Забрать payload из слота если deadline наступил
///
/// Слот остаётся `None` после срабатывания - повторно не выстрелит.
pub fn take_due<T>(slot: &mut Option<Deferred<T>>, now: f32) -> Option<T> {
    match slot {
        Some(deferred) if deferred.is_due(now) => slot.take().map(Deferred::into_payload),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deferred_due() {
        let deferred = Deferred::schedule(1.0, 2.0, ());
        assert_eq!(deferred.due_at(), 3.0);
        assert!(!deferred.is_due(2.5));
        assert!(deferred.is_due(3.0));
    }

    #[test]
    fn test_deferred_progress() {
        let deferred = Deferred::schedule(0.0, 2.0, ());
        assert_eq!(deferred.progress(0.0), 0.0);
        assert_eq!(deferred.progress(1.0), 0.5);
        assert_eq!(deferred.progress(10.0), 1.0);

        let instant = Deferred::schedule(5.0, 0.0, ());
        assert_eq!(instant.progress(5.0), 1.0);
    }

    #[test]
    fn test_negative_delay_clamped() {
        let deferred = Deferred::schedule(1.0, -3.0, 7);
        assert_eq!(deferred.due_at(), 1.0);
        assert!(deferred.is_due(1.0));
    }

    #[test]
    fn test_take_due_empties_slot() {
        let mut slot = Some(Deferred::schedule(0.0, 0.5, "reload"));

        assert_eq!(take_due(&mut slot, 0.25), None);
        assert!(slot.is_some());

        assert_eq!(take_due(&mut slot, 0.5), Some("reload"));
        assert!(slot.is_none());

        // Второй раз не срабатывает
        assert_eq!(take_due(&mut slot, 1.0), None);
    }
}

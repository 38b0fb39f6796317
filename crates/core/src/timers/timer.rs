//! Cooldown gate for periodic work inside a cycle

use std::time::{Duration, Instant};

/// Fires at most once per interval
///
/// The first call to [`try_fire`](Cooldown::try_fire) always fires.
#[derive(Debug, Clone)]
pub struct Cooldown {
    /// Minimum time between two fires
    interval: Duration,
    /// When this cooldown last fired
    last_fire: Option<Instant>,
}

impl Cooldown {
    /// Create a new cooldown
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fire: None,
        }
    }

    /// Fire if the interval elapsed since the last fire
    pub fn try_fire(&mut self, now: Instant) -> bool {
        match self.last_fire {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last_fire = Some(now);
                true
            }
        }
    }

    /// Forget the last fire so the next call fires immediately
    pub fn reset(&mut self) {
        self.last_fire = None;
    }

    /// Get the configured interval
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_call_fires() {
        let mut cooldown = Cooldown::new(Duration::from_millis(1000));
        assert!(cooldown.try_fire(Instant::now()));
    }

    #[test]
    fn test_gated_until_elapsed() {
        let start = Instant::now();
        let mut cooldown = Cooldown::new(Duration::from_millis(1000));

        assert!(cooldown.try_fire(start));
        assert!(!cooldown.try_fire(start + Duration::from_millis(999)));
        assert!(cooldown.try_fire(start + Duration::from_millis(1000)));
        assert!(!cooldown.try_fire(start + Duration::from_millis(1500)));
    }

    #[test]
    fn test_reset() {
        let start = Instant::now();
        let mut cooldown = Cooldown::new(Duration::from_secs(5));
        assert!(cooldown.try_fire(start));
        cooldown.reset();
        assert!(cooldown.try_fire(start + Duration::from_millis(1)));
    }
}

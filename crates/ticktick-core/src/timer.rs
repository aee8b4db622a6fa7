use serde::{Deserialize, Serialize};

/// The level's countdown ("bomb") timer.
///
/// Time runs down at `multiplier` seconds per second while `running` is set.
/// Pausing the game is done by clearing `running`; the remaining time is kept.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CountdownTimer {
    pub duration: f32,
    pub remaining: f32,
    pub multiplier: f32,
    pub running: bool,
}

impl CountdownTimer {
    pub fn new(duration_secs: f32) -> Self {
        Self {
            duration: duration_secs,
            remaining: duration_secs,
            multiplier: 1.0,
            running: true,
        }
    }

    pub fn tick(&mut self, dt: f32) {
        if self.running && dt.is_finite() && dt > 0.0 {
            self.remaining = (self.remaining - dt * self.multiplier).max(0.0);
        }
    }

    pub fn has_passed(&self) -> bool {
        self.remaining <= 0.0
    }

    pub fn reset(&mut self) {
        self.remaining = self.duration;
        self.multiplier = 1.0;
        self.running = true;
    }

    /// Whole seconds left, rounded up, for display.
    pub fn seconds_left(&self) -> u32 {
        self.remaining.max(0.0).ceil() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_down_and_passes() {
        let mut t = CountdownTimer::new(2.0);
        assert!(!t.has_passed());
        t.tick(1.5);
        assert_eq!(t.seconds_left(), 1);
        t.tick(1.0);
        assert!(t.has_passed());
        assert_eq!(t.remaining, 0.0);
    }

    #[test]
    fn multiplier_speeds_up_countdown() {
        let mut t = CountdownTimer::new(10.0);
        t.multiplier = 2.0;
        t.tick(1.0);
        assert!((t.remaining - 8.0).abs() < 1e-6);
    }

    #[test]
    fn stopped_timer_does_not_move() {
        let mut t = CountdownTimer::new(5.0);
        t.running = false;
        t.tick(3.0);
        assert_eq!(t.remaining, 5.0);
        t.running = true;
        t.tick(3.0);
        assert_eq!(t.remaining, 2.0);
    }

    #[test]
    fn reset_restores_duration_and_multiplier() {
        let mut t = CountdownTimer::new(30.0);
        t.multiplier = 2.0;
        t.running = false;
        t.tick(5.0);
        t.reset();
        assert_eq!(t.remaining, 30.0);
        assert_eq!(t.multiplier, 1.0);
        assert!(t.running);
    }

    #[test]
    fn nan_dt_ignored() {
        let mut t = CountdownTimer::new(5.0);
        t.tick(f32::NAN);
        assert_eq!(t.remaining, 5.0);
    }
}

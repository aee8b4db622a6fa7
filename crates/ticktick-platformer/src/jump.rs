//! Jump forgiveness timers: coyote time, jump buffering, hold-to-jump-higher
//! and the speed boost window.
//!
//! All counters are seconds since some event. A counter at or beyond its
//! window is "closed".

use serde::{Deserialize, Serialize};

use crate::config::TimingConfig;

/// Any value past every window.
const CLOSED: f32 = 1_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JumpTimers {
    /// Since the player last stood on something (coyote time).
    pub since_grounded: f32,
    /// Since the current jump lifted off.
    pub since_jump_start: f32,
    /// Since the player last touched a speed surface.
    pub since_speed_boost: f32,
    /// Since a jump press that could not be honoured yet (jump buffer).
    pub since_buffered_press: f32,
}

impl Default for JumpTimers {
    fn default() -> Self {
        Self {
            since_grounded: 0.0,
            since_jump_start: CLOSED,
            since_speed_boost: CLOSED,
            since_buffered_press: CLOSED,
        }
    }
}

impl JumpTimers {
    /// Inside the coyote window.
    pub fn coyote_open(&self, timing: &TimingConfig) -> bool {
        self.since_grounded < timing.coyote_time
    }

    pub fn close_coyote(&mut self, timing: &TimingConfig) {
        self.since_grounded = timing.coyote_time;
    }

    /// Remember a jump press for later.
    pub fn buffer_press(&mut self) {
        self.since_buffered_press = 0.0;
    }

    pub fn close_buffer(&mut self, timing: &TimingConfig) {
        self.since_buffered_press = timing.jump_buffer_time;
    }

    pub fn buffer_open(&self, timing: &TimingConfig) -> bool {
        self.since_buffered_press < timing.jump_buffer_time
    }

    pub fn start_jump(&mut self) {
        self.since_jump_start = 0.0;
    }

    /// Holding jump now extends the current jump.
    pub fn in_hold_window(&self, timing: &TimingConfig) -> bool {
        self.since_jump_start > timing.jump_hold_start && self.since_jump_start < timing.jump_hold_end
    }

    /// Vertical velocity while the jump is held: full lift-off speed decayed
    /// by how long it has been held.
    pub fn hold_velocity(&self, jump_speed: f32, timing: &TimingConfig) -> f32 {
        -jump_speed + timing.jump_hold_decay * self.since_jump_start
    }

    pub fn start_speed_boost(&mut self) {
        self.since_speed_boost = 0.0;
    }

    pub fn speed_boost_active(&self, timing: &TimingConfig) -> bool {
        self.since_speed_boost < timing.speed_boost_time
    }

    /// Advance every counter by `dt`. The coyote counter restarts on
    /// grounded frames instead.
    pub fn advance(&mut self, dt: f32, grounded: bool) {
        if grounded {
            self.since_grounded = 0.0;
        } else {
            self.since_grounded += dt;
        }
        self.since_jump_start += dt;
        self.since_speed_boost += dt;
        self.since_buffered_press += dt;
    }

    /// A buffered press is due: it is still fresh and the player is on the
    /// ground. Consumes the buffer when it fires.
    pub fn take_buffered_jump(&mut self, grounded: bool, timing: &TimingConfig) -> bool {
        if grounded && self.buffer_open(timing) {
            self.close_buffer(timing);
            true
        } else {
            false
        }
    }
}

use serde::{Deserialize, Serialize};

use crate::effects::Effects;
use crate::input::InputSnapshot;

/// Per-frame context owned by the host loop and lent to the active state.
///
/// Replaces global camera/input/audio singletons: everything a state may touch
/// during one frame arrives through here.
pub struct FrameContext<'a> {
    /// Seconds elapsed since the previous frame.
    pub dt: f32,
    pub input: &'a dyn InputSnapshot,
    pub effects: &'a mut dyn Effects,
}

impl<'a> FrameContext<'a> {
    pub fn new(dt: f32, input: &'a dyn InputSnapshot, effects: &'a mut dyn Effects) -> Self {
        Self { dt, input, effects }
    }
}

/// Why the player stopped being alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Fell out of the bottom of the level.
    Fell,
    /// The countdown timer ran out.
    Exploded,
}

/// Signals from the gameplay core to the surrounding game-state layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The player reached the active goal. `level_index` is `None` for custom
    /// levels, which never unlock progress.
    LevelCompleted { level_index: Option<u32> },
    PlayerDied { cause: DeathCause },
}

/// A frame-stepped game state (playing, editor, ...).
///
/// One `handle_input` then one `update` per frame. Nothing blocks and nothing
/// spans frames except the state's own timers.
pub trait GameLoop {
    fn handle_input(&mut self, ctx: &mut FrameContext<'_>);

    /// Advance the simulation by `ctx.dt`. Returns signals for the host.
    fn update(&mut self, ctx: &mut FrameContext<'_>) -> Vec<GameEvent>;

    fn pause(&mut self);

    fn resume(&mut self);

    fn is_paused(&self) -> bool;
}

/// Run one frame: input then update, skipping both while paused.
pub fn run_frame(state: &mut dyn GameLoop, ctx: &mut FrameContext<'_>) -> Vec<GameEvent> {
    if state.is_paused() {
        tracing::trace!("frame skipped, state paused");
        return Vec::new();
    }
    state.handle_input(ctx);
    state.update(ctx)
}

/// Generates `pause`, `resume` and `is_paused` for a struct with a
/// `paused: bool` field.
#[macro_export]
macro_rules! game_loop_pause_boilerplate {
    () => {
        fn pause(&mut self) {
            self.paused = true;
        }

        fn resume(&mut self) {
            self.paused = false;
        }

        fn is_paused(&self) -> bool {
            self.paused
        }
    };
}

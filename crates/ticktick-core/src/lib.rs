pub mod effects;
pub mod game_loop;
pub mod geometry;
pub mod input;
pub mod timer;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::effects::{AnimationCue, Effects, SoundCue};
    use crate::game_loop::{FrameContext, GameEvent, GameLoop, run_frame};
    use crate::input::{Key, KeyboardSnapshot};

    /// Effects sink that remembers every cue, in order.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingEffects {
        pub sounds: Vec<SoundCue>,
        pub animations: Vec<(AnimationCue, bool)>,
    }

    impl RecordingEffects {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn played(&self, cue: SoundCue) -> bool {
            self.sounds.contains(&cue)
        }

        pub fn last_animation(&self) -> Option<AnimationCue> {
            self.animations.last().map(|(cue, _)| *cue)
        }

        pub fn clear(&mut self) {
            self.sounds.clear();
            self.animations.clear();
        }
    }

    impl Effects for RecordingEffects {
        fn play_sound(&mut self, cue: SoundCue) {
            self.sounds.push(cue);
        }

        fn play_animation(&mut self, cue: AnimationCue, restart: bool) {
            self.animations.push((cue, restart));
        }
    }

    /// Snapshot with the given keys held and newly pressed.
    pub fn keys_pressed(keys: &[Key]) -> KeyboardSnapshot {
        keys.iter()
            .fold(KeyboardSnapshot::new(), |snap, &k| snap.with_key(k, true))
    }

    /// Snapshot with the given keys held but not newly pressed.
    pub fn keys_held(keys: &[Key]) -> KeyboardSnapshot {
        keys.iter()
            .fold(KeyboardSnapshot::new(), |snap, &k| snap.with_key(k, false))
    }

    /// Run `n` frames with the same input, returning all accumulated events.
    pub fn run_frames(
        state: &mut dyn GameLoop,
        input: &KeyboardSnapshot,
        effects: &mut RecordingEffects,
        n: usize,
        dt: f32,
    ) -> Vec<GameEvent> {
        let mut all_events = Vec::new();
        for _ in 0..n {
            let mut ctx = FrameContext::new(dt, input, effects);
            all_events.extend(run_frame(state, &mut ctx));
        }
        all_events
    }
}

use serde::{Deserialize, Serialize};

/// Sound effects the core can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    PlayerJump,
    PlayerDie,
    PlayerExplode,
    WaterCollected,
    LevelWon,
}

/// Player animations the core can request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationCue {
    #[default]
    Idle,
    Run,
    Jump,
    /// Mid-air fall pose (the jump sheet held on a late frame).
    Fall,
    Celebrate,
    Die,
    Explode,
}

/// Fire-and-forget audio/animation sink. The core never waits on completion.
pub trait Effects {
    fn play_sound(&mut self, cue: SoundCue);

    /// `restart` forces the animation back to its first frame even if it is
    /// already playing.
    fn play_animation(&mut self, cue: AnimationCue, restart: bool);
}

/// Sink that drops every cue. Useful for headless simulation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEffects;

impl Effects for NullEffects {
    fn play_sound(&mut self, _cue: SoundCue) {}

    fn play_animation(&mut self, _cue: AnimationCue, _restart: bool) {}
}

use serde::{Deserialize, Serialize};

use ticktick_core::effects::{AnimationCue, Effects, SoundCue};
use ticktick_core::geometry::{Rect, Vec2};
use ticktick_core::input::{InputSnapshot, Key};

use crate::config::{CollisionConfig, PlatformerConfig, TimingConfig};
use crate::jump::JumpTimers;

/// Coarse movement phase, derived from the player's flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Grounded,
    Airborne,
    /// Fell out of the level or exploded.
    Dead,
    Celebrating,
}

/// The keys the player character reacts to, sampled once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInput {
    pub left: bool,
    pub right: bool,
    /// Jump went down this frame.
    pub jump_pressed: bool,
    pub jump_held: bool,
}

impl PlayerInput {
    pub fn from_snapshot(input: &dyn InputSnapshot) -> Self {
        Self {
            left: input.held(Key::Left),
            right: input.held(Key::Right),
            jump_pressed: input.pressed(Key::Jump),
            jump_held: input.held(Key::Jump),
        }
    }
}

/// Kinematic state of the player character.
///
/// `position` is the feet (bottom centre of the sprite) in world units, y
/// pointing down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub position: Vec2,
    pub velocity: Vec2,
    pub grounded: bool,
    pub on_ice: bool,
    pub on_hot: bool,
    pub alive: bool,
    pub jumping: bool,
    pub exploding: bool,
    pub celebrating: bool,
    pub facing_left: bool,
    /// Horizontal speed the input asks for; friction eases towards it.
    pub desired_speed: f32,
    /// Current top speed (walking or boosted).
    pub speed: f32,
    pub animation: AnimationCue,
    pub timers: JumpTimers,
    start: Vec2,
}

impl PlayerState {
    pub fn new(start: Vec2, config: &PlatformerConfig) -> Self {
        Self {
            position: start,
            velocity: Vec2::ZERO,
            grounded: true,
            on_ice: false,
            on_hot: false,
            alive: true,
            jumping: false,
            exploding: false,
            celebrating: false,
            facing_left: false,
            desired_speed: 0.0,
            speed: config.physics.walking_speed,
            animation: AnimationCue::Idle,
            timers: JumpTimers::default(),
            start,
        }
    }

    pub fn start_position(&self) -> Vec2 {
        self.start
    }

    /// Back to the start position, standing and idle.
    pub fn reset(&mut self, config: &PlatformerConfig, fx: &mut dyn Effects) {
        *self = Self::new(self.start, config);
        fx.play_animation(AnimationCue::Idle, true);
    }

    pub fn phase(&self) -> Phase {
        if !self.alive {
            Phase::Dead
        } else if self.celebrating {
            Phase::Celebrating
        } else if self.grounded {
            Phase::Grounded
        } else {
            Phase::Airborne
        }
    }

    /// Not already jumping, alive, and within the coyote window.
    pub fn can_jump(&self, timing: &TimingConfig) -> bool {
        !self.jumping && self.timers.coyote_open(timing) && self.alive
    }

    /// Interacts with tiles, pickups and the goal.
    pub fn can_collide(&self) -> bool {
        self.alive && !self.celebrating
    }

    /// Sprite-sized box standing on `position`.
    pub fn visual_box(&self, c: &CollisionConfig) -> Rect {
        Rect::new(
            self.position.x - c.hitbox_width / 2.0,
            self.position.y - c.hitbox_height,
            c.hitbox_width,
            c.hitbox_height,
        )
    }

    /// Box used against tiles: snapped to whole pixels, narrowed by the inset
    /// on both sides and one unit taller so it touches the floor it stands
    /// on. Whole pixels keep a walk across a floor seam from ever producing
    /// an overlap narrower than the one-unit floor contact.
    pub fn collision_box(&self, c: &CollisionConfig) -> Rect {
        let visual = self.visual_box(c);
        Rect::new(
            visual.x.floor() + c.hitbox_inset,
            visual.y.floor(),
            visual.w - 2.0 * c.hitbox_inset,
            visual.h + 1.0,
        )
    }

    pub fn handle_input(
        &mut self,
        input: &PlayerInput,
        config: &PlatformerConfig,
        fx: &mut dyn Effects,
    ) {
        if !self.can_collide() {
            return;
        }
        let timing = &config.timing;

        // Turning around or letting go of the direction keys ends coyote time.
        if input.left {
            if self.velocity.x > 0.0 {
                self.timers.close_coyote(timing);
            }
            self.facing_left = true;
            self.desired_speed = -self.speed;
            if self.grounded && !self.jumping {
                self.animate(AnimationCue::Run, false, fx);
            }
        } else if input.right {
            if self.velocity.x < 0.0 {
                self.timers.close_coyote(timing);
            }
            self.facing_left = false;
            self.desired_speed = self.speed;
            if self.grounded && !self.jumping {
                self.animate(AnimationCue::Run, false, fx);
            }
        } else {
            self.timers.close_coyote(timing);
            self.desired_speed = 0.0;
            if self.grounded && !self.jumping {
                self.animate(AnimationCue::Idle, false, fx);
            }
        }

        if input.jump_pressed {
            if self.can_jump(timing) {
                self.jump(config.physics.jump_speed, fx);
            } else {
                self.timers.buffer_press();
            }
        } else if input.jump_held && self.timers.in_hold_window(timing) {
            self.jumping = true;
            self.velocity.y = self
                .timers
                .hold_velocity(config.physics.jump_speed, timing);
        }

        if !self.grounded && !self.can_jump(timing) && !self.jumping {
            self.animate(AnimationCue::Fall, false, fx);
        }
    }

    /// Lift off with upward speed `speed`. Also used for bounces, which pass
    /// their own speed.
    pub fn jump(&mut self, speed: f32, fx: &mut dyn Effects) {
        self.jumping = true;
        self.velocity.y = -speed;
        self.timers.start_jump();
        self.animate(AnimationCue::Jump, true, fx);
        fx.play_sound(SoundCue::PlayerJump);
    }

    /// Death by falling: a small hop, then the body drops out of the level.
    pub fn die(&mut self, config: &PlatformerConfig, fx: &mut dyn Effects) {
        self.timers.close_buffer(&config.timing);
        self.alive = false;
        self.animate(AnimationCue::Die, false, fx);
        self.velocity = Vec2::new(0.0, -config.physics.jump_speed);
        fx.play_sound(SoundCue::PlayerDie);
    }

    /// Death by timer: stops in place.
    pub fn explode(&mut self, fx: &mut dyn Effects) {
        self.alive = false;
        self.exploding = true;
        self.animate(AnimationCue::Explode, false, fx);
        self.velocity = Vec2::ZERO;
        fx.play_sound(SoundCue::PlayerExplode);
    }

    /// Level won: stop and stop responding to input.
    pub fn celebrate(&mut self, fx: &mut dyn Effects) {
        self.celebrating = true;
        self.animate(AnimationCue::Celebrate, false, fx);
        self.velocity = Vec2::ZERO;
    }

    /// Switch animation. Re-requesting the current one is a no-op unless
    /// `restart` is set.
    fn animate(&mut self, cue: AnimationCue, restart: bool, fx: &mut dyn Effects) {
        if restart || cue != self.animation {
            self.animation = cue;
            fx.play_animation(cue, restart);
        }
    }
}

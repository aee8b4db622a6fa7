use std::path::Path;

use serde::{Deserialize, Serialize};

use ticktick_level::TileSize;

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV_VAR: &str = "TICKTICK_PLATFORMER_CONFIG";
/// Config file read when the environment variable is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config/platformer.toml";

/// Movement tuning in world units (pixels) and seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub walking_speed: f32,
    /// Top speed while a speed boost is active.
    pub speed_boost_speed: f32,
    /// Lift-off speed of a jump.
    pub jump_speed: f32,
    pub gravity: f32,
    pub max_fall_speed: f32,
    /// Friction factors; closer to 0 is more slippery.
    pub ice_friction: f32,
    pub normal_friction: f32,
    pub air_friction: f32,
    /// Horizontal speeds below this snap to zero.
    pub snap_epsilon: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            walking_speed: 400.0,
            speed_boost_speed: 800.0,
            jump_speed: 700.0,
            gravity: 2300.0,
            max_fall_speed: 1200.0,
            ice_friction: 1.0,
            normal_friction: 20.0,
            air_friction: 10.0,
            snap_epsilon: 1.0,
        }
    }
}

/// Input forgiveness windows, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Grace period after leaving the ground during which a jump still works.
    pub coyote_time: f32,
    /// How long an airborne jump press is remembered.
    pub jump_buffer_time: f32,
    /// Holding jump between these two times after lift-off extends the jump.
    pub jump_hold_start: f32,
    pub jump_hold_end: f32,
    /// Upward speed lost per second of holding.
    pub jump_hold_decay: f32,
    pub speed_boost_time: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            coyote_time: 0.15,
            jump_buffer_time: 0.12,
            jump_hold_start: 0.05,
            jump_hold_end: 0.2,
            jump_hold_decay: 500.0,
            speed_boost_time: 2.0,
        }
    }
}

/// Tile and hitbox geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    pub tile_width: f32,
    pub tile_height: f32,
    /// Player sprite box, anchored at the feet (bottom centre).
    pub hitbox_width: f32,
    pub hitbox_height: f32,
    /// Narrowing of the collision box on each side.
    pub hitbox_inset: f32,
    /// Minimum horizontal overlap for a floor contact.
    pub floor_min_overlap: f32,
    /// Minimum vertical overlap for a ceiling contact.
    pub ceiling_min_overlap: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            tile_width: 72.0,
            tile_height: 55.0,
            hitbox_width: 76.0,
            hitbox_height: 80.0,
            hitbox_inset: 20.0,
            floor_min_overlap: 6.0,
            ceiling_min_overlap: 2.0,
        }
    }
}

impl CollisionConfig {
    pub fn tile_size(&self) -> TileSize {
        TileSize {
            width: self.tile_width,
            height: self.tile_height,
        }
    }
}

/// Top-level platformer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformerConfig {
    /// Countdown speed while standing on a hot surface.
    pub hot_timer_multiplier: f32,
    pub physics: PhysicsConfig,
    pub timing: TimingConfig,
    pub collision: CollisionConfig,
}

impl Default for PlatformerConfig {
    fn default() -> Self {
        Self {
            hot_timer_multiplier: 2.0,
            physics: PhysicsConfig::default(),
            timing: TimingConfig::default(),
            collision: CollisionConfig::default(),
        }
    }
}

impl PlatformerConfig {
    /// Load config from the file named by `TICKTICK_PLATFORMER_CONFIG`, or
    /// `config/platformer.toml`. Falls back to defaults if the file is missing
    /// or unparseable.
    pub fn load() -> Self {
        let path =
            std::env::var(CONFIG_ENV_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(Path::new(&path))
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<PlatformerConfig>(&content) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {e}, using defaults", path.display());
                    PlatformerConfig::default()
                },
            },
            Err(_) => PlatformerConfig::default(),
        }
    }
}

//! The playing state: one level, its player, countdown timer, water drops
//! and goal.

use serde::{Deserialize, Serialize};

use ticktick_core::effects::{Effects, SoundCue};
use ticktick_core::game_loop::{DeathCause, FrameContext, GameEvent, GameLoop};
use ticktick_core::geometry::{Rect, Vec2};
use ticktick_core::input::Key;
use ticktick_core::timer::CountdownTimer;
use ticktick_level::error::Marker;
use ticktick_level::{Cell, Entity, GridPoint, LevelDocument, LevelError, LevelGrid};

use crate::config::PlatformerConfig;
use crate::physics;
use crate::player::{PlayerInput, PlayerState};

/// Opacity change per second of the hot-surface overlay.
const HOT_OVERLAY_RATE: f32 = 2.0;

/// A water drop pickup. All of them must be collected before the goal opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterDrop {
    pub cell: GridPoint,
    pub collected: bool,
}

pub struct LevelSession {
    document: LevelDocument,
    /// `None` for custom levels.
    level_index: Option<u32>,
    config: PlatformerConfig,
    player: PlayerState,
    timer: CountdownTimer,
    drops: Vec<WaterDrop>,
    goal: GridPoint,
    completed: bool,
    /// 0..=1, fades in while the timer runs fast.
    hot_overlay: f32,
    paused: bool,
    timer_was_running: bool,
}

impl LevelSession {
    /// Start playing `document`. Fails unless the grid holds exactly one
    /// player start and one goal.
    pub fn new(
        document: LevelDocument,
        level_index: Option<u32>,
        config: PlatformerConfig,
    ) -> Result<Self, LevelError> {
        document.validate()?;
        let grid = &document.grid;
        let Some(start) = grid.find(Cell::PLAYER) else {
            return Err(LevelError::MarkerCount {
                marker: Marker::Player,
                found: 0,
            });
        };
        let Some(goal) = grid.find(Cell::GOAL) else {
            return Err(LevelError::MarkerCount {
                marker: Marker::Goal,
                found: 0,
            });
        };

        let tile = LevelGrid::cell_rect(start.x, start.y, config.collision.tile_size());
        let feet = Vec2::new(tile.center().x, tile.bottom());
        let drops = grid
            .positions(Cell::Entity(Entity::WaterDrop))
            .map(|cell| WaterDrop {
                cell,
                collected: false,
            })
            .collect();

        tracing::debug!(
            ?level_index,
            width = grid.width(),
            height = grid.height(),
            timer = document.timer_secs,
            "level session started"
        );

        Ok(Self {
            player: PlayerState::new(feet, &config),
            timer: CountdownTimer::new(document.timer_secs as f32),
            document,
            level_index,
            config,
            drops,
            goal,
            completed: false,
            hot_overlay: 0.0,
            paused: false,
            timer_was_running: true,
        })
    }

    pub fn document(&self) -> &LevelDocument {
        &self.document
    }

    pub fn grid(&self) -> &LevelGrid {
        &self.document.grid
    }

    pub fn level_index(&self) -> Option<u32> {
        self.level_index
    }

    pub fn config(&self) -> &PlatformerConfig {
        &self.config
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlayerState {
        &mut self.player
    }

    pub fn timer(&self) -> &CountdownTimer {
        &self.timer
    }

    pub fn drops(&self) -> &[WaterDrop] {
        &self.drops
    }

    pub fn drops_remaining(&self) -> usize {
        self.drops.iter().filter(|d| !d.collected).count()
    }

    pub fn goal(&self) -> GridPoint {
        self.goal
    }

    /// The goal only accepts the player once every drop is collected.
    pub fn goal_active(&self) -> bool {
        self.drops.iter().all(|d| d.collected)
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn hot_overlay(&self) -> f32 {
        self.hot_overlay
    }

    /// Restart the level: player back at the start, every drop restored,
    /// timer full and running.
    pub fn reset(&mut self, fx: &mut dyn Effects) {
        self.player.reset(&self.config, fx);
        for drop in &mut self.drops {
            drop.collected = false;
        }
        self.timer.reset();
        self.timer_was_running = true;
        self.completed = false;
        self.hot_overlay = 0.0;
        tracing::debug!(level_index = ?self.level_index, "level reset");
    }

    fn cell_rect(&self, p: GridPoint) -> Rect {
        LevelGrid::cell_rect(p.x, p.y, self.config.collision.tile_size())
    }

    fn collect_drops(&mut self, fx: &mut dyn Effects) {
        if !self.player.can_collide() {
            return;
        }
        let size = self.config.collision.tile_size();
        let bbox = self.player.visual_box(&self.config.collision);
        for drop in self.drops.iter_mut().filter(|d| !d.collected) {
            if bbox.intersects(&LevelGrid::cell_rect(drop.cell.x, drop.cell.y, size)) {
                drop.collected = true;
                fx.play_sound(SoundCue::WaterCollected);
                tracing::debug!(x = drop.cell.x, y = drop.cell.y, "water drop collected");
            }
        }
    }

    fn update_hot_overlay(&mut self, dt: f32) {
        let target = if self.player.alive && self.timer.multiplier > 1.0 {
            1.0
        } else {
            0.0
        };
        let step = HOT_OVERLAY_RATE * dt;
        self.hot_overlay = if self.hot_overlay < target {
            (self.hot_overlay + step).min(target)
        } else {
            (self.hot_overlay - step).max(target)
        };
    }
}

impl GameLoop for LevelSession {
    fn handle_input(&mut self, ctx: &mut FrameContext<'_>) {
        if !self.player.alive {
            if ctx.input.pressed(Key::Jump) {
                self.reset(ctx.effects);
            }
            return;
        }
        if self.completed {
            return;
        }
        let input = PlayerInput::from_snapshot(ctx.input);
        self.player.handle_input(&input, &self.config, ctx.effects);
    }

    fn update(&mut self, ctx: &mut FrameContext<'_>) -> Vec<GameEvent> {
        if self.paused || !ctx.dt.is_finite() || ctx.dt <= 0.0 {
            return Vec::new();
        }
        let dt = ctx.dt;
        let mut events = Vec::new();

        self.timer.tick(dt);
        let outcome = physics::step(
            &mut self.player,
            &self.document.grid,
            &self.config,
            dt,
            ctx.effects,
        );
        if self.player.alive {
            self.timer.multiplier = if outcome.on_hot {
                self.config.hot_timer_multiplier
            } else {
                1.0
            };
        }
        self.update_hot_overlay(dt);

        if outcome.died {
            self.timer.running = false;
            tracing::info!(level_index = ?self.level_index, "player fell out of the level");
            events.push(GameEvent::PlayerDied {
                cause: DeathCause::Fell,
            });
        }

        self.collect_drops(ctx.effects);

        let touching_goal = self
            .player
            .visual_box(&self.config.collision)
            .intersects(&self.cell_rect(self.goal));
        if !self.completed && self.player.alive && self.goal_active() && touching_goal {
            self.completed = true;
            self.player.celebrate(ctx.effects);
            self.timer.running = false;
            ctx.effects.play_sound(SoundCue::LevelWon);
            tracing::info!(
                level_index = ?self.level_index,
                seconds_left = self.timer.seconds_left(),
                "level completed"
            );
            events.push(GameEvent::LevelCompleted {
                level_index: self.level_index,
            });
        } else if !self.completed && self.player.alive && self.timer.has_passed() {
            self.player.explode(ctx.effects);
            self.timer.running = false;
            tracing::info!(level_index = ?self.level_index, "timer ran out");
            events.push(GameEvent::PlayerDied {
                cause: DeathCause::Exploded,
            });
        }

        events
    }

    fn pause(&mut self) {
        if !self.paused {
            self.timer_was_running = self.timer.running;
            self.timer.running = false;
            self.paused = true;
        }
    }

    fn resume(&mut self) {
        if self.paused {
            self.timer.running = self.timer_was_running;
            self.paused = false;
        }
    }

    fn is_paused(&self) -> bool {
        self.paused
    }
}

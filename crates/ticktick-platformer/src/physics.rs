use serde::{Deserialize, Serialize};

use ticktick_core::effects::Effects;
use ticktick_core::geometry::{Rect, Vec2};
use ticktick_level::{LevelGrid, Surface, TileKind, TileSize};

use crate::config::{CollisionConfig, PlatformerConfig};
use crate::player::PlayerState;

/// What happened during one [`step`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOutcome {
    /// The player fell out of the bottom of the level this step.
    pub died: bool,
    /// The player is alive and standing on a hot surface.
    pub on_hot: bool,
}

/// Longest distance the player moves between two collision passes. Keeps
/// any overlap well under half the collision box, so a fast fall cannot
/// tunnel through a floor.
const MAX_TRAVEL_PER_MOVE: f32 = 8.0;
const MAX_MOVES_PER_STEP: usize = 64;

/// Advance the player by `dt` seconds against `grid`.
///
/// Order: top speed, friction, gravity, integration and tile collisions (in
/// moves of at most [`MAX_TRAVEL_PER_MOVE`]), fall death, then the jump
/// timers (which may fire a buffered jump).
pub fn step(
    player: &mut PlayerState,
    grid: &LevelGrid,
    config: &PlatformerConfig,
    dt: f32,
    fx: &mut dyn Effects,
) -> StepOutcome {
    let mut outcome = StepOutcome::default();
    if !dt.is_finite() || dt <= 0.0 {
        return outcome;
    }
    let physics = &config.physics;
    let timing = &config.timing;

    player.speed = if player.timers.speed_boost_active(timing) {
        physics.speed_boost_speed
    } else {
        physics.walking_speed
    };

    if player.can_collide() {
        let friction = if player.on_ice {
            physics.ice_friction
        } else if player.grounded {
            physics.normal_friction
        } else {
            physics.air_friction
        };
        player.velocity.x = apply_friction(
            player.velocity.x,
            player.desired_speed,
            friction,
            dt,
            physics.snap_epsilon,
        );
    } else {
        player.velocity.x = 0.0;
    }

    // Gravity is suspended during coyote time so walking off a ledge keeps
    // the player level until the window closes.
    if !player.exploding && !player.can_jump(timing) {
        player.velocity.y = (player.velocity.y + physics.gravity * dt).min(physics.max_fall_speed);
    }

    let travel = player.velocity.x.abs().max(player.velocity.y.abs()) * dt;
    let moves = ((travel / MAX_TRAVEL_PER_MOVE).ceil() as usize).clamp(1, MAX_MOVES_PER_STEP);
    let move_dt = dt / moves as f32;
    for _ in 0..moves {
        let previous = player.position;
        player.position += player.velocity * move_dt;
        if player.alive {
            resolve_tile_collisions(player, previous, grid, &config.collision);
        }
    }

    if player.alive {
        let level_bottom = grid.height() as f32 * config.collision.tile_height;
        if player.visual_box(&config.collision).center().y > level_bottom {
            tracing::debug!(y = player.position.y, level_bottom, "player fell out of the level");
            player.die(config, fx);
            outcome.died = true;
        }
        outcome.on_hot = player.alive && player.on_hot;

        player.timers.advance(dt, player.grounded);
        if player.timers.take_buffered_jump(player.grounded, timing) {
            player.jump(physics.jump_speed, fx);
        }
    }

    outcome
}

/// Ease `vx` towards `desired`. The blend factor is `friction * dt` clamped
/// to `[0, 1]`, so the result never passes `desired`. Speeds below
/// `snap_epsilon` snap to zero.
pub fn apply_friction(vx: f32, desired: f32, friction: f32, dt: f32, snap_epsilon: f32) -> f32 {
    let multiplier = (friction * dt).clamp(0.0, 1.0);
    let vx = vx + (desired - vx) * multiplier;
    if vx.abs() < snap_epsilon { 0.0 } else { vx }
}

/// Push the player out of every solid tile its collision box overlaps and
/// record floor contact.
///
/// Scans the tiles under the box plus one tile of margin. An overlap narrower
/// than it is tall is a wall hit, resolved only when moving into the tile.
/// Any other overlap is a floor (falling, from above, wide enough) or a
/// ceiling (rising, from below, tall enough). Wall hits are all resolved
/// before any floor or ceiling, so a wall corner is never mistaken for a
/// ceiling. Platforms only collide from above.
pub fn resolve_tile_collisions(
    player: &mut PlayerState,
    previous: Vec2,
    grid: &LevelGrid,
    c: &CollisionConfig,
) {
    player.grounded = false;
    player.on_ice = false;
    player.on_hot = false;

    let size = c.tile_size();
    let nearby: Vec<(i32, i32, Rect)> = tiles_around(grid, player.collision_box(c), size)
        .filter(|&(_, _, kind, tile)| {
            kind != TileKind::Platform
                || player.position.y <= tile.top()
                || previous.y <= tile.top()
        })
        .map(|(x, y, _, tile)| (x, y, tile))
        .collect();

    for &(_, _, tile) in &nearby {
        // Earlier tiles may already have moved the player.
        let bbox = player.collision_box(c);
        let Some(overlap) = bbox.intersection(&tile) else {
            continue;
        };
        if overlap.w >= overlap.h {
            continue;
        }
        let center_x = bbox.center().x;
        if player.velocity.x >= 0.0 && center_x < tile.left() {
            player.position.x = tile.left() - bbox.w / 2.0;
            player.velocity.x = 0.0;
        } else if player.velocity.x <= 0.0 && center_x > tile.right() {
            player.position.x = tile.right() + bbox.w / 2.0;
            player.velocity.x = 0.0;
        }
    }

    for &(x, y, tile) in &nearby {
        let bbox = player.collision_box(c);
        let Some(overlap) = bbox.intersection(&tile) else {
            continue;
        };
        if overlap.w < overlap.h {
            continue;
        }

        let center_y = bbox.center().y;
        if player.velocity.y >= 0.0
            && center_y < tile.top()
            && overlap.w > c.floor_min_overlap
        {
            player.grounded = true;
            player.jumping = false;
            player.velocity.y = 0.0;
            player.position.y = tile.top();
            match grid.surface(x, y) {
                Surface::Hot => player.on_hot = true,
                Surface::Ice => player.on_ice = true,
                Surface::Speed => player.timers.start_speed_boost(),
                Surface::Normal => {},
            }
        } else if player.velocity.y <= 0.0
            && center_y > tile.bottom()
            && overlap.h > c.ceiling_min_overlap
        {
            player.position.y = tile.bottom() + c.hitbox_height;
            player.velocity.y = 0.0;
        }
    }
}

/// Non-empty tiles under `bbox` plus one tile of margin, row by row.
fn tiles_around(
    grid: &LevelGrid,
    bbox: Rect,
    size: TileSize,
) -> impl Iterator<Item = (i32, i32, TileKind, Rect)> + '_ {
    let top_left = LevelGrid::cell_at(Vec2::new(bbox.left(), bbox.top()), size);
    let bottom_right = LevelGrid::cell_at(Vec2::new(bbox.right(), bbox.bottom()), size);
    (top_left.y - 1..=bottom_right.y + 1)
        .flat_map(move |y| (top_left.x - 1..=bottom_right.x + 1).map(move |x| (x, y)))
        .filter_map(move |(x, y)| match grid.collision_kind(x, y) {
            TileKind::Empty => None,
            kind => Some((x, y, kind, LevelGrid::cell_rect(x, y, size))),
        })
}

use serde::{Deserialize, Serialize};

use ticktick_core::geometry::{Rect, Vec2};

use crate::error::{LevelError, Marker};
use crate::tile::{Cell, Entity, Surface, Tile, TileKind};

/// Size of one grid cell in world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileSize {
    pub width: f32,
    pub height: f32,
}

impl Default for TileSize {
    fn default() -> Self {
        Self {
            width: 72.0,
            height: 55.0,
        }
    }
}

/// Integer grid coordinate. May lie outside the grid (editor targets,
/// collision margins).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}

impl GridPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A level's tile grid. Row-major, `(0, 0)` is the top-left cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelGrid {
    width: usize,
    height: usize,
    /// Cell data stored row-major (y * width + x).
    cells: Vec<Cell>,
}

impl Default for LevelGrid {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl LevelGrid {
    /// An all-empty grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; width * height],
        }
    }

    /// Build from text rows. Short rows are padded with empty cells up to the
    /// longest row.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Self {
        let width = rows
            .iter()
            .map(|r| r.as_ref().chars().count())
            .max()
            .unwrap_or(0);
        let mut grid = Self::new(width, rows.len());
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.as_ref().chars().enumerate() {
                grid.cells[y * width + x] = Cell::from_char(c);
            }
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.in_bounds(x, y)
            .then(|| y as usize * self.width + x as usize)
    }

    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Replace a cell. Returns `false` (and changes nothing) out of bounds.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = cell;
                true
            },
            None => false,
        }
    }

    /// Terrain at `(x, y)`; empty outside the grid.
    pub fn tile(&self, x: i32, y: i32) -> Tile {
        self.cell(x, y).map(Cell::tile).unwrap_or(Tile::EMPTY)
    }

    /// Tile kind as seen by the collision resolver.
    ///
    /// Out-of-range X is a wall so the player cannot leave the level sideways.
    /// Out-of-range Y is empty so a full jump near the top still works and
    /// falling out of the bottom is possible.
    pub fn collision_kind(&self, x: i32, y: i32) -> TileKind {
        if x < 0 || x as usize >= self.width {
            return TileKind::Wall;
        }
        if y < 0 || y as usize >= self.height {
            return TileKind::Empty;
        }
        self.tile(x, y).kind()
    }

    /// Surface at `(x, y)`; normal outside the grid.
    pub fn surface(&self, x: i32, y: i32) -> Surface {
        self.tile(x, y).surface()
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// First position of `cell` in row-major order.
    pub fn find(&self, cell: Cell) -> Option<GridPoint> {
        self.positions(cell).next()
    }

    pub fn positions(&self, cell: Cell) -> impl Iterator<Item = GridPoint> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(move |&(_, &c)| c == cell)
            .map(|(i, _)| self.point_of(i))
    }

    /// Every entity marker with its position, row-major.
    pub fn entities(&self) -> Vec<(GridPoint, Entity)> {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.entity().map(|e| (self.point_of(i), e)))
            .collect()
    }

    fn point_of(&self, index: usize) -> GridPoint {
        GridPoint::new((index % self.width) as i32, (index / self.width) as i32)
    }

    /// Exactly one player start and exactly one goal.
    pub fn validate(&self) -> Result<(), LevelError> {
        validate_marker_counts(self.count(Cell::PLAYER), self.count(Cell::GOAL))
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Row `y` as level-format characters.
    pub fn row_string(&self, y: usize) -> String {
        self.cells[y * self.width..(y + 1) * self.width]
            .iter()
            .map(|c| c.to_char())
            .collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.height).map(|y| self.row_string(y))
    }

    pub(crate) fn column_is_empty(&self, x: usize) -> bool {
        (0..self.height).all(|y| self.cells[y * self.width + x].is_empty())
    }

    pub(crate) fn row_is_empty(&self, y: usize) -> bool {
        self.cells[y * self.width..(y + 1) * self.width]
            .iter()
            .all(|c| c.is_empty())
    }

    /// Grow by the given number of empty columns/rows on each side. Existing
    /// content moves by `(left, top)`.
    pub(crate) fn grow(&mut self, left: usize, top: usize, right: usize, bottom: usize) {
        if left + top + right + bottom == 0 {
            return;
        }
        let new_width = self.width + left + right;
        let new_height = self.height + top + bottom;
        let mut cells = vec![Cell::EMPTY; new_width * new_height];
        for y in 0..self.height {
            let src = y * self.width;
            let dst = (y + top) * new_width + left;
            cells[dst..dst + self.width].copy_from_slice(&self.cells[src..src + self.width]);
        }
        self.width = new_width;
        self.height = new_height;
        self.cells = cells;
    }

    /// Keep only the sub-rectangle starting at `(x0, y0)` of the given size.
    pub(crate) fn crop(&mut self, x0: usize, y0: usize, width: usize, height: usize) {
        let mut cells = Vec::with_capacity(width * height);
        for y in y0..y0 + height {
            let start = y * self.width + x0;
            cells.extend_from_slice(&self.cells[start..start + width]);
        }
        self.width = width;
        self.height = height;
        self.cells = cells;
    }

    /// World-space rectangle of the level.
    pub fn bounds(&self, size: TileSize) -> Rect {
        Rect::new(
            0.0,
            0.0,
            self.width as f32 * size.width,
            self.height as f32 * size.height,
        )
    }

    /// World-space rectangle of cell `(x, y)`.
    pub fn cell_rect(x: i32, y: i32, size: TileSize) -> Rect {
        Rect::new(
            x as f32 * size.width,
            y as f32 * size.height,
            size.width,
            size.height,
        )
    }

    /// Cell containing a world position.
    pub fn cell_at(pos: Vec2, size: TileSize) -> GridPoint {
        GridPoint::new(
            (pos.x / size.width).floor() as i32,
            (pos.y / size.height).floor() as i32,
        )
    }
}

/// Shared cardinality rule for grids and raw text.
pub(crate) fn validate_marker_counts(players: usize, goals: usize) -> Result<(), LevelError> {
    if players != 1 {
        return Err(LevelError::MarkerCount {
            marker: Marker::Player,
            found: players,
        });
    }
    if goals != 1 {
        return Err(LevelError::MarkerCount {
            marker: Marker::Goal,
            found: goals,
        });
    }
    Ok(())
}

//! Interactive grid edits: place, erase, auto-expand and trim.

use serde::{Deserialize, Serialize};

use ticktick_core::geometry::Vec2;

use crate::grid::{GridPoint, LevelGrid, TileSize};
use crate::tile::Cell;

/// Most rows or columns a single placement may add on one side.
pub const MAX_GROWTH: usize = 1024;

/// Empty rows/columns added on each side by an edit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Growth {
    pub left: usize,
    pub top: usize,
    pub right: usize,
    pub bottom: usize,
}

impl Growth {
    pub fn is_none(&self) -> bool {
        *self == Growth::default()
    }

    fn add(&mut self, other: Growth) {
        self.left += other.left;
        self.top += other.top;
        self.right += other.right;
        self.bottom += other.bottom;
    }
}

/// Why an edit was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Refusal {
    /// Erasing never grows the grid.
    EraseOutOfBounds,
    /// The eraser does not remove the player start or the goal.
    ProtectedMarker(Cell),
    /// Reaching the target would grow a side by more than [`MAX_GROWTH`].
    OutOfReach,
}

/// Result of a successful placement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceReport {
    /// Where the placed cell ended up, in post-edit grid coordinates.
    pub at: GridPoint,
    pub growth: Growth,
    /// Other copies of a unique marker that were cleared first.
    pub duplicates_removed: usize,
    /// Markers pushed upward because their cell was overwritten.
    pub displaced: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaceOutcome {
    Placed(PlaceReport),
    Refused(Refusal),
}

impl PlaceOutcome {
    pub fn is_placed(&self) -> bool {
        matches!(self, PlaceOutcome::Placed(_))
    }

    pub fn growth(&self) -> Growth {
        match self {
            PlaceOutcome::Placed(report) => report.growth,
            PlaceOutcome::Refused(_) => Growth::default(),
        }
    }
}

/// Rows/columns removed from each side by [`trim`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrimReport {
    pub left: usize,
    pub top: usize,
    pub right: usize,
    pub bottom: usize,
}

/// Place level character `ch` at `point` (grid coordinates, may be outside
/// the grid).
///
/// - `.` (or any character that decodes as empty) erases: only inside the
///   grid, and never over the player start or goal.
/// - Anything else grows the grid as needed so `point` is inside it. Growth on
///   the left/top shifts existing content right/down. Targets more than
///   [`MAX_GROWTH`] cells beyond an edge are refused and change nothing.
/// - Placing `1` or `X` first clears every other copy of that marker.
/// - Overwriting a `1`/`X` with a different cell moves the old marker one row
///   up, repeatedly if that cell also holds a marker, growing upward if needed.
///   Markers are moved, never merged: a displaced `1` landing on another `1`
///   pushes that one up as well.
pub fn place_tile(grid: &mut LevelGrid, point: GridPoint, ch: char) -> PlaceOutcome {
    let cell = Cell::from_char(ch);
    if cell.is_empty() {
        return erase(grid, point);
    }

    if growth_needed(grid, point).is_none() {
        return PlaceOutcome::Refused(Refusal::OutOfReach);
    }

    let mut report = PlaceReport::default();
    if cell.is_unique_marker() {
        let others: Vec<GridPoint> = grid.positions(cell).filter(|&p| p != point).collect();
        for p in &others {
            grid.set(p.x, p.y, Cell::EMPTY);
        }
        report.duplicates_removed = others.len();
    }

    // Explicit worklist in place of recursive re-placement. Each step moves
    // at most one marker one row up; the chain ends at the first cell that
    // holds no marker.
    let mut pending = vec![(point, cell)];
    let mut first = true;
    while let Some((mut at, placing)) = pending.pop() {
        let displacing = !first;
        let growth = grow_to_contain(grid, at);
        at.x += growth.left as i32;
        at.y += growth.top as i32;
        report.at.x += growth.left as i32;
        report.at.y += growth.top as i32;
        report.growth.add(growth);
        if first {
            report.at = at;
            first = false;
        }

        let existing = grid.cell(at.x, at.y).unwrap_or(Cell::EMPTY);
        grid.set(at.x, at.y, placing);
        // Only the user's own placement of a marker onto itself is a no-op.
        if existing.is_unique_marker() && (existing != placing || displacing) {
            tracing::debug!(marker = %existing.to_char(), x = at.x, y = at.y, "displacing marker upward");
            report.displaced += 1;
            pending.push((GridPoint::new(at.x, at.y - 1), existing));
        }
    }

    if !report.growth.is_none() {
        tracing::debug!(growth = ?report.growth, width = grid.width(), height = grid.height(), "editor grid expanded");
    }
    PlaceOutcome::Placed(report)
}

/// Bounds-checked erase. Refuses the player start and goal.
pub fn erase(grid: &mut LevelGrid, point: GridPoint) -> PlaceOutcome {
    match grid.cell(point.x, point.y) {
        None => PlaceOutcome::Refused(Refusal::EraseOutOfBounds),
        Some(existing) if existing.is_unique_marker() => {
            PlaceOutcome::Refused(Refusal::ProtectedMarker(existing))
        },
        Some(_) => {
            grid.set(point.x, point.y, Cell::EMPTY);
            PlaceOutcome::Placed(PlaceReport {
                at: point,
                ..PlaceReport::default()
            })
        },
    }
}

/// Rows/columns each side must gain to contain `p`, or `None` when a side
/// would need more than [`MAX_GROWTH`].
fn growth_needed(grid: &LevelGrid, p: GridPoint) -> Option<Growth> {
    let (x, y) = (i64::from(p.x), i64::from(p.y));
    let width = grid.width() as i64;
    let height = grid.height() as i64;
    let side = |n: i64| usize::try_from(n.max(0)).ok().filter(|&n| n <= MAX_GROWTH);
    Some(Growth {
        left: side(-x)?,
        top: side(-y)?,
        right: side(x - width + 1)?,
        bottom: side(y - height + 1)?,
    })
}

fn grow_to_contain(grid: &mut LevelGrid, p: GridPoint) -> Growth {
    // Callers check reach up front; a displaced marker only ever needs one row.
    let growth = growth_needed(grid, p).unwrap_or_default();
    grid.grow(growth.left, growth.top, growth.right, growth.bottom);
    growth
}

/// Shrink the grid to the bounding box of its non-empty cells.
///
/// Columns are stripped (left, then right) before rows (top, then bottom);
/// each side stops independently at its first non-empty line. A grid with no
/// content trims to 0x0.
pub fn trim(grid: &mut LevelGrid) -> TrimReport {
    let (width, height) = (grid.width(), grid.height());

    let left = (0..width).take_while(|&x| grid.column_is_empty(x)).count();
    if left == width {
        *grid = LevelGrid::new(0, 0);
        return TrimReport {
            left: width,
            top: height,
            right: 0,
            bottom: 0,
        };
    }
    let right = (left..width)
        .rev()
        .take_while(|&x| grid.column_is_empty(x))
        .count();
    let top = (0..height).take_while(|&y| grid.row_is_empty(y)).count();
    let bottom = (top..height)
        .rev()
        .take_while(|&y| grid.row_is_empty(y))
        .count();

    let report = TrimReport {
        left,
        top,
        right,
        bottom,
    };
    if report != TrimReport::default() {
        grid.crop(left, top, width - left - right, height - top - bottom);
        tracing::debug!(?report, width = grid.width(), height = grid.height(), "editor grid trimmed");
    }
    report
}

/// The editor's grid plus its scroll position.
///
/// `view_offset` maps view tiles to grid tiles: `grid = view + view_offset`.
/// Growth on the left/top and trimming adjust it so that the cell under the
/// pointer does not jump on screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorGrid {
    grid: LevelGrid,
    view_offset: GridPoint,
}

impl EditorGrid {
    pub fn new(grid: LevelGrid) -> Self {
        Self {
            grid,
            view_offset: GridPoint::default(),
        }
    }

    pub fn grid(&self) -> &LevelGrid {
        &self.grid
    }

    pub fn into_grid(self) -> LevelGrid {
        self.grid
    }

    pub fn view_offset(&self) -> GridPoint {
        self.view_offset
    }

    /// Grid cell under a point given in view (screen-world) coordinates.
    pub fn cell_under(&self, view_pos: Vec2, size: TileSize) -> GridPoint {
        let view = LevelGrid::cell_at(view_pos, size);
        GridPoint::new(
            view.x.saturating_add(self.view_offset.x),
            view.y.saturating_add(self.view_offset.y),
        )
    }

    /// View tile at which grid cell `p` is drawn.
    pub fn view_tile_of(&self, p: GridPoint) -> GridPoint {
        GridPoint::new(
            p.x.saturating_sub(self.view_offset.x),
            p.y.saturating_sub(self.view_offset.y),
        )
    }

    pub fn place_tile(&mut self, point: GridPoint, ch: char) -> PlaceOutcome {
        let outcome = place_tile(&mut self.grid, point, ch);
        let growth = outcome.growth();
        self.view_offset.x += growth.left as i32;
        self.view_offset.y += growth.top as i32;
        outcome
    }

    pub fn erase(&mut self, point: GridPoint) -> PlaceOutcome {
        erase(&mut self.grid, point)
    }

    pub fn trim(&mut self) -> TrimReport {
        let report = trim(&mut self.grid);
        self.view_offset.x -= report.left as i32;
        self.view_offset.y -= report.top as i32;
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&str]) -> LevelGrid {
        LevelGrid::from_rows(rows)
    }

    fn rows(g: &LevelGrid) -> Vec<String> {
        g.rows().collect()
    }

    #[test]
    fn place_inside_overwrites_cell() {
        let mut g = grid(&["1.X", "###"]);
        let outcome = place_tile(&mut g, GridPoint::new(1, 0), '-');
        assert!(outcome.is_placed());
        assert_eq!(rows(&g), ["1-X", "###"]);
    }

    #[test]
    fn place_left_of_grid_expands_and_shifts() {
        let mut ed = EditorGrid::new(grid(&["1.X", "###"]));
        let before = ed.view_tile_of(GridPoint::new(-3, 0));

        let outcome = ed.place_tile(GridPoint::new(-3, 0), '#');

        let PlaceOutcome::Placed(report) = outcome else {
            panic!("expected placement");
        };
        assert_eq!(ed.grid().width(), 6);
        assert_eq!(rows(ed.grid()), ["#..1.X", "...###"]);
        assert_eq!(report.at, GridPoint::new(0, 0));
        assert_eq!(report.growth.left, 3);
        // The placed tile is drawn where the pointer was.
        assert_eq!(ed.view_tile_of(report.at), before);
        assert_eq!(ed.view_offset(), GridPoint::new(3, 0));
    }

    #[test]
    fn place_below_and_right_appends() {
        let mut ed = EditorGrid::new(grid(&["1X"]));
        ed.place_tile(GridPoint::new(3, 2), 'I');
        assert_eq!(rows(ed.grid()), ["1X..", "....", "...I"]);
        assert_eq!(ed.view_offset(), GridPoint::new(0, 0));
    }

    #[test]
    fn place_above_prepends_rows() {
        let mut ed = EditorGrid::new(grid(&["1X"]));
        ed.place_tile(GridPoint::new(1, -2), 'W');
        assert_eq!(rows(ed.grid()), [".W", "..", "1X"]);
        assert_eq!(ed.view_offset(), GridPoint::new(0, 2));
    }

    #[test]
    fn placing_player_removes_other_players() {
        let mut g = grid(&["1..", "..1", "X##"]);
        let outcome = place_tile(&mut g, GridPoint::new(1, 1), '1');
        let PlaceOutcome::Placed(report) = outcome else {
            panic!("expected placement");
        };
        assert_eq!(report.duplicates_removed, 2);
        assert_eq!(g.count(Cell::PLAYER), 1);
        assert_eq!(g.find(Cell::PLAYER), Some(GridPoint::new(1, 1)));
    }

    #[test]
    fn placing_goal_outside_still_deduplicates() {
        let mut g = grid(&["1X"]);
        place_tile(&mut g, GridPoint::new(4, 0), 'X');
        assert_eq!(rows(&g), ["1...X"]);
    }

    #[test]
    fn overwritten_marker_moves_up() {
        let mut g = grid(&["...", "1.X", "###"]);
        let outcome = place_tile(&mut g, GridPoint::new(0, 1), '#');
        let PlaceOutcome::Placed(report) = outcome else {
            panic!("expected placement");
        };
        assert_eq!(report.displaced, 1);
        assert_eq!(rows(&g), ["1..", "#.X", "###"]);
    }

    #[test]
    fn displacement_chains_and_grows_upward() {
        // Goal sits directly above the player in the top row's neighbour.
        let mut ed = EditorGrid::new(grid(&["X..", "1..", "###"]));
        // Placing a goal over the player: the old goal is removed first
        // (dedup), then the player is pushed up.
        let outcome = ed.place_tile(GridPoint::new(0, 1), 'X');
        assert!(outcome.is_placed());
        assert_eq!(rows(ed.grid()), ["1..", "X..", "###"]);

        // Walling over the goal pushes it into the player, which is pushed
        // out of the top of the grid.
        let outcome = ed.place_tile(GridPoint::new(0, 1), '#');
        let PlaceOutcome::Placed(report) = outcome else {
            panic!("expected placement");
        };
        assert_eq!(report.displaced, 2);
        assert_eq!(report.growth.top, 1);
        assert_eq!(report.at, GridPoint::new(0, 2));
        assert_eq!(rows(ed.grid()), ["1..", "X..", "#..", "###"]);
        assert_eq!(ed.view_offset(), GridPoint::new(0, 1));
    }

    #[test]
    fn stacked_markers_are_moved_not_merged() {
        // Two player starts in one column (an invalid grid the editor can
        // still be handed). Walling over the lower one pushes both up.
        let mut g = grid(&["1", "1", "#"]);
        let outcome = place_tile(&mut g, GridPoint::new(0, 1), '#');
        let PlaceOutcome::Placed(report) = outcome else {
            panic!("expected placement");
        };
        assert_eq!(rows(&g), ["1", "1", "#", "#"]);
        assert_eq!(report.displaced, 2);
        assert_eq!(report.growth.top, 1);
        assert_eq!(report.at, GridPoint::new(0, 2));
        assert_eq!(g.count(Cell::PLAYER), 2);
    }

    #[test]
    fn far_targets_are_refused_untouched() {
        let mut ed = EditorGrid::new(grid(&["1X"]));
        for point in [
            GridPoint::new(i32::MIN, 0),
            GridPoint::new(i32::MAX, 0),
            GridPoint::new(0, i32::MIN),
            GridPoint::new(0, i32::MAX),
            GridPoint::new(-(MAX_GROWTH as i32) - 1, 0),
        ] {
            assert_eq!(
                ed.place_tile(point, '#'),
                PlaceOutcome::Refused(Refusal::OutOfReach)
            );
        }
        // Refused before the old goal is cleared.
        assert_eq!(
            ed.place_tile(GridPoint::new(i32::MIN, i32::MIN), 'X'),
            PlaceOutcome::Refused(Refusal::OutOfReach)
        );
        assert_eq!(
            ed.erase(GridPoint::new(i32::MIN, i32::MAX)),
            PlaceOutcome::Refused(Refusal::EraseOutOfBounds)
        );
        assert_eq!(rows(ed.grid()), ["1X"]);
        assert_eq!(ed.view_offset(), GridPoint::default());

        // The limit itself is still in reach.
        let far_left = GridPoint::new(-(MAX_GROWTH as i32), 0);
        assert!(ed.place_tile(far_left, '#').is_placed());
        assert_eq!(ed.grid().width(), MAX_GROWTH + 2);
    }

    #[test]
    fn pointer_far_off_screen_does_not_overflow() {
        let size = TileSize::default();
        let mut ed = EditorGrid::new(grid(&["1X"]));
        ed.place_tile(GridPoint::new(-3, -2), '#');
        assert_eq!(ed.view_offset(), GridPoint::new(3, 2));

        let target = ed.cell_under(Vec2::new(f32::INFINITY, f32::MAX), size);
        assert_eq!(target, GridPoint::new(i32::MAX, i32::MAX));
        assert_eq!(
            ed.place_tile(target, '#'),
            PlaceOutcome::Refused(Refusal::OutOfReach)
        );
        assert_eq!(
            ed.view_tile_of(GridPoint::new(i32::MIN, i32::MIN)),
            GridPoint::new(i32::MIN, i32::MIN)
        );
    }

    #[test]
    fn same_marker_over_itself_is_noop() {
        let mut g = grid(&["1X"]);
        let outcome = place_tile(&mut g, GridPoint::new(0, 0), '1');
        let PlaceOutcome::Placed(report) = outcome else {
            panic!("expected placement");
        };
        assert_eq!(report.displaced, 0);
        assert_eq!(rows(&g), ["1X"]);
    }

    #[test]
    fn erase_refuses_markers() {
        let mut g = grid(&["1X#"]);
        assert_eq!(
            place_tile(&mut g, GridPoint::new(0, 0), '.'),
            PlaceOutcome::Refused(Refusal::ProtectedMarker(Cell::PLAYER))
        );
        assert_eq!(
            place_tile(&mut g, GridPoint::new(1, 0), '.'),
            PlaceOutcome::Refused(Refusal::ProtectedMarker(Cell::GOAL))
        );
        assert!(place_tile(&mut g, GridPoint::new(2, 0), '.').is_placed());
        assert_eq!(rows(&g), ["1X."]);
    }

    #[test]
    fn erase_out_of_bounds_refused_without_growth() {
        let mut ed = EditorGrid::new(grid(&["1X"]));
        assert_eq!(
            ed.erase(GridPoint::new(-1, 0)),
            PlaceOutcome::Refused(Refusal::EraseOutOfBounds)
        );
        assert_eq!(
            ed.place_tile(GridPoint::new(5, 5), '.'),
            PlaceOutcome::Refused(Refusal::EraseOutOfBounds)
        );
        assert_eq!(ed.grid().width(), 2);
        assert_eq!(ed.grid().height(), 1);
    }

    #[test]
    fn place_into_empty_grid() {
        let mut g = LevelGrid::new(0, 0);
        place_tile(&mut g, GridPoint::new(0, 0), '#');
        assert_eq!(rows(&g), ["#"]);
    }

    #[test]
    fn trim_strips_empty_border() {
        let mut ed = EditorGrid::new(grid(&[".....", "..1..", ".#X..", "....."]));
        let report = ed.trim();
        assert_eq!(
            report,
            TrimReport {
                left: 1,
                top: 1,
                right: 2,
                bottom: 1
            }
        );
        assert_eq!(rows(ed.grid()), [".1", "#X"]);
        assert_eq!(ed.view_offset(), GridPoint::new(-1, -1));
    }

    #[test]
    fn trim_keeps_interior_gaps() {
        let mut g = grid(&["#...#", ".....", "#...."]);
        assert_eq!(trim(&mut g), TrimReport::default());
        assert_eq!(g.height(), 3);
    }

    #[test]
    fn trim_all_empty_gives_zero_by_zero() {
        let mut g = grid(&["...", "..."]);
        trim(&mut g);
        assert_eq!((g.width(), g.height()), (0, 0));
        assert_eq!(trim(&mut g), TrimReport::default());
    }

    #[test]
    fn cell_under_pointer_follows_offset() {
        let size = TileSize::default();
        let mut ed = EditorGrid::new(grid(&["1X"]));
        let pointer = Vec2::new(-3.0 * 72.0 + 10.0, 20.0);
        let target = ed.cell_under(pointer, size);
        assert_eq!(target, GridPoint::new(-3, 0));
        ed.place_tile(target, '#');
        // After growth the same pointer position resolves to the new tile.
        assert_eq!(ed.cell_under(pointer, size), GridPoint::new(0, 0));
        assert_eq!(ed.grid().cell(0, 0), Some(Cell::from_char('#')));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn any_grid() -> impl Strategy<Value = LevelGrid> {
            proptest::collection::vec("[.#\\-1XW]{1,8}", 1..8)
                .prop_map(|rows| LevelGrid::from_rows(&rows))
        }

        /// Terrain with at most one player start and one goal.
        fn marked_grid() -> impl Strategy<Value = LevelGrid> {
            (1usize..8, 1usize..8).prop_flat_map(|(w, h)| {
                (
                    proptest::collection::vec(proptest::sample::select(vec!['.', '#', '-', 'W']), w * h),
                    proptest::option::of(0..w * h),
                    proptest::option::of(0..w * h),
                )
                    .prop_map(move |(mut chars, player, goal)| {
                        if let Some(p) = player {
                            chars[p] = '1';
                        }
                        if let Some(g) = goal {
                            chars[g] = 'X';
                        }
                        let rows: Vec<String> = chars.chunks(w).map(|r| r.iter().collect()).collect();
                        LevelGrid::from_rows(&rows)
                    })
            })
        }

        proptest! {
            #[test]
            fn trim_is_idempotent(g in any_grid()) {
                let mut once = g.clone();
                trim(&mut once);
                let mut twice = once.clone();
                let second = trim(&mut twice);
                prop_assert_eq!(&once, &twice);
                prop_assert_eq!(second, TrimReport::default());
            }

            #[test]
            fn trim_preserves_content(g in any_grid()) {
                let mut t = g.clone();
                trim(&mut t);
                let non_empty = |grid: &LevelGrid| {
                    grid.rows().flat_map(|r| r.chars().collect::<Vec<_>>()).filter(|&c| c != '.').count()
                };
                prop_assert_eq!(non_empty(&g), non_empty(&t));
            }

            #[test]
            fn placement_keeps_markers_unique(
                g in marked_grid(),
                x in -4i32..12,
                y in -4i32..12,
                ch in proptest::sample::select(vec!['#', '-', '1', 'X', 'W', 'i']),
            ) {
                let mut g = g;
                let players_before = g.count(Cell::PLAYER);
                let goals_before = g.count(Cell::GOAL);
                place_tile(&mut g, GridPoint::new(x, y), ch);
                let players = g.count(Cell::PLAYER);
                let goals = g.count(Cell::GOAL);
                if ch == '1' {
                    prop_assert_eq!(players, 1);
                } else {
                    // Existing markers are moved, never destroyed.
                    prop_assert_eq!(players, players_before);
                }
                if ch == 'X' {
                    prop_assert_eq!(goals, 1);
                } else {
                    prop_assert_eq!(goals, goals_before);
                }
            }

            #[test]
            fn growth_preserves_existing_cells(
                g in marked_grid(),
                x in -4i32..12,
                y in -4i32..12,
            ) {
                let original = g.clone();
                // A marker under the target is pushed up its column.
                let column_disturbed = original.cell(x, y).is_some_and(|c| c.is_unique_marker());
                let mut ed = EditorGrid::new(g);
                ed.place_tile(GridPoint::new(x, y), 'W');
                let off = ed.view_offset();
                for oy in 0..original.height() as i32 {
                    for ox in 0..original.width() as i32 {
                        if (ox, oy) == (x, y) || (column_disturbed && ox == x) {
                            continue;
                        }
                        let before = original.cell(ox, oy);
                        let after = ed.grid().cell(ox + off.x, oy + off.y);
                        prop_assert_eq!(before, after);
                    }
                }
            }
        }
    }
}

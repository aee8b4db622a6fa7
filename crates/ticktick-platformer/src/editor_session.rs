//! The level editor state: the editable grid plus the document metadata the
//! editor's HUD edits (name, description, timer) and the selected brush.

use ticktick_core::game_loop::{FrameContext, GameEvent, GameLoop};
use ticktick_core::input::Key;
use ticktick_level::editor::PlaceOutcome;
use ticktick_level::{
    Cell, EditorGrid, GridPoint, LevelDocument, LevelError, LevelGrid, LevelLibrary,
    LibraryError, SaveOutcome, TileSize, TrimReport,
};

use crate::config::PlatformerConfig;
use crate::session::LevelSession;

pub const DEFAULT_NAME: &str = "Name";
pub const DEFAULT_DESCRIPTION: &str = "Description";
pub const DEFAULT_TIMER_SECS: u32 = 30;

/// Grid a new level starts from: a start, a goal and a floor.
const STARTER_ROWS: [&str; 2] = ["1..X", "####"];

pub struct EditorSession {
    grid: EditorGrid,
    name: String,
    description: String,
    timer_secs: u32,
    brush: Cell,
    tile_size: TileSize,
    paused: bool,
}

impl EditorSession {
    pub fn new(tile_size: TileSize) -> Self {
        Self::open(
            DEFAULT_NAME,
            LevelDocument::new(
                DEFAULT_DESCRIPTION,
                DEFAULT_TIMER_SECS,
                LevelGrid::from_rows(&STARTER_ROWS),
            ),
            tile_size,
        )
    }

    /// Edit an existing document under `name`.
    pub fn open(name: impl Into<String>, document: LevelDocument, tile_size: TileSize) -> Self {
        Self {
            grid: EditorGrid::new(document.grid),
            name: name.into(),
            description: document.description,
            timer_secs: document.timer_secs.max(1),
            brush: Cell::from_char('#'),
            tile_size,
            paused: false,
        }
    }

    pub fn grid(&self) -> &LevelGrid {
        self.grid.grid()
    }

    pub fn editor_grid(&self) -> &EditorGrid {
        &self.grid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn timer_secs(&self) -> u32 {
        self.timer_secs
    }

    /// Coarse steps of ten from ten seconds up, single seconds below.
    pub fn timer_up(&mut self) {
        self.timer_secs += if self.timer_secs >= 10 { 10 } else { 1 };
    }

    /// Mirror of [`timer_up`](Self::timer_up), never below one second.
    pub fn timer_down(&mut self) {
        self.timer_secs = if self.timer_secs > 10 {
            self.timer_secs - 10
        } else {
            self.timer_secs.saturating_sub(1).max(1)
        };
    }

    pub fn brush(&self) -> Cell {
        self.brush
    }

    /// Pick the cell to paint with. `.` (or any unknown character) selects
    /// the eraser.
    pub fn select_brush(&mut self, ch: char) {
        self.brush = Cell::from_char(ch);
    }

    /// Paint the brush at grid cell `point`.
    pub fn paint(&mut self, point: GridPoint) -> PlaceOutcome {
        self.grid.place_tile(point, self.brush.to_char())
    }

    pub fn erase(&mut self, point: GridPoint) -> PlaceOutcome {
        self.grid.erase(point)
    }

    pub fn trim(&mut self) -> TrimReport {
        self.grid.trim()
    }

    /// The level as it would be saved or played.
    pub fn document(&self) -> LevelDocument {
        LevelDocument::new(
            self.description.clone(),
            self.timer_secs,
            self.grid.grid().clone(),
        )
    }

    /// Write the level under the current name. An invalid level is not
    /// written and comes back as [`SaveOutcome::Rejected`].
    pub fn save(&self, library: &LevelLibrary) -> Result<SaveOutcome, LibraryError> {
        library.save(&self.name, &self.document())
    }

    /// Test-play the level. Custom levels carry no level index.
    pub fn play(&self, config: PlatformerConfig) -> Result<LevelSession, LevelError> {
        LevelSession::new(self.document(), None, config)
    }
}

impl GameLoop for EditorSession {
    fn handle_input(&mut self, ctx: &mut FrameContext<'_>) {
        let Some(pointer) = ctx.input.pointer_world() else {
            return;
        };
        let target = self.grid.cell_under(pointer, self.tile_size);
        let outcome = if ctx.input.held(Key::PointerPrimary) {
            self.paint(target)
        } else if ctx.input.held(Key::PointerSecondary) {
            self.erase(target)
        } else {
            return;
        };
        if let PlaceOutcome::Refused(reason) = outcome {
            tracing::trace!(?reason, x = target.x, y = target.y, "edit refused");
        }
    }

    fn update(&mut self, _ctx: &mut FrameContext<'_>) -> Vec<GameEvent> {
        Vec::new()
    }

    ticktick_core::game_loop_pause_boilerplate!();
}

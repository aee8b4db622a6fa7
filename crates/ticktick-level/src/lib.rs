pub mod editor;
pub mod error;
pub mod format;
pub mod grid;
pub mod library;
pub mod tile;

pub use editor::{EditorGrid, PlaceOutcome, TrimReport};
pub use error::{LevelError, LibraryError};
pub use format::LevelDocument;
pub use grid::{GridPoint, LevelGrid, TileSize};
pub use library::{LevelLibrary, SaveOutcome};
pub use tile::{Cell, Entity, Surface, Tile, TileKind};

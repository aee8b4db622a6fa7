pub mod config;
pub mod editor_session;
pub mod jump;
pub mod physics;
pub mod player;
pub mod session;

pub use config::PlatformerConfig;
pub use editor_session::EditorSession;
pub use physics::{StepOutcome, step};
pub use player::{Phase, PlayerInput, PlayerState};
pub use session::{LevelSession, WaterDrop};

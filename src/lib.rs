pub mod assets;
pub mod clock;
pub mod collision;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod hud;
pub mod input;
pub mod spawner;
pub mod state;

pub use compute::{FrameView, Simulation};
pub use config::GameConfig;
pub use error::{ConfigError, GameError};
pub use state::{GamePhase, GameState};

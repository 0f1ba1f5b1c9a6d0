//! Game lifecycle state.
//!
//! Transitions the loop and host request:
//!
//! | from        | to          | trigger               |
//! |-------------|-------------|-----------------------|
//! | Loading     | StartScreen | assets finished       |
//! | StartScreen | Playing     | start action          |
//! | Playing     | Paused      | Escape (no way back)  |
//! | Playing     | GameOver    | lives reach zero      |
//!
//! `GameState::set` does not check this table; callers own legality.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GamePhase {
    Loading,
    StartScreen,
    Playing,
    Paused,
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Loading => "loading",
            GamePhase::StartScreen => "start_screen",
            GamePhase::Playing => "playing",
            GamePhase::Paused => "paused",
            GamePhase::GameOver => "game_over",
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    current: GamePhase,
    previous: Option<GamePhase>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            current: GamePhase::Loading,
            previous: None,
        }
    }

    /// Unconditional transition.  Logged at debug level.
    pub fn set(&mut self, next: GamePhase) {
        let prev = self.current;
        self.previous = Some(prev);
        self.current = next;
        tracing::debug!(from = %prev, to = %next, "game state changed");
    }

    pub fn current(&self) -> GamePhase {
        self.current
    }

    pub fn previous(&self) -> Option<GamePhase> {
        self.previous
    }

    pub fn is_loading(&self) -> bool {
        self.current == GamePhase::Loading
    }

    pub fn is_playing(&self) -> bool {
        self.current == GamePhase::Playing
    }
}

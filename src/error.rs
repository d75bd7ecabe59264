//! Error types shared by configuration, maze parsing, phases and storage

use thiserror::Error;

use crate::sim::GamePhase;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Unknown maze character {ch:?} at ({x}, {y})")]
    UnknownMazeChar { ch: char, x: usize, y: usize },

    #[error("Maze layout is empty")]
    EmptyLayout,

    #[error("Invalid state transition from {from:?} to {to:?}")]
    InvalidTransition { from: GamePhase, to: GamePhase },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {reason}")]
    Storage { reason: String },

    #[error("Render error: {reason}")]
    Render { reason: String },
}

pub type Result<T> = std::result::Result<T, GameError>;

//! Centralized error types for the maze game.
//!
//! This module defines all error types used throughout the crate,
//! providing a consistent error handling approach.

use std::io;
use std::path::PathBuf;

use bevy_ecs::event::Event;

/// Main error type for the maze game.
///
/// This is the primary error type that should be used in public APIs.
/// It can represent any error that can occur during game operation. Systems
/// report failures by writing it as an event; [`crate::game::Game::tick`] surfaces them.
#[derive(thiserror::Error, Debug, Event)]
pub enum GameError {
    #[error("Level format error: {0}")]
    Format(#[from] FormatError),

    #[error("Range error: {0}")]
    Range(#[from] RangeError),

    #[error("Texture error: {0}")]
    Texture(#[from] TextureError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// A malformed level description. Fatal to the level load; no partial map is produced.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Level source is empty")]
    Empty,

    #[error("Row {row} has length {found}, expected {expected}")]
    NotRectangular { row: usize, expected: usize, found: usize },

    #[error("Level has no player spawn")]
    MissingSpawn,

    #[error("Level has {0} player spawns, expected exactly one")]
    MultipleSpawns(usize),

    #[error("Mechanism trigger '{0}' has no matching target")]
    UnpairedTrigger(char),

    #[error("Mechanism target '{0}' has no matching trigger")]
    UnpairedTarget(char),

    #[error("Mechanism letter '{0}' appears more than once")]
    DuplicateMechanism(char),

    #[error("Invalid legend entry on line {line}: {reason}")]
    InvalidLegend { line: usize, reason: String },
}

/// A coordinate query outside the grid bounds.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Coordinate ({x}, {y}) is outside the {width}x{height} grid")]
pub struct RangeError {
    pub x: i32,
    pub y: i32,
    pub width: usize,
    pub height: usize,
}

/// Errors related to texture operations.
#[derive(thiserror::Error, Debug)]
pub enum TextureError {
    #[error("Texture not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to load texture {path}: {source}")]
    LoadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;

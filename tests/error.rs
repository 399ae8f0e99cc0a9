use std::io;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use speculoos::prelude::*;
use tilemaze::error::{FormatError, GameError, GameResult, RangeError, TextureError};

#[test]
fn test_game_error_from_format_error() {
    let error: GameError = FormatError::MissingSpawn.into();
    assert_that(&matches!(error, GameError::Format(FormatError::MissingSpawn))).is_true();
}

#[test]
fn test_game_error_from_range_error() {
    let range = RangeError {
        x: 9,
        y: -1,
        width: 5,
        height: 4,
    };
    let error: GameError = range.into();
    assert_that(&matches!(error, GameError::Range(r) if r == range)).is_true();
}

#[test]
fn test_game_error_from_io_error() {
    let error: GameError = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
    assert_that(&matches!(error, GameError::Io(_))).is_true();
}

#[test]
fn test_game_error_from_texture_error() {
    let error: GameError = TextureError::NotFound(PathBuf::from("sprites/x.png")).into();
    assert_that(&matches!(error, GameError::Texture(TextureError::NotFound(_)))).is_true();
}

#[test]
fn test_error_messages() {
    assert_eq!(
        FormatError::NotRectangular {
            row: 2,
            expected: 5,
            found: 3
        }
        .to_string(),
        "Row 2 has length 3, expected 5"
    );
    assert_eq!(
        RangeError {
            x: 7,
            y: 1,
            width: 5,
            height: 4
        }
        .to_string(),
        "Coordinate (7, 1) is outside the 5x4 grid"
    );
    assert_eq!(
        GameError::from(FormatError::UnpairedTarget('D')).to_string(),
        "Level format error: Mechanism target 'D' has no matching trigger"
    );
    assert_eq!(
        GameError::InvalidState("no player".to_string()).to_string(),
        "Invalid state: no player"
    );
}

#[test]
fn test_question_mark_propagation() {
    fn load(source: &str) -> GameResult<usize> {
        let map = tilemaze::map::builder::Map::load(source)?;
        Ok(map.width())
    }

    assert_that(&load("#P#").unwrap()).is_equal_to(3);
    assert_that(&matches!(load(""), Err(GameError::Format(FormatError::Empty)))).is_true();
}

//! Map construction and querying functionality.

use bevy_ecs::resource::Resource;
use glam::IVec2;
use tracing::debug;

use crate::constants::glyph;
use crate::error::{FormatError, RangeError};
use crate::map::mechanism::MechanismPair;
use crate::map::parser::LevelParser;
use crate::map::sight;

/// The loaded level grid with the positions derived from it at load time.
///
/// The grid never changes after loading, except through [`Map::clear_cell`].
#[derive(Resource, Debug, Clone)]
pub struct Map {
    width: usize,
    height: usize,
    /// Row-major cell characters.
    cells: Vec<char>,
    pub player_spawn: IVec2,
    pub enemy_spawns: Vec<IVec2>,
    /// Keys still lying on the grid.
    pub keys: Vec<IVec2>,
    pub spikes: Vec<IVec2>,
    pub exit: Option<IVec2>,
    /// Mechanism pairs in ascending id order.
    pub mechanisms: Vec<MechanismPair>,
    /// Number of keys present when the level was loaded.
    pub total_keys: u32,
}

impl Map {
    /// Parses and validates a level description.
    ///
    /// No partial map is ever returned; any malformation fails the whole load.
    pub fn load(source: &str) -> Result<Map, FormatError> {
        let parsed = LevelParser::parse(source)?;

        debug!(
            width = parsed.width,
            height = parsed.height,
            enemies = parsed.enemy_spawns.len(),
            keys = parsed.keys.len(),
            mechanisms = parsed.mechanisms.len(),
            "Level loaded"
        );

        Ok(Map {
            width: parsed.width,
            height: parsed.height,
            cells: parsed.cells,
            player_spawn: parsed.player_spawn,
            enemy_spawns: parsed.enemy_spawns,
            total_keys: parsed.keys.len() as u32,
            keys: parsed.keys,
            spikes: parsed.spikes,
            exit: parsed.exit,
            mechanisms: parsed.mechanisms,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns true if `(x, y)` lies inside the grid.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    fn index(&self, x: i32, y: i32) -> Result<usize, RangeError> {
        if self.in_bounds(x, y) {
            Ok(y as usize * self.width + x as usize)
        } else {
            Err(RangeError {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Returns the character at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns a [`RangeError`] for coordinates outside the grid; they are never clamped.
    pub fn at(&self, x: i32, y: i32) -> Result<char, RangeError> {
        self.index(x, y).map(|i| self.cells[i])
    }

    pub fn at_tile(&self, tile: IVec2) -> Result<char, RangeError> {
        self.at(tile.x, tile.y)
    }

    /// Returns true if the cell is inside the grid and not a wall.
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.at(x, y).is_ok_and(|c| c != glyph::WALL)
    }

    /// Like [`Map::is_walkable`], but enemies also stay off the exit and off
    /// mechanism target cells. Trigger cells remain walkable.
    pub fn is_walkable_for_enemy(&self, x: i32, y: i32) -> bool {
        self.at(x, y)
            .is_ok_and(|c| c != glyph::WALL && c != glyph::EXIT && !glyph::is_target(c))
    }

    /// Returns true if `tile` holds the exit character.
    pub fn is_exit(&self, tile: IVec2) -> bool {
        self.at_tile(tile).is_ok_and(|c| c == glyph::EXIT)
    }

    /// Replaces a cell with floor, keeping the key list consistent.
    pub fn clear_cell(&mut self, x: i32, y: i32) -> Result<(), RangeError> {
        let i = self.index(x, y)?;
        self.cells[i] = glyph::FLOOR;
        let tile = IVec2::new(x, y);
        self.keys.retain(|&key| key != tile);
        Ok(())
    }

    /// Returns true if no wall lies strictly between `from` and `to`.
    pub fn line_of_sight(&self, from: IVec2, to: IVec2) -> bool {
        sight::line_of_sight(from, to, |tile| self.at_tile(tile).is_ok_and(|c| c == glyph::WALL))
    }

    /// Iterates over the rows of the grid as strings.
    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        self.cells.chunks(self.width).map(|row| row.iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_cell_removes_key() {
        let mut map = Map::load("#####\n#PK.#\n#####").unwrap();
        assert_eq!(map.keys, vec![IVec2::new(2, 1)]);
        map.clear_cell(2, 1).unwrap();
        assert_eq!(map.at(2, 1).unwrap(), '.');
        assert!(map.keys.is_empty());
        assert_eq!(map.total_keys, 1);
    }

    #[test]
    fn test_clear_cell_out_of_range() {
        let mut map = Map::load("#P#").unwrap();
        assert!(map.clear_cell(3, 0).is_err());
        assert!(map.clear_cell(-1, 0).is_err());
    }

    #[test]
    fn test_rows_round_trip() {
        let source = "#####\n#P.X#\n#####";
        let map = Map::load(source).unwrap();
        assert_eq!(map.rows().collect::<Vec<_>>().join("\n"), source);
    }
}

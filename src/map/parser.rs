//! Level parsing functionality for converting raw level text into structured data.

use std::collections::BTreeMap;
use std::str::FromStr;

use glam::IVec2;
use tracing::warn;

use crate::constants::glyph;
use crate::error::FormatError;
use crate::map::mechanism::{MechanismKind, MechanismPair};

/// Marks a comment line in the legend section.
const LEGEND_COMMENT: &str = "//";

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// A line after the grid that reads as one more grid row rather than a legend entry.
fn is_stray_row(line: &str, width: usize) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty()
        && !trimmed.starts_with(LEGEND_COMMENT)
        && !trimmed.contains('=')
        && line.chars().count() == width
}

/// Structured representation of a parsed level with its derived positions.
///
/// Produced only for valid levels: rectangular, exactly one player spawn and
/// every mechanism letter paired with its counterpart.
#[derive(Debug, Clone)]
pub struct ParsedLevel {
    pub width: usize,
    pub height: usize,
    /// Row-major cell characters.
    pub cells: Vec<char>,
    pub player_spawn: IVec2,
    pub enemy_spawns: Vec<IVec2>,
    pub keys: Vec<IVec2>,
    pub spikes: Vec<IVec2>,
    pub exit: Option<IVec2>,
    /// Mechanism pairs in ascending id order.
    pub mechanisms: Vec<MechanismPair>,
}

/// Parser for the plain-text level format.
///
/// The grid comes first, one row per line. An optional legend follows after a
/// blank line, tagging mechanism ids with their kind (`d = Door`). Lines in the
/// legend starting with `//` are comments. Whitespace-only lines count as blank.
pub struct LevelParser;

impl LevelParser {
    /// Parses a level description.
    ///
    /// # Errors
    ///
    /// Returns a [`FormatError`] if the source is empty, the grid is not
    /// rectangular, the player spawn is missing or repeated, a mechanism letter
    /// is unpaired or repeated, or a legend line is malformed.
    pub fn parse(source: &str) -> Result<ParsedLevel, FormatError> {
        let lines: Vec<&str> = source.split('\n').map(|line| line.trim_end_matches('\r')).collect();

        let first_row = lines.iter().position(|line| !is_blank(line)).ok_or(FormatError::Empty)?;
        let grid_len = lines[first_row..]
            .iter()
            .position(|line| is_blank(line))
            .unwrap_or(lines.len() - first_row);
        let rows = &lines[first_row..first_row + grid_len];
        let legend_start = first_row + grid_len;

        let width = rows[0].chars().count();
        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(FormatError::NotRectangular {
                    row,
                    expected: width,
                    found,
                });
            }
        }

        // A blank line only ends the grid if no row of grid width follows it.
        if lines[legend_start..].iter().any(|line| is_stray_row(line, width)) {
            return Err(FormatError::NotRectangular {
                row: grid_len,
                expected: width,
                found: lines[legend_start].chars().count(),
            });
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        let mut spawns = Vec::new();
        let mut enemy_spawns = Vec::new();
        let mut keys = Vec::new();
        let mut spikes = Vec::new();
        let mut exit = None;
        let mut triggers: BTreeMap<char, IVec2> = BTreeMap::new();
        let mut targets: BTreeMap<char, IVec2> = BTreeMap::new();

        for (y, line) in rows.iter().enumerate() {
            for (x, c) in line.chars().enumerate() {
                let pos = IVec2::new(x as i32, y as i32);
                match c {
                    glyph::PLAYER_SPAWN => spawns.push(pos),
                    glyph::ENEMY_SPAWN => enemy_spawns.push(pos),
                    glyph::KEY => keys.push(pos),
                    glyph::SPIKE => spikes.push(pos),
                    glyph::EXIT => {
                        if exit.is_some() {
                            warn!(x, y, "Level has more than one exit; the first one is reported");
                        } else {
                            exit = Some(pos);
                        }
                    }
                    c if glyph::is_trigger(c) => {
                        if triggers.insert(c, pos).is_some() {
                            return Err(FormatError::DuplicateMechanism(c));
                        }
                    }
                    c if glyph::is_target(c) => {
                        if targets.insert(c.to_ascii_lowercase(), pos).is_some() {
                            return Err(FormatError::DuplicateMechanism(c));
                        }
                    }
                    _ => {}
                }
                cells.push(c);
            }
        }

        let player_spawn = match spawns.as_slice() {
            [] => return Err(FormatError::MissingSpawn),
            [spawn] => *spawn,
            _ => return Err(FormatError::MultipleSpawns(spawns.len())),
        };

        if let Some(id) = triggers.keys().find(|id| !targets.contains_key(id)) {
            return Err(FormatError::UnpairedTrigger(*id));
        }
        if let Some(id) = targets.keys().find(|id| !triggers.contains_key(id)) {
            return Err(FormatError::UnpairedTarget(id.to_ascii_uppercase()));
        }

        let kinds = Self::parse_legend(&lines[legend_start..], legend_start)?;

        let mechanisms = triggers
            .iter()
            .map(|(&id, &trigger)| MechanismPair {
                id,
                kind: kinds.get(&id).copied().unwrap_or_else(|| MechanismKind::default_for(id)),
                trigger,
                target: targets[&id],
            })
            .collect::<Vec<_>>();

        for id in kinds.keys().filter(|id| !triggers.contains_key(id)) {
            warn!(id = %id, "Legend tags a mechanism that does not appear in the grid");
        }

        Ok(ParsedLevel {
            width,
            height: rows.len(),
            cells,
            player_spawn,
            enemy_spawns,
            keys,
            spikes,
            exit,
            mechanisms,
        })
    }

    /// Parses legend lines into a map from mechanism id to kind.
    ///
    /// `offset` is the index of the first legend line within the whole source, used for error reporting.
    fn parse_legend(lines: &[&str], offset: usize) -> Result<BTreeMap<char, MechanismKind>, FormatError> {
        let mut kinds = BTreeMap::new();

        for (i, raw) in lines.iter().enumerate() {
            let line_no = offset + i + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with(LEGEND_COMMENT) {
                continue;
            }

            let invalid = |reason: String| FormatError::InvalidLegend { line: line_no, reason };

            let (id, kind) = line
                .split_once('=')
                .ok_or_else(|| invalid(format!("expected `<letter> = <kind>`, got {line:?}")))?;

            let mut id_chars = id.trim().chars();
            let id = match (id_chars.next(), id_chars.next()) {
                (Some(c), None) if glyph::is_trigger(c.to_ascii_lowercase()) => c.to_ascii_lowercase(),
                _ => return Err(invalid(format!("{:?} is not a mechanism letter", id.trim()))),
            };

            let kind = MechanismKind::from_str(kind.trim())
                .map_err(|_| invalid(format!("unknown mechanism kind {:?}", kind.trim())))?;

            if kinds.insert(id, kind).is_some() {
                return Err(invalid(format!("mechanism '{id}' is tagged twice")));
            }
        }

        Ok(kinds)
    }
}

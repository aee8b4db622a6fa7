//! Plain-text level format.
//!
//! ```text
//! <description>
//! <timer seconds>
//! <grid row 0>
//! ...
//! <grid row N>
//! ```
//!
//! One character per cell (see [`Cell::from_char`]). Rows may differ in
//! length; the grid is as wide as the longest row. Serialized documents have
//! no trailing newline.

use serde::{Deserialize, Serialize};

use crate::error::LevelError;
use crate::grid::{LevelGrid, validate_marker_counts};
use crate::tile::Cell;

/// Minimum line count: description, timer and at least one grid row.
pub const MIN_LINES: usize = 3;

/// A parsed level: metadata plus grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDocument {
    pub description: String,
    pub timer_secs: u32,
    pub grid: LevelGrid,
}

impl LevelDocument {
    pub fn new(description: impl Into<String>, timer_secs: u32, grid: LevelGrid) -> Self {
        Self {
            description: description.into(),
            timer_secs,
            grid,
        }
    }

    /// Parse without checking marker cardinality. See [`parse`].
    pub fn parse(text: &str) -> Result<Self, LevelError> {
        parse(text)
    }

    pub fn to_text(&self) -> String {
        serialize(&self.grid, &self.description, self.timer_secs)
    }

    /// Marker cardinality of the in-memory grid.
    pub fn validate(&self) -> Result<(), LevelError> {
        self.grid.validate()
    }
}

/// Parse a level document.
///
/// Fails on fewer than three lines or a timer line that is not a
/// non-negative integer. Unknown grid characters decode as empty, and the
/// player/goal cardinality is NOT checked here; use [`validate_text`] or
/// [`LevelGrid::validate`] before trusting the result as playable.
pub fn parse(text: &str) -> Result<LevelDocument, LevelError> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() < MIN_LINES {
        return Err(LevelError::TooFewLines { found: lines.len() });
    }
    let timer_secs = parse_timer(lines[1])?;
    let grid = LevelGrid::from_rows(&lines[2..]);
    Ok(LevelDocument {
        description: lines[0].to_string(),
        timer_secs,
        grid,
    })
}

fn parse_timer(line: &str) -> Result<u32, LevelError> {
    let trimmed = line.trim();
    trimmed
        .parse::<u32>()
        .map_err(|_| LevelError::InvalidTimer(trimmed.to_string()))
}

/// Serialize a grid with its metadata. Line breaks inside the description are
/// flattened to spaces so it stays on the first line.
pub fn serialize(grid: &LevelGrid, description: &str, timer_secs: u32) -> String {
    let mut lines = Vec::with_capacity(grid.height() + 2);
    lines.push(description.replace(['\r', '\n'], " "));
    lines.push(timer_secs.to_string());
    lines.extend(grid.rows());
    lines.join("\n")
}

/// Full validity check on raw text, before trusting a file: line count,
/// timer, and exactly one player start and one goal.
///
/// Counts markers straight from the text so it agrees with
/// [`LevelGrid::validate`] on any parsed grid.
pub fn validate_text(text: &str) -> Result<(), LevelError> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() < MIN_LINES {
        return Err(LevelError::TooFewLines { found: lines.len() });
    }
    parse_timer(lines[1])?;
    let player = Cell::PLAYER.to_char();
    let goal = Cell::GOAL.to_char();
    let (players, goals) = lines[2..]
        .iter()
        .flat_map(|row| row.chars())
        .fold((0, 0), |(p, g), c| {
            (p + usize::from(c == player), g + usize::from(c == goal))
        });
    validate_marker_counts(players, goals)
}

pub fn is_valid_text(text: &str) -> bool {
    validate_text(text).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Marker;
    use crate::grid::GridPoint;

    #[test]
    fn example_document() {
        let text = "desc\n30\n1.X\n###";
        let doc = parse(text).unwrap();
        assert_eq!(doc.description, "desc");
        assert_eq!(doc.timer_secs, 30);
        assert_eq!(doc.grid.width(), 3);
        assert_eq!(doc.grid.height(), 2);
        assert_eq!(doc.grid.find(Cell::PLAYER), Some(GridPoint::new(0, 0)));
        assert_eq!(doc.grid.find(Cell::GOAL), Some(GridPoint::new(2, 0)));
        assert!(is_valid_text(text));
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn serialize_has_no_trailing_newline() {
        let doc = parse("desc\n30\n1.X\n###").unwrap();
        assert_eq!(doc.to_text(), "desc\n30\n1.X\n###");
    }

    #[test]
    fn too_few_lines() {
        assert_eq!(parse("desc\n30"), Err(LevelError::TooFewLines { found: 2 }));
        assert_eq!(
            validate_text("desc\n30\n"),
            Err(LevelError::TooFewLines { found: 2 })
        );
        assert_eq!(parse(""), Err(LevelError::TooFewLines { found: 0 }));
    }

    #[test]
    fn timer_must_be_integer() {
        assert_eq!(
            parse("desc\nsoon\n1X"),
            Err(LevelError::InvalidTimer("soon".to_string()))
        );
        assert!(matches!(
            parse("desc\n-5\n1X"),
            Err(LevelError::InvalidTimer(_))
        ));
        assert!(matches!(
            parse("desc\n2.5\n1X"),
            Err(LevelError::InvalidTimer(_))
        ));
        // Surrounding whitespace is tolerated.
        assert_eq!(parse("desc\n 45 \n1X").unwrap().timer_secs, 45);
    }

    #[test]
    fn crlf_and_trailing_newline_tolerated() {
        let doc = parse("desc\r\n30\r\n1.X\r\n###\r\n").unwrap();
        assert_eq!(doc.grid.height(), 2);
        assert_eq!(doc.grid.row_string(1), "###");
    }

    #[test]
    fn unknown_chars_become_empty() {
        let doc = parse("d\n5\n1?X").unwrap();
        assert_eq!(doc.grid.row_string(0), "1.X");
    }

    #[test]
    fn parse_is_lenient_about_markers_but_validate_is_not() {
        let text = "d\n5\n11X";
        assert!(parse(text).is_ok());
        assert_eq!(
            validate_text(text),
            Err(LevelError::MarkerCount {
                marker: Marker::Player,
                found: 2
            })
        );
        assert_eq!(
            validate_text("d\n5\n1.."),
            Err(LevelError::MarkerCount {
                marker: Marker::Goal,
                found: 0
            })
        );
    }

    #[test]
    fn description_newlines_flattened() {
        let grid = LevelGrid::from_rows(&["1X"]);
        let text = serialize(&grid, "two\nlines", 10);
        let doc = parse(&text).unwrap();
        assert_eq!(doc.description, "two lines");
        assert_eq!(doc.grid, grid);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        const TERRAIN: &[char] = &[
            '.', '-', '#', 'i', 'I', 'h', 'H', 'd', 'D', 'W', 'R', 'T', 'S', 'A', 'B', 'C',
        ];

        /// Rows of equal width with one player and one goal somewhere.
        fn valid_grid() -> impl Strategy<Value = LevelGrid> {
            (2usize..12, 1usize..8).prop_flat_map(|(w, h)| {
                (
                    proptest::collection::vec(proptest::sample::select(TERRAIN), w * h),
                    0..w * h,
                    0..w * h,
                )
                    .prop_filter("distinct markers", |(_, p, g)| p != g)
                    .prop_map(move |(mut chars, p, g)| {
                        chars[p] = '1';
                        chars[g] = 'X';
                        let rows: Vec<String> =
                            chars.chunks(w).map(|r| r.iter().collect()).collect();
                        LevelGrid::from_rows(&rows)
                    })
            })
        }

        proptest! {
            #[test]
            fn roundtrip_preserves_grid_and_metadata(
                grid in valid_grid(),
                description in "[a-zA-Z0-9 ,.!]{0,40}",
                timer in 0u32..10_000,
            ) {
                let text = serialize(&grid, &description, timer);
                let doc = parse(&text).unwrap();
                prop_assert_eq!(&doc.grid, &grid);
                prop_assert_eq!(doc.description, description);
                prop_assert_eq!(doc.timer_secs, timer);
                prop_assert!(is_valid_text(&text));
            }

            #[test]
            fn text_and_grid_validation_agree(
                rows in proptest::collection::vec("[.#1X-]{1,6}", 1..6),
                timer in 0u32..100,
            ) {
                let text = format!("level\n{timer}\n{}", rows.join("\n"));
                let doc = parse(&text).unwrap();
                prop_assert_eq!(validate_text(&text).is_ok(), doc.grid.is_valid());
            }

            #[test]
            fn short_documents_always_invalid(text in "[^\n]{0,10}(\n[^\n]{0,10})?") {
                prop_assert!(!is_valid_text(&text));
            }
        }
    }
}

//! Document, block and segment domain model.
//!
//! # Responsibility
//! - Define the canonical tagged unions for blocks and inline segments.
//! - Provide invariant-preserving constructors used by the editor engines.
//!
//! # Invariants
//! - A Note block's segment sequence is never empty.
//! - Grid-shaped blocks (Table/Matrix/MatMul operands) are rectangular with
//!   at least one row and one column.
//! - Wire field names (`type`, `isAnswer`, ...) match the version-3 envelope.
//!
//! # See also
//! - docs/architecture/data-model.md

use crate::model::keys::KeyedVec;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Reserved sole-segment content that replaces a Note with a new Table.
pub const TABLE_SENTINEL: &str = "\\table";
/// Reserved sole-segment content that replaces a Note with an Embed.
pub const EMBED_SENTINEL: &str = "\\embed";
/// Placeholder URL for a freshly created Embed block.
pub const EMBED_PLACEHOLDER_URL: &str = "https://";

/// One inline unit within a Note block.
///
/// Math content is opaque math markup owned by the external input widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum Segment {
    Text { content: String },
    Math { content: String },
}

impl Segment {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    pub fn math(content: impl Into<String>) -> Self {
        Self::Math {
            content: content.into(),
        }
    }

    pub fn is_math(&self) -> bool {
        matches!(self, Self::Math { .. })
    }

    pub fn content(&self) -> &str {
        match self {
            Self::Text { content } | Self::Math { content } => content,
        }
    }

    /// Replaces the segment content, keeping its kind.
    pub fn set_content(&mut self, new_content: impl Into<String>) {
        match self {
            Self::Text { content } | Self::Math { content } => *content = new_content.into(),
        }
    }
}

/// Rectangular grid of raw math-markup cells with keyed rows.
pub type Grid = KeyedVec<Vec<String>>;

/// One document unit.
///
/// Every variant carries `indent` (nesting level, two spaces per level in the
/// markdown export).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum Block {
    Note {
        indent: u32,
        #[serde(rename = "isAnswer")]
        is_answer: bool,
        content: KeyedVec<Segment>,
    },
    Table {
        indent: u32,
        cells: Grid,
    },
    Matrix {
        indent: u32,
        cells: Grid,
    },
    MatMul {
        indent: u32,
        first: Grid,
        second: Grid,
        result: Grid,
    },
    Embed {
        indent: u32,
        url: String,
    },
}

impl Block {
    /// Creates an empty Note: exactly one empty Text segment.
    pub fn note(indent: u32) -> Self {
        Self::note_line("", indent)
    }

    /// Creates a Note holding one Text segment with the given content.
    pub fn note_line(content: impl Into<String>, indent: u32) -> Self {
        Self::Note {
            indent,
            is_answer: false,
            content: KeyedVec::from_values(vec![Segment::text(content)]),
        }
    }

    /// Creates a Note from explicit segments.
    ///
    /// # Invariants
    /// - `segments` must not be empty.
    pub fn note_with_segments(segments: Vec<Segment>, indent: u32, is_answer: bool) -> Self {
        debug_assert!(!segments.is_empty(), "a Note block needs >= 1 segment");
        Self::Note {
            indent,
            is_answer,
            content: KeyedVec::from_values(segments),
        }
    }

    /// Creates a new Table as a 2x2 grid of empty strings.
    pub fn table(indent: u32) -> Self {
        Self::Table {
            indent,
            cells: grid(vec![
                vec![String::new(), String::new()],
                vec![String::new(), String::new()],
            ]),
        }
    }

    /// Creates a Table from explicit rows.
    pub fn table_with_cells(cells: Vec<Vec<String>>, indent: u32) -> Self {
        Self::Table {
            indent,
            cells: grid(cells),
        }
    }

    /// Creates a Matrix from explicit rows.
    pub fn matrix(cells: Vec<Vec<String>>, indent: u32) -> Self {
        Self::Matrix {
            indent,
            cells: grid(cells),
        }
    }

    /// Creates a matrix-multiplication diagram.
    ///
    /// Shape compatibility of the three grids is left to the producing UI.
    pub fn mat_mul(
        first: Vec<Vec<String>>,
        second: Vec<Vec<String>>,
        result: Vec<Vec<String>>,
        indent: u32,
    ) -> Self {
        Self::MatMul {
            indent,
            first: grid(first),
            second: grid(second),
            result: grid(result),
        }
    }

    /// Creates an Embed block for the given URL.
    pub fn embed(url: impl Into<String>, indent: u32) -> Self {
        Self::Embed {
            indent,
            url: url.into(),
        }
    }

    pub fn indent(&self) -> u32 {
        match self {
            Self::Note { indent, .. }
            | Self::Table { indent, .. }
            | Self::Matrix { indent, .. }
            | Self::MatMul { indent, .. }
            | Self::Embed { indent, .. } => *indent,
        }
    }

    /// True iff this is a Note whose every segment is Math or has empty
    /// content. Drives display vs. inline math markup in the export.
    pub fn is_math_only_note(&self) -> bool {
        match self {
            Self::Note { content, .. } => content
                .values()
                .all(|segment| segment.is_math() || segment.content().is_empty()),
            _ => false,
        }
    }

    /// Checks the structural invariants a well-formed block upholds.
    ///
    /// Core operations never produce a violating block; this is the guard the
    /// deserializer runs against external input.
    pub fn validate(&self) -> Result<(), StructureError> {
        match self {
            Self::Note { content, .. } => {
                if content.is_empty() {
                    return Err(StructureError::EmptyNote);
                }
                Ok(())
            }
            Self::Table { cells, .. } | Self::Matrix { cells, .. } => validate_grid(cells),
            Self::MatMul {
                first,
                second,
                result,
                ..
            } => {
                validate_grid(first)?;
                validate_grid(second)?;
                validate_grid(result)
            }
            Self::Embed { .. } => Ok(()),
        }
    }
}

/// Structural invariant violation detected on external input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureError {
    /// Note block with zero segments.
    EmptyNote,
    /// Grid with zero rows or zero columns.
    EmptyGrid,
    /// Grid row whose length differs from the first row.
    RaggedGrid { row: usize, expected: usize, got: usize },
}

impl Display for StructureError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyNote => write!(f, "note block has no segments"),
            Self::EmptyGrid => write!(f, "grid has no rows or no columns"),
            Self::RaggedGrid { row, expected, got } => write!(
                f,
                "grid row {row} has {got} columns, expected {expected}"
            ),
        }
    }
}

impl Error for StructureError {}

fn validate_grid(cells: &Grid) -> Result<(), StructureError> {
    let mut rows = cells.values();
    let first = rows.next().ok_or(StructureError::EmptyGrid)?;
    if first.is_empty() {
        return Err(StructureError::EmptyGrid);
    }
    for (offset, row) in rows.enumerate() {
        if row.len() != first.len() {
            return Err(StructureError::RaggedGrid {
                row: offset + 1,
                expected: first.len(),
                got: row.len(),
            });
        }
    }
    Ok(())
}

fn grid(cells: Vec<Vec<String>>) -> Grid {
    debug_assert!(
        !cells.is_empty() && !cells[0].is_empty(),
        "grid needs >= 1 row and >= 1 column"
    );
    debug_assert!(
        cells.iter().all(|row| row.len() == cells[0].len()),
        "grid rows must have equal length"
    );
    KeyedVec::from_values(cells)
}

/// The whole in-memory document.
///
/// Owns its blocks exclusively; blocks own their segments/cells. All editor
/// mutations are whole-value replacements routed through the keyed sequences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    pub blocks: KeyedVec<Block>,
}

impl Document {
    /// Creates an empty document.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            blocks: KeyedVec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Block, Segment};

    #[test]
    fn new_note_holds_one_empty_text_segment() {
        let block = Block::note(0);
        let Block::Note { content, is_answer, .. } = &block else {
            panic!("expected a note block");
        };
        assert_eq!(content.len(), 1);
        assert_eq!(content.get(0), Some(&Segment::text("")));
        assert!(!is_answer);
    }

    #[test]
    fn new_table_is_a_two_by_two_empty_grid() {
        let Block::Table { cells, .. } = Block::table(1) else {
            panic!("expected a table block");
        };
        assert_eq!(cells.len(), 2);
        assert!(cells.values().all(|row| row == &vec!["", ""]));
    }

    #[test]
    fn math_only_counts_empty_text_as_placeholder() {
        let block = Block::note_with_segments(
            vec![Segment::text(""), Segment::math("x=1"), Segment::text("")],
            0,
            false,
        );
        assert!(block.is_math_only_note());

        let mixed = Block::note_with_segments(
            vec![Segment::text("let "), Segment::math("x=1")],
            0,
            false,
        );
        assert!(!mixed.is_math_only_note());
    }

    #[test]
    fn constructed_blocks_validate_clean() {
        let blocks = [
            Block::note(0),
            Block::table(1),
            Block::matrix(vec![vec!["1".into()], vec!["2".into()]], 0),
            Block::mat_mul(
                vec![vec!["a".into()]],
                vec![vec!["b".into()]],
                vec![vec!["c".into()]],
                0,
            ),
            Block::embed("https://example.com", 2),
        ];
        for block in &blocks {
            assert_eq!(block.validate(), Ok(()));
        }
    }
}

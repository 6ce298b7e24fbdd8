//! Block-level focus engine over a whole document.
//!
//! # Responsibility
//! - Hold the single transient focus pointer and route input events to the
//!   focused unit's cursor.
//! - Mediate cursor exits between sibling blocks and execute block-level
//!   merge/remove/replace rules.
//!
//! # Invariants
//! - At most one unit is focused at a time; "no focused unit" is a valid
//!   idle state and every event in it is a no-op.
//! - Events apply strictly in arrival order; each observes the document
//!   produced by all earlier events.
//!
//! # See also
//! - docs/architecture/navigation.md

use crate::editor::nav::{Direction, NavExit, NavFlow, Navigate};
use crate::editor::note::NoteCursor;
use crate::editor::table::TableCursor;
use crate::model::block::{
    Block, Document, EMBED_PLACEHOLDER_URL, EMBED_SENTINEL, TABLE_SENTINEL,
};
use crate::model::keys::IndexError;
use log::debug;

/// Transient cursor location, exposed for rendering layers.
///
/// Never persisted; a serialized document carries no focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPointer {
    Segment {
        block: usize,
        segment: usize,
        side: Option<Direction>,
    },
    Cell {
        block: usize,
        row: usize,
        column: usize,
        side: Option<Direction>,
    },
}

#[derive(Debug, Clone)]
enum BlockCursor {
    Note(NoteCursor),
    Table(TableCursor),
}

#[derive(Debug, Clone)]
struct FocusedBlock {
    block: usize,
    cursor: BlockCursor,
}

enum NavEvent {
    Left,
    Right,
    Up,
    Down,
    Delete,
    InsertAfter,
}

/// Focus engine and mutation entry point for one open document.
///
/// All mutations are synchronous whole-value replacements routed through the
/// keyed sequences; collaborating widgets report edits and exit events here.
#[derive(Debug)]
pub struct DocumentEditor {
    document: Document,
    focus: Option<FocusedBlock>,
}

impl DocumentEditor {
    /// Opens a document for editing with no focused unit.
    pub fn new(document: Document) -> Self {
        Self {
            document,
            focus: None,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Releases the document, discarding the transient focus.
    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.document.title = title.into();
    }

    /// Current focus pointer, if any unit is focused.
    pub fn focus_pointer(&self) -> Option<FocusPointer> {
        self.focus.as_ref().map(|focused| match &focused.cursor {
            BlockCursor::Note(cursor) => FocusPointer::Segment {
                block: focused.block,
                segment: cursor.segment(),
                side: cursor.entered_side(),
            },
            BlockCursor::Table(cursor) => FocusPointer::Cell {
                block: focused.block,
                row: cursor.row(),
                column: cursor.column(),
                side: cursor.entered_side(),
            },
        })
    }

    pub fn clear_focus(&mut self) {
        self.focus = None;
    }

    /// Focuses a block at its default position (first segment / top-left
    /// cell). Embed and MatMul blocks own no text cursor; focusing one
    /// clears focus.
    ///
    /// # Errors
    /// Returns `IndexError` when `index` is out of range.
    pub fn focus_block(&mut self, index: usize) -> Result<(), IndexError> {
        let len = self.document.blocks.len();
        self.document
            .blocks
            .get(index)
            .ok_or(IndexError { index, len })?;
        self.enter_block(index, None);
        Ok(())
    }

    /// Focuses one segment of a Note block (pointer click).
    pub fn focus_segment(&mut self, block: usize, segment: usize) -> Result<(), IndexError> {
        let len = self.document.blocks.len();
        let target = self
            .document
            .blocks
            .get(block)
            .ok_or(IndexError { index: block, len })?;
        let Block::Note { content, .. } = target else {
            return Ok(());
        };
        if segment >= content.len() {
            return Err(IndexError {
                index: segment,
                len: content.len(),
            });
        }
        let mut cursor = NoteCursor::new();
        cursor.focus_segment(segment);
        self.focus = Some(FocusedBlock {
            block,
            cursor: BlockCursor::Note(cursor),
        });
        Ok(())
    }

    /// Focuses one cell of a table-shaped block (pointer click).
    pub fn focus_cell(&mut self, block: usize, row: usize, column: usize) -> Result<(), IndexError> {
        let len = self.document.blocks.len();
        let target = self
            .document
            .blocks
            .get(block)
            .ok_or(IndexError { index: block, len })?;
        let (Block::Table { cells, .. } | Block::Matrix { cells, .. }) = target else {
            return Ok(());
        };
        let row_cells = cells.get(row).ok_or(IndexError {
            index: row,
            len: cells.len(),
        })?;
        if column >= row_cells.len() {
            return Err(IndexError {
                index: column,
                len: row_cells.len(),
            });
        }
        let mut cursor = TableCursor::new();
        cursor.focus_cell(row, column);
        self.focus = Some(FocusedBlock {
            block,
            cursor: BlockCursor::Table(cursor),
        });
        Ok(())
    }

    pub fn left_out(&mut self) -> Result<(), IndexError> {
        self.dispatch(NavEvent::Left)
    }

    pub fn right_out(&mut self) -> Result<(), IndexError> {
        self.dispatch(NavEvent::Right)
    }

    pub fn up_out(&mut self) -> Result<(), IndexError> {
        self.dispatch(NavEvent::Up)
    }

    pub fn down_out(&mut self) -> Result<(), IndexError> {
        self.dispatch(NavEvent::Down)
    }

    pub fn delete_out(&mut self) -> Result<(), IndexError> {
        self.dispatch(NavEvent::Delete)
    }

    pub fn insert_after(&mut self) -> Result<(), IndexError> {
        self.dispatch(NavEvent::InsertAfter)
    }

    /// Splits the focused Text segment at the widget cursor into
    /// text | empty math | text, focusing the new Math segment.
    pub fn insert_math(&mut self, before: &str, after: &str) -> Result<(), IndexError> {
        let Some(focused) = self.focus.as_mut() else {
            return Ok(());
        };
        let BlockCursor::Note(cursor) = &mut focused.cursor else {
            return Ok(());
        };
        let Some(Block::Note { content, .. }) = self.document.blocks.get_mut(focused.block) else {
            return Ok(());
        };
        cursor.insert_math(content, before, after)
    }

    /// Applies a widget-reported content change to the focused segment, then
    /// evaluates the one-shot sentinel transforms (`\table`, `\embed`).
    pub fn segment_changed(&mut self, new_content: &str) -> Result<(), IndexError> {
        let Some(focused) = self.focus.as_ref() else {
            return Ok(());
        };
        let index = focused.block;
        let BlockCursor::Note(cursor) = &focused.cursor else {
            return Ok(());
        };
        let segment_index = cursor.segment();

        let Some(Block::Note {
            content, indent, ..
        }) = self.document.blocks.get_mut(index)
        else {
            return Ok(());
        };
        let indent = *indent;
        let segment_count = content.len();
        let segment = content.get_mut(segment_index).ok_or(IndexError {
            index: segment_index,
            len: segment_count,
        })?;
        segment.set_content(new_content);

        // Replace-block trigger: a Note whose sole segment equals a reserved
        // sentinel transforms atomically, preserving indent.
        if segment_count != 1 {
            return Ok(());
        }
        match new_content {
            TABLE_SENTINEL => {
                self.document
                    .blocks
                    .replace(index, 1, vec![Block::table(indent), Block::note(indent)])?;
                debug!("event=block_replace module=editor status=ok kind=table index={index}");
                // The trailing empty Note keeps editing flowing past the table.
                self.focus = Some(FocusedBlock {
                    block: index + 1,
                    cursor: BlockCursor::Note(NoteCursor::new()),
                });
            }
            EMBED_SENTINEL => {
                self.document
                    .blocks
                    .replace(index, 1, vec![Block::embed(EMBED_PLACEHOLDER_URL, indent)])?;
                debug!("event=block_replace module=editor status=ok kind=embed index={index}");
                self.focus = None;
            }
            _ => {}
        }
        Ok(())
    }

    /// Applies a widget-reported content change to the focused table cell.
    pub fn cell_changed(&mut self, new_content: &str) -> Result<(), IndexError> {
        let Some(focused) = self.focus.as_ref() else {
            return Ok(());
        };
        let BlockCursor::Table(cursor) = &focused.cursor else {
            return Ok(());
        };
        let (row, column) = (cursor.row(), cursor.column());
        let Some(Block::Table { cells, .. } | Block::Matrix { cells, .. }) =
            self.document.blocks.get_mut(focused.block)
        else {
            return Ok(());
        };
        let row_count = cells.len();
        let row_cells = cells.get_mut(row).ok_or(IndexError {
            index: row,
            len: row_count,
        })?;
        let width = row_cells.len();
        let cell = row_cells.get_mut(column).ok_or(IndexError {
            index: column,
            len: width,
        })?;
        *cell = new_content.to_owned();
        Ok(())
    }

    /// Marks or unmarks the focused Note block as an answer line.
    pub fn set_is_answer(&mut self, value: bool) {
        let Some(focused) = self.focus.as_ref() else {
            return;
        };
        if let Some(Block::Note { is_answer, .. }) = self.document.blocks.get_mut(focused.block) {
            *is_answer = value;
        }
    }

    /// Inserts a new empty Note block after the focused block and focuses it
    /// (Ctrl+Enter past a table).
    pub fn insert_block_after(&mut self) -> Result<(), IndexError> {
        let Some(focused) = self.focus.as_ref() else {
            return Ok(());
        };
        self.insert_note_after(focused.block)
    }

    fn dispatch(&mut self, event: NavEvent) -> Result<(), IndexError> {
        let Some(focused) = self.focus.as_mut() else {
            return Ok(());
        };
        let index = focused.block;
        let len = self.document.blocks.len();
        let block = self
            .document
            .blocks
            .get_mut(index)
            .ok_or(IndexError { index, len })?;

        let flow = match (&mut focused.cursor, block) {
            (BlockCursor::Note(cursor), Block::Note { content, .. }) => {
                apply(cursor, content, event)?
            }
            (
                BlockCursor::Table(cursor),
                Block::Table { cells, .. } | Block::Matrix { cells, .. },
            ) => apply(cursor, cells, event)?,
            _ => {
                debug_assert!(false, "focus cursor out of sync with block kind");
                NavFlow::Stay
            }
        };

        if let NavFlow::Exit(exit) = flow {
            self.handle_exit(index, exit)?;
        }
        Ok(())
    }

    fn handle_exit(&mut self, index: usize, exit: NavExit) -> Result<(), IndexError> {
        match exit {
            NavExit::Left => self.enter_adjacent(index, false, Direction::Right),
            NavExit::Up => self.enter_adjacent(index, false, Direction::Bottom),
            NavExit::Right => self.enter_adjacent(index, true, Direction::Left),
            NavExit::Down => self.enter_adjacent(index, true, Direction::Top),
            NavExit::Delete => return self.block_delete_out(index),
            NavExit::InsertAfter => return self.insert_note_after(index),
        }
        Ok(())
    }

    /// Moves focus to the nearest focusable sibling; a document edge is a
    /// no-op that leaves the current focus untouched.
    fn enter_adjacent(&mut self, from: usize, forward: bool, side: Direction) {
        if let Some(target) = self.adjacent_focusable(from, forward) {
            self.enter_block(target, Some(side));
        }
    }

    fn adjacent_focusable(&self, from: usize, forward: bool) -> Option<usize> {
        if forward {
            (from + 1..self.document.blocks.len()).find(|&i| self.is_focusable(i))
        } else {
            (0..from).rev().find(|&i| self.is_focusable(i))
        }
    }

    // Embed and MatMul blocks own no text cursor; vertical navigation skips
    // them.
    fn is_focusable(&self, index: usize) -> bool {
        matches!(
            self.document.blocks.get(index),
            Some(Block::Note { .. } | Block::Table { .. } | Block::Matrix { .. })
        )
    }

    fn enter_block(&mut self, index: usize, side: Option<Direction>) {
        let cursor = match self.document.blocks.get(index) {
            Some(Block::Note { content, .. }) => {
                BlockCursor::Note(NoteCursor::entered_from(side, content.len()))
            }
            Some(Block::Table { cells, .. } | Block::Matrix { cells, .. }) => {
                BlockCursor::Table(TableCursor::entered_from(side, cells))
            }
            _ => {
                self.focus = None;
                return;
            }
        };
        self.focus = Some(FocusedBlock {
            block: index,
            cursor,
        });
    }

    /// Delete exit escalated by a block: remove the block when it is spent
    /// (an empty sole-segment Note, or a table whose last row was deleted),
    /// then land at the end of the previous focusable block.
    fn block_delete_out(&mut self, index: usize) -> Result<(), IndexError> {
        if index == 0 {
            return Ok(());
        }
        let removable = match self.document.blocks.get(index) {
            Some(Block::Note { content, .. }) => {
                content.len() == 1
                    && content
                        .get(0)
                        .is_some_and(|s| !s.is_math() && s.content().is_empty())
            }
            Some(Block::Table { .. } | Block::Matrix { .. }) => true,
            _ => false,
        };
        if removable {
            self.document.blocks.remove(index)?;
            debug!("event=block_remove module=editor status=ok index={index}");
        }
        match self.adjacent_focusable(index, false) {
            Some(target) => {
                let side = match self.document.blocks.get(target) {
                    Some(Block::Table { .. } | Block::Matrix { .. }) => Direction::Bottom,
                    _ => Direction::Right,
                };
                self.enter_block(target, Some(side));
            }
            None if removable => self.focus = None,
            None => {}
        }
        Ok(())
    }

    fn insert_note_after(&mut self, index: usize) -> Result<(), IndexError> {
        let indent = self
            .document
            .blocks
            .get(index)
            .map(Block::indent)
            .unwrap_or(0);
        self.document.blocks.insert(index + 1, Block::note(indent))?;
        debug!(
            "event=block_insert module=editor status=ok index={}",
            index + 1
        );
        self.focus = Some(FocusedBlock {
            block: index + 1,
            cursor: BlockCursor::Note(NoteCursor::new()),
        });
        Ok(())
    }
}

fn apply<N: Navigate>(
    cursor: &mut N,
    content: &mut N::Content,
    event: NavEvent,
) -> Result<NavFlow, IndexError> {
    Ok(match event {
        NavEvent::Left => cursor.left_out(content),
        NavEvent::Right => cursor.right_out(content),
        NavEvent::Up => cursor.up_out(content),
        NavEvent::Down => cursor.down_out(content),
        NavEvent::Delete => cursor.delete_out(content)?,
        NavEvent::InsertAfter => cursor.insert_after(content)?,
    })
}

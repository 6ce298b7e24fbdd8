//! Segment-level focus engine for Note blocks.
//!
//! # Responsibility
//! - Move a virtual cursor across the segments of one Note block.
//! - Execute the merge/split rules at segment boundaries.
//!
//! # Invariants
//! - The segment sequence alternates Text and Math after every normalizing
//!   edit; edits give a Math segment Text neighbors, loaded documents may
//!   not.
//! - Exits never mutate the segment sequence or the cursor.
//!
//! # See also
//! - docs/architecture/navigation.md

use crate::editor::nav::{Direction, NavExit, NavFlow, Navigate};
use crate::model::block::Segment;
use crate::model::keys::{IndexError, KeyedVec};

/// Cursor over the segments of one Note block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteCursor {
    segment: usize,
    entered: Option<Direction>,
}

impl NoteCursor {
    /// Focuses the first segment, no entered side.
    pub fn new() -> Self {
        Self {
            segment: 0,
            entered: None,
        }
    }

    /// Places the cursor according to the edge the block was entered from.
    ///
    /// Entering from the right lands on the last segment; every other edge
    /// lands on the first.
    pub fn entered_from(side: Option<Direction>, segment_count: usize) -> Self {
        match side {
            Some(Direction::Right) => Self {
                segment: segment_count.saturating_sub(1),
                entered: Some(Direction::Right),
            },
            other => Self {
                segment: 0,
                entered: other,
            },
        }
    }

    pub fn segment(&self) -> usize {
        self.segment
    }

    /// Edge the focused segment was entered from, if any.
    pub fn entered_side(&self) -> Option<Direction> {
        self.entered
    }

    /// Moves focus to an explicitly chosen segment (pointer click).
    pub fn focus_segment(&mut self, index: usize) {
        self.segment = index;
        self.entered = None;
    }

    /// Splits the focused Text segment at the widget cursor into
    /// `Text(before) | Math("") | Text(after)` and focuses the Math segment.
    ///
    /// # Errors
    /// Returns `IndexError` when the cursor points outside the sequence.
    pub fn insert_math(
        &mut self,
        content: &mut KeyedVec<Segment>,
        before: &str,
        after: &str,
    ) -> Result<(), IndexError> {
        debug_assert!(
            content.get(self.segment).is_some_and(|s| !s.is_math()),
            "insert_math splits a text segment"
        );
        content.replace(
            self.segment,
            1,
            vec![
                Segment::text(before),
                Segment::math(""),
                Segment::text(after),
            ],
        )?;
        self.segment += 1;
        self.entered = None;
        Ok(())
    }
}

impl Default for NoteCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigate for NoteCursor {
    type Content = KeyedVec<Segment>;

    fn left_out(&mut self, _content: &mut Self::Content) -> NavFlow {
        if self.segment == 0 {
            return NavFlow::Exit(NavExit::Left);
        }
        self.segment -= 1;
        self.entered = Some(Direction::Right);
        NavFlow::Stay
    }

    fn right_out(&mut self, content: &mut Self::Content) -> NavFlow {
        if self.segment + 1 >= content.len() {
            return NavFlow::Exit(NavExit::Right);
        }
        self.segment += 1;
        self.entered = Some(Direction::Left);
        NavFlow::Stay
    }

    // Vertical movement is a block-level concern; a note is a single line.
    fn up_out(&mut self, _content: &mut Self::Content) -> NavFlow {
        NavFlow::Exit(NavExit::Up)
    }

    fn down_out(&mut self, _content: &mut Self::Content) -> NavFlow {
        NavFlow::Exit(NavExit::Down)
    }

    fn delete_out(&mut self, content: &mut Self::Content) -> Result<NavFlow, IndexError> {
        let index = self.segment;
        let len = content.len();
        let segment = content.get(index).ok_or(IndexError { index, len })?;

        if segment.is_math() {
            // A Math segment at a boundary has nothing to merge into; loaded
            // documents may hold such notes even though edits never produce
            // them. Escalate like any other spent position.
            if index == 0 || index + 1 >= len {
                return Ok(NavFlow::Exit(NavExit::Delete));
            }
            // An emptied Math segment dissolves: its Text neighbors merge
            // into one segment and the cursor lands on the merge.
            let before = content
                .get(index - 1)
                .ok_or(IndexError { index, len })?
                .content()
                .to_owned();
            let after = content
                .get(index + 1)
                .ok_or(IndexError { index: index + 1, len })?
                .content()
                .to_owned();
            content.replace(index - 1, 3, vec![Segment::text(before + &after)])?;
            self.segment = index - 1;
            self.entered = None;
            return Ok(NavFlow::Stay);
        }

        // Sole segment, or no previous segment to land on: candidate block
        // removal/merge, decided by the parent.
        if len == 1 || index == 0 {
            return Ok(NavFlow::Exit(NavExit::Delete));
        }
        self.segment = index - 1;
        self.entered = Some(Direction::Right);
        Ok(NavFlow::Stay)
    }

    fn insert_after(&mut self, _content: &mut Self::Content) -> Result<NavFlow, IndexError> {
        Ok(NavFlow::Exit(NavExit::InsertAfter))
    }
}

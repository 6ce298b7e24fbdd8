//! Navigation protocol shared by every focusable unit.
//!
//! # Responsibility
//! - Name the directional/delete/insert events a focusable unit handles.
//! - Let a parent mediate cursor movement between siblings without the child
//!   knowing the document structure.
//!
//! # Invariants
//! - A unit that cannot handle an event internally exits; it never mutates
//!   state on an exit, so an ignored exit is a clean no-op.
//! - Boundary no-ops are policy, not errors; only positional bugs surface as
//!   `IndexError`.

use crate::model::keys::IndexError;

/// Edge a navigation transition arrived from.
///
/// Picks the initial in-unit cursor position: entering from the right puts
/// the cursor at the end, entering from the top at the first row, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Top,
    Bottom,
}

/// Event a unit could not handle internally, escalated to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavExit {
    /// Cursor left the unit's left boundary.
    Left,
    /// Cursor left the unit's right boundary.
    Right,
    /// Cursor left the unit's top boundary.
    Up,
    /// Cursor left the unit's bottom boundary.
    Down,
    /// Backward delete at a boundary; the parent may merge or remove.
    Delete,
    /// A sibling should be inserted after this unit.
    InsertAfter,
}

/// Outcome of one navigation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavFlow {
    /// The unit handled the event; focus stays inside it.
    Stay,
    /// The event escalates to the parent.
    Exit(NavExit),
}

/// Capability set of a focusable unit.
///
/// Implemented by the segment cursor of a Note block and the cell cursor of a
/// table; a table cell and a whole block navigate through the same contract,
/// which is what lets a parent compose children without per-type logic.
pub trait Navigate {
    /// Collection the cursor moves over (segments for a note, the cell grid
    /// for a table).
    type Content;

    fn left_out(&mut self, content: &mut Self::Content) -> NavFlow;
    fn right_out(&mut self, content: &mut Self::Content) -> NavFlow;
    fn up_out(&mut self, content: &mut Self::Content) -> NavFlow;
    fn down_out(&mut self, content: &mut Self::Content) -> NavFlow;

    /// Backward delete at an empty/boundary position.
    ///
    /// # Errors
    /// Returns `IndexError` only on positional contract bugs; boundary
    /// refusals are `NavFlow` values.
    fn delete_out(&mut self, content: &mut Self::Content) -> Result<NavFlow, IndexError>;

    /// Enter-key semantics: split or insert a sibling after the cursor.
    fn insert_after(&mut self, content: &mut Self::Content) -> Result<NavFlow, IndexError>;
}

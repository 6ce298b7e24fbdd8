//! Focus and navigation engines.
//!
//! # Responsibility
//! - Own "which unit is focused and from which side" for an open document.
//! - Execute merge/split/delete rules when the cursor crosses boundaries.
//!
//! # Invariants
//! - Children report boundary events through the navigation protocol; only
//!   the parent decides what an exit means.
//! - Boundary no-ops are policy; `IndexError` is reserved for contract bugs.
//!
//! # See also
//! - docs/architecture/navigation.md

pub mod document;
pub mod lines;
pub mod nav;
pub mod note;
pub mod table;

//! Core document model and editing engines for MathNote.
//! This crate is the single source of truth for document invariants.
//!
//! Rendering, math input and persistence transports live outside; the crate
//! owns the keyed data model, the focus/navigation state machines and the
//! JSON/markdown serializers.

pub mod editor;
pub mod logging;
pub mod model;
pub mod serialize;

pub use editor::document::{DocumentEditor, FocusPointer};
pub use editor::lines::{Line, LineKind, LinePad, TEXT_ESCAPE};
pub use editor::nav::{Direction, NavExit, NavFlow, Navigate};
pub use editor::note::NoteCursor;
pub use editor::table::{add_column, remove_column, TableCursor};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::block::{
    Block, Document, Grid, Segment, StructureError, EMBED_PLACEHOLDER_URL, EMBED_SENTINEL,
    TABLE_SENTINEL,
};
pub use model::keys::{IndexError, Key, Keyed, KeyedVec};
pub use serialize::markdown::{document_to_markdown, latex_fix};
pub use serialize::{
    deserialize_document, serialize_document, serialize_document_json, DeserializeError,
    DocumentEnvelope, DOCUMENT_VERSION,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

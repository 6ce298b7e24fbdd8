//! Canonical document model.
//!
//! # Responsibility
//! - Define keyed-sequence primitives and the block/segment tagged unions.
//! - Keep every structural invariant enforceable at construction time.
//!
//! # Invariants
//! - Every ordered collection in a document is keyed; keys are identity only.
//! - Blocks own their segments/cells exclusively; no shared references.
//!
//! # See also
//! - docs/architecture/data-model.md

pub mod block;
pub mod keys;

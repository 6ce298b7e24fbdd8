//! Durable JSON envelope for documents.
//!
//! # Responsibility
//! - Serialize a keyed document to the version-3 plain-JSON envelope (keys
//!   stripped) and load one back, minting fresh keys throughout.
//! - Fail loads whole: no partial document ever leaves this module.
//!
//! # Invariants
//! - The envelope carries no `key` fields and no focus state.
//! - Unknown block/segment types fail the load; unknown extra fields are
//!   ignored.
//!
//! # See also
//! - docs/architecture/envelope.md

pub mod markdown;

use crate::model::block::{Block, Document, StructureError};
use crate::model::keys::KeyedVec;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fixed schema version tagged onto every serialized document.
pub const DOCUMENT_VERSION: u64 = 3;

const KNOWN_BLOCK_TYPES: [&str; 5] = ["NOTE", "TABLE", "MATRIX", "MATMUL", "EMBED"];
const KNOWN_SEGMENT_TYPES: [&str; 2] = ["TEXT", "MATH"];

/// Persisted document envelope.
///
/// `meta` is an informational provenance note, never interpreted on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentEnvelope {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<String>,
    pub blocks: KeyedVec<Block>,
    pub version: u64,
}

/// Why a document failed to load. The document never loads partially.
#[derive(Debug)]
pub enum DeserializeError {
    /// Block `type` tag outside the version-3 vocabulary.
    UnknownBlockType(String),
    /// Segment `type` tag outside the version-3 vocabulary.
    UnknownSegmentType(String),
    /// Envelope `version` other than 3.
    UnsupportedVersion(u64),
    /// Envelope shape broken above the block level.
    Malformed(&'static str),
    /// A block violates a structural invariant (empty note, ragged grid).
    Structure(StructureError),
    /// Underlying JSON parse/shape failure.
    Json(serde_json::Error),
}

impl Display for DeserializeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownBlockType(kind) => write!(f, "unknown block type `{kind}`"),
            Self::UnknownSegmentType(kind) => write!(f, "unknown segment type `{kind}`"),
            Self::UnsupportedVersion(version) => {
                write!(f, "unsupported document version {version}, expected {DOCUMENT_VERSION}")
            }
            Self::Malformed(details) => write!(f, "malformed document envelope: {details}"),
            Self::Structure(err) => write!(f, "invalid document structure: {err}"),
            Self::Json(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DeserializeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Structure(err) => Some(err),
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for DeserializeError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<StructureError> for DeserializeError {
    fn from(value: StructureError) -> Self {
        Self::Structure(value)
    }
}

/// Builds the version-3 envelope for a document.
///
/// `origin` is a human-readable location (a URL in the original client)
/// recorded as provenance; `None` omits the `meta` field.
pub fn serialize_document(document: &Document, origin: Option<&str>) -> DocumentEnvelope {
    DocumentEnvelope {
        title: document.title.clone(),
        meta: origin.map(|origin| format!("Open this document at {origin}")),
        blocks: document.blocks.clone(),
        version: DOCUMENT_VERSION,
    }
}

/// Serializes a document straight to envelope JSON.
pub fn serialize_document_json(
    document: &Document,
    origin: Option<&str>,
) -> Result<String, serde_json::Error> {
    serde_json::to_string(&serialize_document(document, origin))
}

/// Loads a document from envelope JSON, minting fresh keys for every block
/// and segment.
///
/// # Errors
/// Fails the whole load on unknown block/segment types, a version other
/// than 3, structural violations, or malformed JSON. No recovery, no
/// partial reconstruction.
pub fn deserialize_document(json: &str) -> Result<Document, DeserializeError> {
    let value: Value = serde_json::from_str(json)?;
    check_vocabulary(&value)?;

    let envelope: DocumentEnvelope = serde_json::from_value(value)?;
    for block in envelope.blocks.values() {
        block.validate()?;
    }
    Ok(Document {
        title: envelope.title,
        blocks: envelope.blocks,
    })
}

/// Validates the envelope version and the block/segment `type` vocabulary
/// before handing the value to serde, so callers get the precise taxonomy
/// instead of a generic variant error.
fn check_vocabulary(value: &Value) -> Result<(), DeserializeError> {
    let version = value
        .get("version")
        .and_then(Value::as_u64)
        .ok_or(DeserializeError::Malformed("missing integer `version`"))?;
    if version != DOCUMENT_VERSION {
        warn!("event=document_load module=serialize status=error reason=version got={version}");
        return Err(DeserializeError::UnsupportedVersion(version));
    }

    let blocks = value
        .get("blocks")
        .and_then(Value::as_array)
        .ok_or(DeserializeError::Malformed("missing `blocks` array"))?;
    for block in blocks {
        let kind = type_tag(block).ok_or(DeserializeError::Malformed("block without `type`"))?;
        if !KNOWN_BLOCK_TYPES.contains(&kind) {
            warn!("event=document_load module=serialize status=error reason=block_type got={kind}");
            return Err(DeserializeError::UnknownBlockType(kind.to_owned()));
        }
        if kind != "NOTE" {
            continue;
        }
        let segments = block
            .get("content")
            .and_then(Value::as_array)
            .ok_or(DeserializeError::Malformed("note without `content` array"))?;
        for segment in segments {
            let kind =
                type_tag(segment).ok_or(DeserializeError::Malformed("segment without `type`"))?;
            if !KNOWN_SEGMENT_TYPES.contains(&kind) {
                return Err(DeserializeError::UnknownSegmentType(kind.to_owned()));
            }
        }
    }
    Ok(())
}

fn type_tag(value: &Value) -> Option<&str> {
    value.get("type").and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::{deserialize_document, serialize_document, DeserializeError};
    use crate::model::block::{Block, Document, Segment};
    use crate::model::keys::KeyedVec;

    fn sample() -> Document {
        let mut document = Document::new("calc");
        document.blocks = KeyedVec::from_values(vec![
            Block::note_with_segments(
                vec![Segment::text("let "), Segment::math("x=1")],
                0,
                false,
            ),
            Block::table(1),
        ]);
        document
    }

    #[test]
    fn envelope_strips_keys_and_tags_version_three() {
        let envelope = serialize_document(&sample(), Some("https://notes.test/d/1"));
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["version"], 3);
        assert_eq!(json["blocks"][0]["type"], "NOTE");
        assert_eq!(json["blocks"][0]["isAnswer"], false);
        assert_eq!(json["blocks"][0]["content"][0]["type"], "TEXT");
        assert!(json["blocks"][0].get("key").is_none());
        assert_eq!(
            json["meta"],
            "Open this document at https://notes.test/d/1"
        );
    }

    #[test]
    fn unknown_block_type_fails_the_whole_load() {
        let json = r#"{"title":"t","blocks":[{"type":"CHART","indent":0}],"version":3}"#;
        let err = deserialize_document(json).unwrap_err();
        assert!(matches!(err, DeserializeError::UnknownBlockType(kind) if kind == "CHART"));
    }

    #[test]
    fn wrong_version_is_rejected() {
        let json = r#"{"title":"t","blocks":[],"version":2}"#;
        let err = deserialize_document(json).unwrap_err();
        assert!(matches!(err, DeserializeError::UnsupportedVersion(2)));
    }
}

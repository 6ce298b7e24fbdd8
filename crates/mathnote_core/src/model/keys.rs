//! Keyed collection primitives.
//!
//! # Responsibility
//! - Mint stable identities for ordered document items.
//! - Provide positional mutation that never disturbs sibling identities.
//!
//! # Invariants
//! - A `Key` is assigned once at creation and never reused after removal.
//! - Keys order nothing; position is carried by the sequence itself.
//! - Out-of-range positional access fails with `IndexError`, never clamps.
//!
//! # See also
//! - docs/architecture/data-model.md

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identity tag for one item in a keyed sequence.
///
/// Used for list reconciliation only; two keys compare equal iff they were
/// minted as the same identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key(Uuid);

impl Key {
    /// Mints a fresh identity.
    pub fn mint() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Out-of-range positional access on a keyed sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexError {
    /// Requested position.
    pub index: usize,
    /// Sequence length at the time of the access.
    pub len: usize,
}

impl Display for IndexError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "index {} out of range for length {}", self.index, self.len)
    }
}

impl Error for IndexError {}

/// One value together with its minted identity.
#[derive(Debug, Clone)]
pub struct Keyed<T> {
    key: Key,
    /// The owned item value.
    pub value: T,
}

impl<T> Keyed<T> {
    fn new(value: T) -> Self {
        Self {
            key: Key::mint(),
            value,
        }
    }

    /// Returns the stable identity of this item.
    pub fn key(&self) -> Key {
        self.key
    }
}

/// Ordered sequence of keyed items.
///
/// Every positional mutation keeps the keys of untouched items, mints fresh
/// keys for inserted items and discards the keys of removed items. Equality
/// compares values only; keys are identity, not state.
#[derive(Debug, Clone)]
pub struct KeyedVec<T> {
    items: Vec<Keyed<T>>,
}

// Manual impl: an empty sequence needs no `T: Default`, which the derive
// would require.
impl<T> Default for KeyedVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> KeyedVec<T> {
    /// Creates an empty sequence.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Creates a sequence from plain values, minting a key for each.
    pub fn from_values(values: Vec<T>) -> Self {
        Self {
            items: values.into_iter().map(Keyed::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index).map(|item| &item.value)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index).map(|item| &mut item.value)
    }

    /// Returns the identity at `index`, if in range.
    pub fn key_at(&self, index: usize) -> Option<Key> {
        self.items.get(index).map(Keyed::key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Keyed<T>> {
        self.items.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.items.iter().map(|item| &item.value)
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut().map(|item| &mut item.value)
    }

    /// Appends one value with a fresh key.
    pub fn push(&mut self, value: T) -> Key {
        let item = Keyed::new(value);
        let key = item.key;
        self.items.push(item);
        key
    }

    /// Replaces the value at `index`, keeping its key.
    ///
    /// # Errors
    /// Returns `IndexError` when `index >= len`.
    pub fn set(&mut self, index: usize, value: T) -> Result<(), IndexError> {
        let len = self.items.len();
        let item = self.items.get_mut(index).ok_or(IndexError { index, len })?;
        item.value = value;
        Ok(())
    }

    /// Inserts a value at `index` with a fresh key, shifting items at
    /// `>= index` right by one.
    ///
    /// # Errors
    /// Returns `IndexError` when `index > len`.
    pub fn insert(&mut self, index: usize, value: T) -> Result<Key, IndexError> {
        let len = self.items.len();
        if index > len {
            return Err(IndexError { index, len });
        }
        let item = Keyed::new(value);
        let key = item.key;
        self.items.insert(index, item);
        Ok(key)
    }

    /// Removes the value at `index`, discarding its key forever.
    ///
    /// # Errors
    /// Returns `IndexError` when `index >= len`.
    pub fn remove(&mut self, index: usize) -> Result<T, IndexError> {
        let len = self.items.len();
        if index >= len {
            return Err(IndexError { index, len });
        }
        Ok(self.items.remove(index).value)
    }

    /// Splices the sequence: removes `count` items starting at `index` and
    /// inserts `values` there, each with a fresh key.
    ///
    /// # Errors
    /// Returns `IndexError` when `index + count > len`.
    pub fn replace(&mut self, index: usize, count: usize, values: Vec<T>) -> Result<(), IndexError> {
        let len = self.items.len();
        if index + count > len {
            return Err(IndexError {
                index: index + count,
                len,
            });
        }
        self.items
            .splice(index..index + count, values.into_iter().map(Keyed::new));
        Ok(())
    }
}

impl<T: PartialEq> PartialEq for KeyedVec<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items.len() == other.items.len()
            && self
                .items
                .iter()
                .zip(other.items.iter())
                .all(|(a, b)| a.value == b.value)
    }
}

impl<T: Eq> Eq for KeyedVec<T> {}

impl<T> FromIterator<T> for KeyedVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(Keyed::new).collect(),
        }
    }
}

// Keys never reach the wire: a keyed sequence serializes as its plain values
// and deserialization mints a fresh key per value.
impl<T: Serialize> Serialize for KeyedVec<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.items.len()))?;
        for item in &self.items {
            seq.serialize_element(&item.value)?;
        }
        seq.end()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for KeyedVec<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<T>::deserialize(deserializer).map(Self::from_values)
    }
}

//! Storage and state management interfaces for voteworks modules.

#![deny(missing_docs)]

mod event;
mod internal_cache;
mod map;
mod scratchpad;

/// Trait and type definitions related to the [`Storage`] trait.
pub mod storage;
mod value;

#[cfg(test)]
mod state_tests;

use std::fmt::Display;
use std::str;

pub use event::Event;
pub use internal_cache::{
    CacheKey, CacheValue, OrderedReadsAndWrites, ReadError, StorageInternalCache,
};
pub use map::{StateMap, StateMapError};
pub use scratchpad::{StateCheckpoint, WorkingSet};
pub use storage::{MemoryStorage, Storage};
pub use value::{StateValue, StateValueError};

/// A prefix prepended to each key before insertion and retrieval from the
/// storage.
///
/// All state containers of a module share one working set, so each container
/// carries its own prefix to keep its keys from colliding with the keys of
/// its neighbours.
#[derive(
    borsh::BorshDeserialize,
    borsh::BorshSerialize,
    Debug,
    PartialEq,
    Eq,
    Clone,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Prefix {
    prefix: Vec<u8>,
}

impl Display for Prefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match str::from_utf8(&self.prefix) {
            Ok(s) => write!(f, "{:?}", s),
            Err(_) => write!(f, "0x{}", hex::encode(&self.prefix)),
        }
    }
}

impl Prefix {
    /// Creates a new prefix from a byte vector.
    pub fn new(prefix: Vec<u8>) -> Self {
        Self { prefix }
    }

    /// Returns the prefix bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.prefix
    }

    /// Returns the length in bytes of the prefix.
    pub fn len(&self) -> usize {
        self.prefix.len()
    }

    /// Returns `true` if the prefix is empty, `false` otherwise.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prefix.is_empty()
    }
}

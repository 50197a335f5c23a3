use std::collections::HashMap;
use std::fmt::Display;
use std::sync::{Arc, RwLock};

use anyhow::ensure;
use borsh::{BorshDeserialize, BorshSerialize};

use crate::internal_cache::{CacheKey, CacheValue, OrderedReadsAndWrites};
use crate::Prefix;

/// `Key` type for the [`Storage`].
#[derive(
    Clone, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize, BorshDeserialize,
    BorshSerialize,
)]
pub struct StorageKey {
    key: Arc<Vec<u8>>,
}

impl StorageKey {
    /// Creates a new [`StorageKey`] that combines a prefix and a key.
    pub fn new<K: BorshSerialize>(prefix: &Prefix, key: &K) -> Self {
        let encoded_key = key
            .try_to_vec()
            // Serializing an in-memory value only fails on a broken
            // `BorshSerialize` impl.
            .unwrap_or_else(|e| panic!("unable to serialize storage key: {e:?}"));

        let mut full_key = Vec::with_capacity(prefix.len() + encoded_key.len());
        full_key.extend_from_slice(prefix.as_bytes());
        full_key.extend_from_slice(&encoded_key);

        Self {
            key: Arc::new(full_key),
        }
    }

    /// Creates a new [`StorageKey`] holding only a prefix, for singleton
    /// values.
    pub fn singleton(prefix: &Prefix) -> Self {
        Self {
            key: Arc::new(prefix.as_bytes().to_vec()),
        }
    }

    /// Converts this key into a [`CacheKey`].
    pub fn to_cache_key(&self) -> CacheKey {
        CacheKey {
            key: self.key.clone(),
        }
    }
}

impl From<CacheKey> for StorageKey {
    fn from(cache_key: CacheKey) -> Self {
        Self { key: cache_key.key }
    }
}

impl AsRef<[u8]> for StorageKey {
    fn as_ref(&self) -> &[u8] {
        &self.key
    }
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.key.as_ref()))
    }
}

/// A serialized value suitable for storing. Internally uses an
/// [`Arc<Vec<u8>>`] for cheap cloning.
#[derive(
    Clone, Debug, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize, BorshDeserialize,
    BorshSerialize,
)]
pub struct StorageValue {
    value: Arc<Vec<u8>>,
}

impl StorageValue {
    /// Creates a new storage value by serializing the input with borsh.
    pub fn new<V: BorshSerialize>(value: &V) -> Self {
        let encoded_value = value
            .try_to_vec()
            .unwrap_or_else(|e| panic!("unable to serialize storage value: {e:?}"));
        Self {
            value: Arc::new(encoded_value),
        }
    }

    /// The bytes of this value.
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Converts this value into a [`CacheValue`].
    pub fn into_cache_value(self) -> CacheValue {
        CacheValue { value: self.value }
    }
}

impl From<CacheValue> for StorageValue {
    fn from(cache_value: CacheValue) -> Self {
        Self {
            value: cache_value.value,
        }
    }
}

/// An interface for storing and retrieving committed values.
pub trait Storage: Clone {
    /// Returns the committed value for the key, if any.
    fn get(&self, key: &StorageKey) -> Option<StorageValue>;

    /// Validates the read set of a frozen unit of work against the current
    /// committed state and, if consistent, applies its write set atomically.
    fn validate_and_commit(&self, state_update: OrderedReadsAndWrites) -> anyhow::Result<()>;
}

/// An in-memory [`Storage`] backend.
///
/// Committed cells live behind an [`Arc`] that is swapped wholesale on each
/// commit, so a [`MemoryStorage::snapshot`] taken at any point observes
/// either all of a commit or none of it.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    cells: Arc<RwLock<Arc<HashMap<CacheKey, CacheValue>>>>,
}

impl MemoryStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a detached handle frozen at the currently committed state.
    ///
    /// Commits applied to the original after this call are not visible
    /// through the snapshot.
    pub fn snapshot(&self) -> Self {
        let cells = self.cells.read().expect("storage lock poisoned").clone();
        Self {
            cells: Arc::new(RwLock::new(cells)),
        }
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &StorageKey) -> Option<StorageValue> {
        self.cells
            .read()
            .expect("storage lock poisoned")
            .get(&key.to_cache_key())
            .map(|value| StorageValue::from(value.clone()))
    }

    fn validate_and_commit(&self, state_update: OrderedReadsAndWrites) -> anyhow::Result<()> {
        let mut cells = self.cells.write().expect("storage lock poisoned");

        for (key, expected) in &state_update.ordered_reads {
            ensure!(
                cells.get(key) == expected.as_ref(),
                "stale read: the storage was modified since the working set was created",
            );
        }

        let mut next = (**cells).clone();
        for (key, value) in state_update.ordered_writes {
            match value {
                Some(value) => next.insert(key, value),
                None => next.remove(&key),
            };
        }
        *cells = Arc::new(next);

        Ok(())
    }
}

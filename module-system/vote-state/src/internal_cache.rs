use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::storage::{StorageKey, StorageValue};
use crate::Storage;

/// A key in the key-value cache. Internally an [`Arc<Vec<u8>>`] so that
/// clones between the cache and the storage layer stay cheap.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    /// The raw key bytes.
    pub key: Arc<Vec<u8>>,
}

/// A value in the key-value cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheValue {
    /// The raw value bytes.
    pub value: Arc<Vec<u8>>,
}

/// Error returned when a read is inconsistent with an earlier access to the
/// same key.
#[derive(Error, Debug, Eq, PartialEq)]
pub enum ReadError {
    /// Two reads of one key observed different values.
    #[error("inconsistent read, expected: {expected:?}, found: {found:?}")]
    InconsistentRead {
        /// The value recorded by the earlier access.
        expected: Option<CacheValue>,
        /// The value produced by the offending read.
        found: Option<CacheValue>,
    },
}

/// A cache entry can be in three states:
/// - Does not exist, the key was never accessed: `ValueExists::No`
/// - Accessed, and the key was absent: `ValueExists::Yes(None)`
/// - Accessed, and the key held a value: `ValueExists::Yes(Some(value))`
pub(crate) enum ValueExists {
    Yes(Option<CacheValue>),
    No,
}

/// The access history of a single key: the first read and the last write.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Access {
    Read(Option<CacheValue>),
    ReadThenWrite {
        original: Option<CacheValue>,
        modified: Option<CacheValue>,
    },
    Write(Option<CacheValue>),
}

impl Access {
    fn last_value(&self) -> &Option<CacheValue> {
        match self {
            Access::Read(value) => value,
            Access::ReadThenWrite { modified, .. } => modified,
            Access::Write(value) => value,
        }
    }

    fn write_value(&mut self, new_value: Option<CacheValue>) {
        match self {
            Access::Read(original) => {
                *self = Access::ReadThenWrite {
                    original: original.take(),
                    modified: new_value,
                }
            }
            Access::ReadThenWrite { modified, .. } => *modified = new_value,
            Access::Write(value) => *value = new_value,
        }
    }
}

/// Keeps track of the first read and the last write for each key touched by
/// a unit of work.
#[derive(Default)]
pub(crate) struct CacheLog {
    log: HashMap<CacheKey, Access>,
}

impl CacheLog {
    /// Returns the latest value recorded for the key.
    pub(crate) fn get_value(&self, key: &CacheKey) -> ValueExists {
        match self.log.get(key) {
            Some(value) => ValueExists::Yes(value.last_value().clone()),
            None => ValueExists::No,
        }
    }

    /// Records the first read for a key. For an existing entry, checks that
    /// the read is consistent with the previous access.
    pub(crate) fn add_read(
        &mut self,
        key: CacheKey,
        value: Option<CacheValue>,
    ) -> Result<(), ReadError> {
        match self.log.entry(key) {
            Entry::Occupied(existing) => {
                let last_value = existing.get().last_value().clone();

                if last_value != value {
                    return Err(ReadError::InconsistentRead {
                        expected: last_value,
                        found: value,
                    });
                }
                Ok(())
            }
            Entry::Vacant(vacancy) => {
                vacancy.insert(Access::Read(value));
                Ok(())
            }
        }
    }

    /// Records a write for a key, superseding any previous write.
    pub(crate) fn add_write(&mut self, key: CacheKey, value: Option<CacheValue>) {
        match self.log.entry(key) {
            Entry::Occupied(mut existing) => {
                existing.get_mut().write_value(value);
            }
            Entry::Vacant(vacancy) => {
                vacancy.insert(Access::Write(value));
            }
        }
    }

    fn take_writes(self) -> Vec<(CacheKey, Option<CacheValue>)> {
        self.log
            .into_iter()
            .filter_map(|(key, access)| match access {
                Access::Read(_) => None,
                Access::ReadThenWrite { modified, .. } => Some((key, modified)),
                Access::Write(value) => Some((key, value)),
            })
            .collect()
    }
}

/// Caches reads and writes for (key, value) pairs. On the first read the
/// value is fetched from the backing [`Storage`]; following reads are served
/// from the cache and checked for consistency.
#[derive(Default)]
pub struct StorageInternalCache {
    tx_cache: CacheLog,
    ordered_db_reads: Vec<(CacheKey, Option<CacheValue>)>,
}

/// The values read from the backing storage and the values to be written,
/// both in deterministic order.
#[derive(Debug, Default)]
pub struct OrderedReadsAndWrites {
    /// Key-value pairs observed on first reads, in read order.
    pub ordered_reads: Vec<(CacheKey, Option<CacheValue>)>,
    /// Key-value pairs to write, sorted by key.
    pub ordered_writes: Vec<(CacheKey, Option<CacheValue>)>,
}

impl From<StorageInternalCache> for OrderedReadsAndWrites {
    fn from(val: StorageInternalCache) -> Self {
        let ordered_reads = val.ordered_db_reads;
        let mut writes = val.tx_cache.take_writes();
        writes.sort_by(|(k1, _), (k2, _)| k1.cmp(k2));
        Self {
            ordered_reads,
            ordered_writes: writes,
        }
    }
}

impl StorageInternalCache {
    /// Gets a value from the cache, or fetches it from the backing storage
    /// on the first access.
    pub(crate) fn get_or_fetch<S: Storage>(
        &mut self,
        key: &StorageKey,
        value_reader: &S,
    ) -> Option<StorageValue> {
        let cache_key = key.to_cache_key();

        match self.tx_cache.get_value(&cache_key) {
            ValueExists::Yes(cache_value) => cache_value.map(Into::into),
            ValueExists::No => {
                let storage_value = value_reader.get(key);
                let cache_value = storage_value.as_ref().map(|v| v.clone().into_cache_value());

                self.add_read(cache_key, cache_value);
                storage_value
            }
        }
    }

    pub(crate) fn set(&mut self, key: &StorageKey, value: StorageValue) {
        self.tx_cache
            .add_write(key.to_cache_key(), Some(value.into_cache_value()));
    }

    pub(crate) fn delete(&mut self, key: &StorageKey) {
        self.tx_cache.add_write(key.to_cache_key(), None);
    }

    fn add_read(&mut self, key: CacheKey, value: Option<CacheValue>) {
        self.tx_cache
            .add_read(key.clone(), value.clone())
            // The cache must stay consistent; a mismatch means the caller
            // mixed working sets over diverging storage.
            .unwrap_or_else(|e| panic!("inconsistent read from the cache: {e:?}"));
        self.ordered_db_reads.push((key, value))
    }
}

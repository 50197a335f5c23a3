use std::collections::HashMap;
use std::fmt::Debug;

use borsh::{BorshDeserialize, BorshSerialize};

use crate::internal_cache::{CacheKey, CacheValue, OrderedReadsAndWrites, StorageInternalCache};
use crate::storage::{StorageKey, StorageValue};
use crate::{Event, Prefix, Storage};

/// Accumulates reads and writes on top of the underlying storage.
struct Delta<S: Storage> {
    inner: S,
    cache: StorageInternalCache,
}

/// A wrapper that stages additional writes on top of an underlying [`Delta`].
///
/// Reads are recorded in the underlying delta even when the wrapper is later
/// reverted: a reverted unit of work still executed against a definite state,
/// and the read log has to say which one.
struct RevertableDelta<S: Storage> {
    /// The inner (non-revertable) delta.
    inner: Delta<S>,
    /// The most recent values written. Reads check this map first and fall
    /// back to the underlying delta.
    writes: HashMap<CacheKey, Option<CacheValue>>,
}

/// The accumulated read-write set of one or more committed units of work.
///
/// Obtained from a [`WorkingSet`] by either committing it ([`WorkingSet::checkpoint`])
/// or reverting it ([`WorkingSet::revert`]).
pub struct StateCheckpoint<S: Storage> {
    delta: Delta<S>,
}

impl<S: Storage> StateCheckpoint<S> {
    /// Creates a checkpoint directly on top of the given storage.
    pub fn new(inner: S) -> Self {
        Self {
            delta: Delta::new(inner),
        }
    }

    /// Starts a new revertable unit of work on top of this checkpoint.
    pub fn to_revertable(self) -> WorkingSet<S> {
        WorkingSet {
            delta: self.delta.get_revertable_wrapper(),
            events: Default::default(),
        }
    }

    /// Extracts the ordered read/write log, ready for
    /// [`Storage::validate_and_commit`].
    pub fn freeze(&mut self) -> OrderedReadsAndWrites {
        self.delta.freeze()
    }
}

/// The staged read-write set and the events collected while executing a unit
/// of work.
///
/// There are two ways out of a working set:
/// 1. [`WorkingSet::checkpoint`] folds the staged writes into the underlying
///    [`StateCheckpoint`];
/// 2. [`WorkingSet::revert`] discards them and returns the previous
///    checkpoint untouched.
pub struct WorkingSet<S: Storage> {
    delta: RevertableDelta<S>,
    events: Vec<Event>,
}

impl<S: Storage> WorkingSet<S> {
    /// Creates a fresh working set on top of the given storage.
    pub fn new(inner: S) -> Self {
        StateCheckpoint::new(inner).to_revertable()
    }

    /// Commits the staged writes into a [`StateCheckpoint`].
    pub fn checkpoint(self) -> StateCheckpoint<S> {
        StateCheckpoint {
            delta: self.delta.commit(),
        }
    }

    /// Discards the staged writes, returning the previous checkpoint.
    pub fn revert(self) -> StateCheckpoint<S> {
        StateCheckpoint {
            delta: self.delta.revert(),
        }
    }

    pub(crate) fn get(&mut self, key: StorageKey) -> Option<StorageValue> {
        self.delta.get(key)
    }

    pub(crate) fn set(&mut self, key: StorageKey, value: StorageValue) {
        self.delta.set(key, value)
    }

    pub(crate) fn delete(&mut self, key: StorageKey) {
        self.delta.delete(key)
    }

    /// Records an event to be surfaced if this unit of work commits.
    pub fn add_event(&mut self, key: &str, value: &str) {
        self.events.push(Event::new(key, value));
    }

    /// Takes ownership of the accumulated events.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// The events accumulated so far.
    pub fn events(&self) -> &[Event] {
        &self.events
    }
}

impl<S: Storage> WorkingSet<S> {
    pub(crate) fn set_value<K: BorshSerialize, V: BorshSerialize>(
        &mut self,
        prefix: &Prefix,
        storage_key: &K,
        value: &V,
    ) {
        let storage_key = StorageKey::new(prefix, storage_key);
        let storage_value = StorageValue::new(value);
        self.set(storage_key, storage_value);
    }

    pub(crate) fn get_value<K: BorshSerialize, V: BorshDeserialize>(
        &mut self,
        prefix: &Prefix,
        storage_key: &K,
    ) -> Option<V> {
        let storage_key = StorageKey::new(prefix, storage_key);
        self.get_decoded(storage_key)
    }

    pub(crate) fn remove_value<K: BorshSerialize, V: BorshDeserialize>(
        &mut self,
        prefix: &Prefix,
        storage_key: &K,
    ) -> Option<V> {
        let storage_key = StorageKey::new(prefix, storage_key);
        let storage_value = self.get_decoded(storage_key.clone())?;
        self.delete(storage_key);
        Some(storage_value)
    }

    pub(crate) fn delete_value<K: BorshSerialize>(&mut self, prefix: &Prefix, storage_key: &K) {
        let storage_key = StorageKey::new(prefix, storage_key);
        self.delete(storage_key);
    }

    pub(crate) fn set_singleton<V: BorshSerialize>(&mut self, prefix: &Prefix, value: &V) {
        let storage_key = StorageKey::singleton(prefix);
        self.set(storage_key, StorageValue::new(value));
    }

    pub(crate) fn get_singleton<V: BorshDeserialize>(&mut self, prefix: &Prefix) -> Option<V> {
        let storage_key = StorageKey::singleton(prefix);
        self.get_decoded(storage_key)
    }

    pub(crate) fn remove_singleton<V: BorshDeserialize>(&mut self, prefix: &Prefix) -> Option<V> {
        let storage_key = StorageKey::singleton(prefix);
        let storage_value = self.get_decoded(storage_key.clone())?;
        self.delete(storage_key);
        Some(storage_value)
    }

    pub(crate) fn delete_singleton(&mut self, prefix: &Prefix) {
        let storage_key = StorageKey::singleton(prefix);
        self.delete(storage_key);
    }

    fn get_decoded<V: BorshDeserialize>(&mut self, storage_key: StorageKey) -> Option<V> {
        let storage_value = self.get(storage_key)?;

        // A decode failure here means the stored bytes are corrupt.
        Some(
            V::try_from_slice(storage_value.value())
                .unwrap_or_else(|e| panic!("unable to deserialize storage value: {e:?}")),
        )
    }
}

impl<S: Storage> RevertableDelta<S> {
    fn get(&mut self, key: StorageKey) -> Option<StorageValue> {
        let key = key.to_cache_key();
        if let Some(value) = self.writes.get(&key) {
            return value.clone().map(StorageValue::from);
        }
        self.inner.get(key.into())
    }

    fn set(&mut self, key: StorageKey, value: StorageValue) {
        self.writes
            .insert(key.to_cache_key(), Some(value.into_cache_value()));
    }

    fn delete(&mut self, key: StorageKey) {
        self.writes.insert(key.to_cache_key(), None);
    }

    fn commit(self) -> Delta<S> {
        let mut inner = self.inner;

        for (k, v) in self.writes.into_iter() {
            match v {
                Some(v) => inner.set(k.into(), StorageValue::from(v)),
                None => inner.delete(k.into()),
            }
        }

        inner
    }

    fn revert(self) -> Delta<S> {
        self.inner
    }
}

impl<S: Storage> Delta<S> {
    fn new(inner: S) -> Self {
        Self {
            inner,
            cache: Default::default(),
        }
    }

    fn get_revertable_wrapper(self) -> RevertableDelta<S> {
        RevertableDelta {
            inner: self,
            writes: Default::default(),
        }
    }

    fn get(&mut self, key: StorageKey) -> Option<StorageValue> {
        self.cache.get_or_fetch(&key, &self.inner)
    }

    fn set(&mut self, key: StorageKey, value: StorageValue) {
        self.cache.set(&key, value)
    }

    fn delete(&mut self, key: StorageKey) {
        self.cache.delete(&key)
    }

    fn freeze(&mut self) -> OrderedReadsAndWrites {
        std::mem::take(&mut self.cache).into()
    }
}

impl<S: Storage> Debug for Delta<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Delta").finish()
    }
}

use std::marker::PhantomData;

use borsh::{BorshDeserialize, BorshSerialize};
use thiserror::Error;

use crate::storage::StorageKey;
use crate::{Prefix, Storage, WorkingSet};

/// A container that maps keys to values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateMap<K, V> {
    _phantom: (PhantomData<K>, PhantomData<V>),
    prefix: Prefix,
}

/// Error type for the [`StateMap::get_or_err`] method.
#[derive(Debug, Error)]
pub enum StateMapError {
    /// The map holds no value for the key.
    #[error("value not found for prefix: {0} and storage key: {1}")]
    MissingValue(Prefix, StorageKey),
}

impl<K, V> StateMap<K, V> {
    /// Creates a new [`StateMap`] with the given prefix.
    pub fn new(prefix: Prefix) -> Self {
        Self {
            _phantom: (PhantomData, PhantomData),
            prefix,
        }
    }

    /// Returns the prefix used when this [`StateMap`] was created.
    pub fn prefix(&self) -> &Prefix {
        &self.prefix
    }
}

impl<K: BorshSerialize, V: BorshSerialize + BorshDeserialize> StateMap<K, V> {
    /// Inserts a key-value pair into the map.
    pub fn set<S: Storage>(&self, key: &K, value: &V, working_set: &mut WorkingSet<S>) {
        working_set.set_value(self.prefix(), key, value)
    }

    /// Returns the value corresponding to the key, or [`None`] if the map
    /// doesn't contain the key.
    pub fn get<S: Storage>(&self, key: &K, working_set: &mut WorkingSet<S>) -> Option<V> {
        working_set.get_value(self.prefix(), key)
    }

    /// Returns the value corresponding to the key, or [`StateMapError`] if
    /// the key is absent.
    pub fn get_or_err<S: Storage>(
        &self,
        key: &K,
        working_set: &mut WorkingSet<S>,
    ) -> Result<V, StateMapError> {
        self.get(key, working_set).ok_or_else(|| {
            StateMapError::MissingValue(self.prefix().clone(), StorageKey::new(self.prefix(), key))
        })
    }

    /// Removes a key from the map, returning the corresponding value (or
    /// [`None`] if the key is absent).
    pub fn remove<S: Storage>(&self, key: &K, working_set: &mut WorkingSet<S>) -> Option<V> {
        working_set.remove_value(self.prefix(), key)
    }

    /// Deletes a key-value pair from the map without deserializing the
    /// removed value.
    pub fn delete<S: Storage>(&self, key: &K, working_set: &mut WorkingSet<S>) {
        working_set.delete_value(self.prefix(), key);
    }
}

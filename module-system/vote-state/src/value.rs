use std::marker::PhantomData;

use borsh::{BorshDeserialize, BorshSerialize};
use thiserror::Error;

use crate::{Prefix, Storage, WorkingSet};

/// Container for a single value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateValue<V> {
    _phantom: PhantomData<V>,
    prefix: Prefix,
}

/// Error type for the [`StateValue::get_or_err`] method.
#[derive(Debug, Error)]
pub enum StateValueError {
    /// The container holds no value.
    #[error("value not found for prefix: {0}")]
    MissingValue(Prefix),
}

impl<V> StateValue<V> {
    /// Creates a new [`StateValue`] with the given prefix.
    pub fn new(prefix: Prefix) -> Self {
        Self {
            _phantom: PhantomData,
            prefix,
        }
    }

    /// Returns the prefix used when this [`StateValue`] was created.
    pub fn prefix(&self) -> &Prefix {
        &self.prefix
    }
}

impl<V: BorshSerialize + BorshDeserialize> StateValue<V> {
    /// Sets the value.
    pub fn set<S: Storage>(&self, value: &V, working_set: &mut WorkingSet<S>) {
        working_set.set_singleton(self.prefix(), value)
    }

    /// Gets the value, or [`None`] if it was never set.
    pub fn get<S: Storage>(&self, working_set: &mut WorkingSet<S>) -> Option<V> {
        working_set.get_singleton(self.prefix())
    }

    /// Gets the value, or [`StateValueError`] if it was never set.
    pub fn get_or_err<S: Storage>(
        &self,
        working_set: &mut WorkingSet<S>,
    ) -> Result<V, StateValueError> {
        self.get(working_set)
            .ok_or_else(|| StateValueError::MissingValue(self.prefix().clone()))
    }

    /// Removes the value, returning it (or [`None`] if it was never set).
    pub fn remove<S: Storage>(&self, working_set: &mut WorkingSet<S>) -> Option<V> {
        working_set.remove_singleton(self.prefix())
    }

    /// Deletes the value.
    pub fn delete<S: Storage>(&self, working_set: &mut WorkingSet<S>) {
        working_set.delete_singleton(self.prefix());
    }
}

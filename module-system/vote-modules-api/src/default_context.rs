//! The concrete [`Context`] used by the full node.

use serde::{Deserialize, Serialize};
use vote_state::MemoryStorage;

use crate::{Address, Context, Spec};

/// Execution context backed by [`MemoryStorage`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DefaultContext {
    /// The authenticated sender of the current call.
    pub sender: Address,
}

impl Spec for DefaultContext {
    type Address = Address;
    type Storage = MemoryStorage;
}

impl Context for DefaultContext {
    fn sender(&self) -> &Self::Address {
        &self.sender
    }

    fn new(sender: Self::Address) -> Self {
        Self { sender }
    }
}

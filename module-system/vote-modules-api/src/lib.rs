#![doc = include_str!("../README.md")]

mod address;
mod bech32;
pub mod default_context;
mod error;
mod prefix;
mod response;


use core::fmt::Debug;

pub use address::{Address, AddressTrait};
use borsh::{BorshDeserialize, BorshSerialize};
pub use error::Error;
pub use prefix::Prefix;
pub use response::CallResponse;
pub use vote_state::{
    Event, MemoryStorage, StateMap, StateValue, Storage, WorkingSet,
};

pub use crate::bech32::{AddressBech32, Bech32ParseError};

/// Spec contains types common to all modules.
pub trait Spec {
    /// The authenticated caller identity. Opaque to the module system: it
    /// arrives already verified by the surrounding authentication layer.
    type Address: AddressTrait + BorshSerialize + BorshDeserialize;

    /// The backing storage that working sets run against.
    type Storage: Storage;
}

/// Context contains the per-call environment shared by all modules, most
/// importantly the sender identity. Identity is always threaded explicitly;
/// modules never infer it from ambient state.
pub trait Context: Spec + Clone + Debug + PartialEq {
    /// Sender of the call.
    fn sender(&self) -> &Self::Address;

    /// Constructor for the context.
    fn new(sender: Self::Address) -> Self;
}

/// Every module has to implement this trait.
pub trait Module {
    /// Execution context.
    type Context: Context;

    /// Configuration for the genesis method.
    type Config;

    /// Module defined argument to the call method.
    type CallMessage: Debug + BorshSerialize + BorshDeserialize;

    /// Genesis is called once at deployment and sets the initial state of
    /// the module.
    fn genesis(
        &self,
        _config: &Self::Config,
        _working_set: &mut WorkingSet<<Self::Context as Spec>::Storage>,
    ) -> Result<(), Error> {
        Ok(())
    }

    /// Call allows interaction with the module and invokes state changes.
    fn call(
        &self,
        _message: Self::CallMessage,
        _context: &Self::Context,
        _working_set: &mut WorkingSet<<Self::Context as Spec>::Storage>,
    ) -> Result<CallResponse, Error> {
        unreachable!()
    }
}

/// Every module has to implement this trait.
pub trait ModuleInfo {
    /// Execution context.
    type Context: Context;

    /// Returns the address of the module.
    fn address(&self) -> &<Self::Context as Spec>::Address;
}

#![doc = include_str!("../README.md")]

pub mod call;
mod genesis;

#[cfg(feature = "native")]
pub mod query;


mod types;

pub use call::{BallotError, CallMessage};
pub use types::Candidate;
use types::Voter;
use vote_modules_api::{
    CallResponse, Context, Error, Module, ModuleInfo, Prefix, Spec, StateMap, StateValue,
    WorkingSet,
};

const MODULE_PATH: &str = "module-implementations";
const MODULE_NAME: &str = "Ballot";

/// Initial configuration for the ballot module.
#[cfg_attr(
    feature = "native",
    derive(serde::Serialize, serde::Deserialize, Debug, PartialEq)
)]
pub struct BallotConfig<C: Context> {
    /// The administrator identity. The only identity allowed to register
    /// voters and candidates, fixed for the lifetime of the ballot.
    pub admin: C::Address,
}

/// The ballot module.
///
/// Voter records double as the registration set: an identity is registered
/// iff it has an entry in `voters`, and the entry says whether its single
/// vote has been spent. Candidates are keyed by identity; the roster keeps
/// their registration order, which is also the tie-break order for winner
/// resolution.
#[derive(Clone)]
pub struct Ballot<C: Context> {
    /// Address of the module.
    pub address: C::Address,

    pub(crate) admin: StateValue<C::Address>,

    pub(crate) voters: StateMap<C::Address, Voter>,

    pub(crate) candidates: StateMap<C::Address, Candidate>,

    pub(crate) candidate_roster: StateValue<Vec<C::Address>>,

    pub(crate) total_votes: StateValue<u64>,
}

impl<C: Context> Default for Ballot<C> {
    fn default() -> Self {
        let prefix = |storage_name| Prefix::new(MODULE_PATH, MODULE_NAME, storage_name);

        Self {
            address: prefix("").module_address(),
            admin: StateValue::new(prefix("admin").into()),
            voters: StateMap::new(prefix("voters").into()),
            candidates: StateMap::new(prefix("candidates").into()),
            candidate_roster: StateValue::new(prefix("candidate_roster").into()),
            total_votes: StateValue::new(prefix("total_votes").into()),
        }
    }
}

impl<C: Context> ModuleInfo for Ballot<C> {
    type Context = C;

    fn address(&self) -> &<Self::Context as Spec>::Address {
        &self.address
    }
}

impl<C: Context> Module for Ballot<C> {
    type Context = C;

    type Config = BallotConfig<C>;

    type CallMessage = call::CallMessage<C>;

    fn genesis(
        &self,
        config: &Self::Config,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<(), Error> {
        Ok(self.init_module(config, working_set)?)
    }

    fn call(
        &self,
        msg: Self::CallMessage,
        context: &Self::Context,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<CallResponse, Error> {
        match msg {
            Self::CallMessage::RegisterVoter(voter_address) => {
                Ok(self.register_voter(voter_address, context, working_set)?)
            }

            Self::CallMessage::RegisterCandidate { name, address } => {
                Ok(self.register_candidate(name, address, context, working_set)?)
            }

            Self::CallMessage::Vote(candidate_address) => {
                Ok(self.cast_vote(candidate_address, context, working_set)?)
            }
        }
    }
}

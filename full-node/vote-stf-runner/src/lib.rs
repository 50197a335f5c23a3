#![doc = include_str!("../README.md")]

pub mod config;

use std::sync::Mutex;

use tracing::{debug, error};
use vote_ballot::query::{CandidateResponse, WinnerResponse};
use vote_ballot::{Ballot, BallotConfig, BallotError, CallMessage};
use vote_modules_api::default_context::DefaultContext;
use vote_modules_api::{
    Address, Context, Error, Event, MemoryStorage, Module, Storage, WorkingSet,
};

/// The ballot state machine behind its single write lock.
///
/// Every mutating call is applied as one all-or-nothing step: preconditions
/// and writes run against a revertable working set, and only a call that
/// returns `Ok` reaches committed storage. Queries never take the write
/// lock; they read from a storage snapshot.
pub struct BallotApp {
    storage: MemoryStorage,
    ballot: Ballot<DefaultContext>,
    call_lock: Mutex<()>,
}

impl BallotApp {
    /// Creates the app and runs module genesis with the given configuration.
    pub fn new(genesis: BallotConfig<DefaultContext>) -> anyhow::Result<Self> {
        let storage = MemoryStorage::new();
        let ballot = Ballot::<DefaultContext>::default();

        let mut working_set = WorkingSet::new(storage.clone());
        ballot.genesis(&genesis, &mut working_set)?;
        storage.validate_and_commit(working_set.checkpoint().freeze())?;

        Ok(Self {
            storage,
            ballot,
            call_lock: Mutex::new(()),
        })
    }

    /// Applies one call from `sender` atomically.
    ///
    /// On success the staged writes are committed and the call's events are
    /// returned. On failure the working set is reverted; no state change is
    /// observable, and the module error is passed through.
    pub fn apply_call(
        &self,
        sender: Address,
        msg: CallMessage<DefaultContext>,
    ) -> Result<Vec<Event>, Error> {
        let _guard = self.call_lock.lock().expect("call lock poisoned");

        let mut working_set = WorkingSet::new(self.storage.clone());
        let context = DefaultContext::new(sender);

        match self.ballot.call(msg, &context, &mut working_set) {
            Ok(_response) => {
                let events = working_set.take_events();
                self.storage
                    .validate_and_commit(working_set.checkpoint().freeze())
                    // The lock serializes commits, so the read set cannot
                    // have gone stale.
                    .expect("storage update must succeed");
                debug!(events = events.len(), "call applied");
                Ok(events)
            }
            Err(err) => {
                working_set.revert();
                error!(%err, "call reverted");
                Err(err)
            }
        }
    }

    /// Whether the identity has been registered as a voter.
    pub fn is_registered(&self, voter_address: &Address) -> bool {
        self.ballot
            .is_registered(voter_address, &mut self.query_set())
    }

    /// Whether the identity has cast its vote.
    pub fn has_voted(&self, voter_address: &Address) -> bool {
        self.ballot.has_voted(voter_address, &mut self.query_set())
    }

    /// The candidate registered under the given identity.
    pub fn candidate(&self, candidate_address: &Address) -> Result<CandidateResponse, BallotError> {
        self.ballot
            .candidate(candidate_address, &mut self.query_set())
    }

    /// The vote count of a single candidate.
    pub fn candidate_vote_count(&self, candidate_address: &Address) -> Result<u64, BallotError> {
        self.ballot
            .candidate_vote_count(candidate_address, &mut self.query_set())
    }

    /// The total number of accepted votes.
    pub fn total_vote_count(&self) -> u64 {
        self.ballot.total_vote_count(&mut self.query_set())
    }

    /// The candidate currently holding the most votes.
    pub fn winning_candidate(&self) -> Result<WinnerResponse, BallotError> {
        self.ballot.winning_candidate(&mut self.query_set())
    }

    fn query_set(&self) -> WorkingSet<MemoryStorage> {
        WorkingSet::new(self.storage.snapshot())
    }
}

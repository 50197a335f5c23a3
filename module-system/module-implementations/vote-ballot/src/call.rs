use anyhow::Result;
use thiserror::Error;
use vote_modules_api::{CallResponse, Context, WorkingSet};

use super::types::{Candidate, Voter};
use super::Ballot;

/// This enumeration represents the available call messages for interacting
/// with the ballot module.
#[cfg_attr(
    feature = "native",
    derive(serde::Serialize),
    derive(serde::Deserialize)
)]
#[derive(borsh::BorshDeserialize, borsh::BorshSerialize, Debug, PartialEq, Clone)]
pub enum CallMessage<C: Context> {
    /// Grants the voting right to an identity. Admin only.
    RegisterVoter(C::Address),
    /// Registers a candidate under a display name. Admin only.
    RegisterCandidate {
        /// Display name of the candidate.
        name: String,
        /// Identity votes for this candidate are cast against.
        address: C::Address,
    },
    /// Casts the sender's single vote for the given candidate.
    Vote(C::Address),
}

/// Errors raised by the ballot call handlers and queries. Anything outside
/// this taxonomy is a programming error, not a caller-visible failure.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum BallotError {
    #[error("sender {0} is not the ballot administrator")]
    NotAdmin(String),
    #[error("voter {0} is not registered")]
    VoterNotRegistered(String),
    #[error("voter {0} has already cast a vote")]
    AlreadyVoted(String),
    #[error("voter {0} is already registered")]
    VoterAlreadyRegistered(String),
    #[error("candidate {0} is not registered")]
    UnknownCandidate(String),
    #[error("candidate {0} is already registered")]
    CandidateAlreadyRegistered(String),
    #[error("no candidates have been registered")]
    NoCandidates,
    #[error("vote counter overflow")]
    VoteCountOverflow,
}

impl<C: Context> Ballot<C> {
    /// Registers a voter. Must be called by the admin; registering the same
    /// identity twice is rejected.
    pub(crate) fn register_voter(
        &self,
        voter_address: C::Address,
        context: &C,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<CallResponse> {
        self.ensure_admin(context, working_set)?;

        if self.voters.get(&voter_address, working_set).is_some() {
            Err(BallotError::VoterAlreadyRegistered(
                voter_address.to_string(),
            ))?;
        }

        self.voters.set(&voter_address, &Voter::fresh(), working_set);
        working_set.add_event(
            "register_voter",
            &format!("voter registered: {voter_address}"),
        );

        Ok(CallResponse::default())
    }

    /// Registers a candidate. Must be called by the admin; registering the
    /// same identity twice is rejected.
    pub(crate) fn register_candidate(
        &self,
        name: String,
        candidate_address: C::Address,
        context: &C,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<CallResponse> {
        self.ensure_admin(context, working_set)?;

        if self.candidates.get(&candidate_address, working_set).is_some() {
            Err(BallotError::CandidateAlreadyRegistered(
                candidate_address.to_string(),
            ))?;
        }

        // The roster keeps registration order, which is also the tie-break
        // order for winner resolution.
        let mut roster = self.candidate_roster.get(working_set).unwrap_or_default();
        roster.push(candidate_address.clone());
        self.candidate_roster.set(&roster, working_set);

        self.candidates
            .set(&candidate_address, &Candidate::new(name), working_set);

        working_set.add_event(
            "register_candidate",
            &format!("candidate registered: {candidate_address}"),
        );

        Ok(CallResponse::default())
    }

    /// Casts the sender's vote for `candidate_address`.
    ///
    /// Precondition order is part of the contract: an unregistered sender
    /// gets `VoterNotRegistered`, a registered sender who voted before gets
    /// `AlreadyVoted`, and only then is the candidate looked up. All checks
    /// run before any write.
    pub(crate) fn cast_vote(
        &self,
        candidate_address: C::Address,
        context: &C,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<CallResponse> {
        let sender = context.sender();

        let voter = self
            .voters
            .get(sender, working_set)
            .ok_or_else(|| BallotError::VoterNotRegistered(sender.to_string()))?;

        match voter {
            Voter::Voted => Err(BallotError::AlreadyVoted(sender.to_string()))?,
            Voter::Fresh => {}
        }

        let mut candidate = self
            .candidates
            .get(&candidate_address, working_set)
            .ok_or_else(|| BallotError::UnknownCandidate(candidate_address.to_string()))?;

        candidate.count = candidate
            .count
            .checked_add(1)
            .ok_or(BallotError::VoteCountOverflow)?;

        let total_votes = self
            .total_votes
            .get(working_set)
            .unwrap_or_default()
            .checked_add(1)
            .ok_or(BallotError::VoteCountOverflow)?;

        self.voters.set(sender, &Voter::voted(), working_set);
        self.candidates
            .set(&candidate_address, &candidate, working_set);
        self.total_votes.set(&total_votes, working_set);

        working_set.add_event("vote", &format!("vote from {sender} accepted"));

        Ok(CallResponse::default())
    }

    fn ensure_admin(&self, context: &C, working_set: &mut WorkingSet<C::Storage>) -> Result<()> {
        let admin = self.admin.get_or_err(working_set)?;

        if &admin != context.sender() {
            Err(BallotError::NotAdmin(context.sender().to_string()))?;
        }
        Ok(())
    }
}

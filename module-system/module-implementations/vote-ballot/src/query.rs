use vote_modules_api::{Context, WorkingSet};

use super::call::BallotError;
use super::Ballot;

/// A candidate as returned by queries.
#[derive(Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct CandidateResponse {
    /// Display name the candidate was registered under.
    pub name: String,
    /// Number of accepted votes.
    pub count: u64,
}

/// The current leader of the ballot.
///
/// Addresses are rendered in their bech32 string form.
#[derive(Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct WinnerResponse {
    /// Identity of the winning candidate.
    pub address: String,
    /// Display name of the winning candidate.
    pub name: String,
    /// Number of accepted votes for the winning candidate.
    pub count: u64,
}

impl<C: Context> Ballot<C> {
    /// Whether the identity has been registered as a voter.
    pub fn is_registered(
        &self,
        voter_address: &C::Address,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> bool {
        self.voters.get(voter_address, working_set).is_some()
    }

    /// Whether the identity has cast its vote. Unknown identities have not.
    pub fn has_voted(
        &self,
        voter_address: &C::Address,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> bool {
        matches!(
            self.voters.get(voter_address, working_set),
            Some(super::types::Voter::Voted)
        )
    }

    /// The candidate registered under the given identity.
    pub fn candidate(
        &self,
        candidate_address: &C::Address,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<CandidateResponse, BallotError> {
        let candidate = self
            .candidates
            .get(candidate_address, working_set)
            .ok_or_else(|| BallotError::UnknownCandidate(candidate_address.to_string()))?;

        Ok(CandidateResponse {
            name: candidate.name,
            count: candidate.count,
        })
    }

    /// The vote count of a single candidate.
    pub fn candidate_vote_count(
        &self,
        candidate_address: &C::Address,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<u64, BallotError> {
        Ok(self.candidate(candidate_address, working_set)?.count)
    }

    /// The total number of accepted votes across all candidates.
    pub fn total_vote_count(&self, working_set: &mut WorkingSet<C::Storage>) -> u64 {
        self.total_votes.get(working_set).unwrap_or_default()
    }

    /// The candidate currently holding the most votes.
    ///
    /// Ties resolve to the earliest-registered candidate: the scan walks
    /// the roster in registration order and only a strictly greater count
    /// displaces the running leader.
    pub fn winning_candidate(
        &self,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<WinnerResponse, BallotError> {
        let roster = self.candidate_roster.get(working_set).unwrap_or_default();

        let mut winner: Option<WinnerResponse> = None;
        for address in roster {
            let candidate = self
                .candidates
                .get(&address, working_set)
                // Every roster entry is inserted together with its
                // candidate record.
                .unwrap_or_else(|| panic!("roster entry without candidate record: {address}"));

            let leading = winner.as_ref().map(|w| w.count);
            if leading.map_or(true, |count| candidate.count > count) {
                winner = Some(WinnerResponse {
                    address: address.to_string(),
                    name: candidate.name,
                    count: candidate.count,
                });
            }
        }

        winner.ok_or(BallotError::NoCandidates)
    }
}

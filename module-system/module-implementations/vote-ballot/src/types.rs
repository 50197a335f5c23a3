use borsh::{BorshDeserialize, BorshSerialize};

/// A registered candidate: the display name it was registered under and its
/// running vote counter.
#[cfg_attr(feature = "native", derive(serde::Serialize, serde::Deserialize))]
#[derive(BorshDeserialize, BorshSerialize, Debug, Eq, PartialEq, Clone)]
pub struct Candidate {
    /// Display name.
    pub name: String,
    /// Number of accepted votes. Only ever incremented, by exactly one per
    /// accepted vote.
    pub count: u64,
}

impl Candidate {
    pub fn new(name: String) -> Self {
        Self { name, count: 0 }
    }
}

/// Per-voter ballot status. Presence in the voter map means the identity is
/// registered; `Voted` is terminal.
#[derive(BorshDeserialize, BorshSerialize, Debug, Clone, Eq, PartialEq)]
pub(crate) enum Voter {
    Fresh,
    Voted,
}

impl Voter {
    pub(crate) fn fresh() -> Self {
        Self::Fresh
    }

    pub(crate) fn voted() -> Self {
        Self::Voted
    }
}

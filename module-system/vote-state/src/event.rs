/// A key-value pair emitted by a module during call execution.
///
/// Events accumulate on the [`crate::WorkingSet`] and share its fate: they
/// are only surfaced for a unit of work that commits.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    borsh::BorshDeserialize,
    borsh::BorshSerialize,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Event {
    key: String,
    value: String,
}

impl Event {
    /// Creates an event from a key and a value.
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_owned(),
            value: value.to_owned(),
        }
    }

    /// The event key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The event value.
    pub fn value(&self) -> &str {
        &self.value
    }
}

use sha2::{Digest, Sha256};

// separator == "/"
const DOMAIN_SEPARATOR: [u8; 1] = [47];

/// A unique identifier for each state variable of a module.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Prefix {
    module_path: &'static str,
    module_name: &'static str,
    storage_name: &'static str,
}

impl Prefix {
    /// Creates a prefix for the `storage_name` field of the module
    /// `module_name` living at `module_path`.
    pub fn new(
        module_path: &'static str,
        module_name: &'static str,
        storage_name: &'static str,
    ) -> Self {
        Self {
            module_path,
            module_name,
            storage_name,
        }
    }

    /// Derives the deterministic address of the module that owns this
    /// prefix. The storage name does not participate, so every state field
    /// of one module yields the same address.
    pub fn module_address<A: From<[u8; 32]>>(&self) -> A {
        let mut hasher = Sha256::new();
        hasher.update(self.module_path.as_bytes());
        hasher.update(DOMAIN_SEPARATOR);
        hasher.update(self.module_name.as_bytes());
        hasher.update(DOMAIN_SEPARATOR);

        let hash: [u8; 32] = hasher.finalize().into();
        A::from(hash)
    }
}

impl From<Prefix> for vote_state::Prefix {
    fn from(prefix: Prefix) -> Self {
        let mut combined_prefix = Vec::with_capacity(
            prefix.module_path.len()
                + prefix.module_name.len()
                + prefix.storage_name.len()
                + 3 * DOMAIN_SEPARATOR.len(),
        );

        combined_prefix.extend(prefix.module_path.as_bytes());
        combined_prefix.extend(DOMAIN_SEPARATOR);
        combined_prefix.extend(prefix.module_name.as_bytes());
        combined_prefix.extend(DOMAIN_SEPARATOR);
        combined_prefix.extend(prefix.storage_name.as_bytes());
        combined_prefix.extend(DOMAIN_SEPARATOR);
        vote_state::Prefix::new(combined_prefix)
    }
}

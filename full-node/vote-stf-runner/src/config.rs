//! Genesis configuration loading.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;
use vote_ballot::BallotConfig;
use vote_modules_api::default_context::DefaultContext;
use vote_modules_api::Address;

/// Reads a TOML file into any deserializable configuration type.
pub fn from_toml_path<P: AsRef<Path>, R: DeserializeOwned>(path: P) -> anyhow::Result<R> {
    let mut contents = String::new();
    {
        let mut file = File::open(path)?;
        file.read_to_string(&mut contents)?;
    }

    let result: R = toml::from_str(&contents)?;

    Ok(result)
}

/// Genesis configuration for a ballot deployment.
///
/// Addresses appear in the file in their bech32 form, e.g.
/// `admin = "vote1..."`.
#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
pub struct GenesisConfig {
    /// The administrator identity.
    pub admin: Address,
}

impl From<GenesisConfig> for BallotConfig<DefaultContext> {
    fn from(config: GenesisConfig) -> Self {
        Self {
            admin: config.admin,
        }
    }
}

use core::fmt::{self, Debug, Display};
use core::str::FromStr;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::bech32::{AddressBech32, Bech32ParseError};

/// The bound set for caller identities usable with the module system.
pub trait AddressTrait:
    PartialEq
    + Debug
    + Clone
    + AsRef<[u8]>
    + for<'a> TryFrom<&'a [u8], Error = anyhow::Error>
    + Eq
    + Serialize
    + DeserializeOwned
    + From<[u8; 32]>
    + Send
    + Sync
    + Display
{
}

/// A 32-byte caller identity.
///
/// The module system treats this as an opaque, already-authenticated token.
/// Serde goes through the bech32 string form, so addresses appear as
/// `vote1...` strings in configuration files and query responses.
#[derive(
    PartialEq,
    Clone,
    Eq,
    Hash,
    borsh::BorshDeserialize,
    borsh::BorshSerialize,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Address {
    addr: [u8; 32],
}

impl AddressTrait for Address {}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.addr
    }
}

impl<'a> TryFrom<&'a [u8]> for Address {
    type Error = anyhow::Error;

    fn try_from(addr: &'a [u8]) -> Result<Self, Self::Error> {
        if addr.len() != 32 {
            anyhow::bail!("address must be 32 bytes long");
        }
        let mut addr_bytes = [0u8; 32];
        addr_bytes.copy_from_slice(addr);
        Ok(Self { addr: addr_bytes })
    }
}

impl From<[u8; 32]> for Address {
    fn from(addr: [u8; 32]) -> Self {
        Self { addr }
    }
}

impl TryFrom<String> for Address {
    type Error = Bech32ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}

impl FromStr for Address {
    type Err = Bech32ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bech32 = AddressBech32::from_str(s)?;
        Ok(Self {
            addr: bech32.to_byte_array(),
        })
    }
}

impl From<Address> for String {
    fn from(addr: Address) -> Self {
        AddressBech32::from(&addr).to_string()
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", AddressBech32::from(self))
    }
}

impl Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", hex::encode(self.addr))
    }
}

// Copyright (C) 2025 Stacks Open Internet Foundation
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::address::c32::{c32_address, c32_address_decode};
use crate::address::{
    Error as AddressError, C32_ADDRESS_VERSION_MAINNET_MULTISIG,
    C32_ADDRESS_VERSION_MAINNET_SINGLESIG, C32_ADDRESS_VERSION_TESTNET_MULTISIG,
    C32_ADDRESS_VERSION_TESTNET_SINGLESIG,
};
use crate::consts::{C32_MAX_VERSION, HASH160_LEN};
use crate::util::hash::Hash160;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// The network an address belongs to.
pub enum Network {
    /// The mainnet network
    Mainnet,
    /// The testnet network
    Testnet,
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mainnet => write!(f, "mainnet"),
            Self::Testnet => write!(f, "testnet"),
        }
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            other => Err(format!("unknown network '{other}'")),
        }
    }
}

impl Network {
    /// Single-signature address version for this network
    pub const fn to_address_version(&self) -> u8 {
        match self {
            Self::Mainnet => C32_ADDRESS_VERSION_MAINNET_SINGLESIG,
            Self::Testnet => C32_ADDRESS_VERSION_TESTNET_SINGLESIG,
        }
    }

    /// Multi-signature address version for this network
    pub const fn to_multisig_address_version(&self) -> u8 {
        match self {
            Self::Mainnet => C32_ADDRESS_VERSION_MAINNET_MULTISIG,
            Self::Testnet => C32_ADDRESS_VERSION_TESTNET_MULTISIG,
        }
    }

    pub const fn is_mainnet(&self) -> bool {
        matches!(self, Self::Mainnet)
    }
}

/// A version byte plus the 20-byte hash it qualifies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StacksAddress {
    pub version: u8,
    pub bytes: Hash160,
}

impl PartialOrd for StacksAddress {
    fn partial_cmp(&self, other: &StacksAddress) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StacksAddress {
    fn cmp(&self, other: &StacksAddress) -> Ordering {
        match self.version.cmp(&other.version) {
            Ordering::Equal => self.bytes.cmp(&other.bytes),
            inequality => inequality,
        }
    }
}

impl StacksAddress {
    pub fn new(version: u8, hash: Hash160) -> Result<StacksAddress, AddressError> {
        if version > C32_MAX_VERSION {
            return Err(AddressError::InvalidVersion(version));
        }
        Ok(StacksAddress {
            version,
            bytes: hash,
        })
    }

    /// Address for a single public key: the hash is RIPEMD160(SHA256(pubkey))
    pub fn p2pkh(version: u8, pubkey: &[u8]) -> Result<StacksAddress, AddressError> {
        Self::new(version, Hash160::from_data(pubkey))
    }

    /// Single-signature address on `network` for an existing hash
    pub fn from_network(network: Network, hash: Hash160) -> StacksAddress {
        StacksAddress {
            version: network.to_address_version(),
            bytes: hash,
        }
    }

    pub fn is_mainnet(&self) -> bool {
        match self.version {
            C32_ADDRESS_VERSION_MAINNET_MULTISIG | C32_ADDRESS_VERSION_MAINNET_SINGLESIG => true,
            C32_ADDRESS_VERSION_TESTNET_MULTISIG | C32_ADDRESS_VERSION_TESTNET_SINGLESIG => false,
            _ => false,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes.as_bytes().to_vec()
    }

    /// Parse a c32check address. The payload must be exactly 20 bytes.
    pub fn from_string(s: &str) -> Result<StacksAddress, AddressError> {
        let (version, bytes) = c32_address_decode(s)?;
        let hash = Hash160::from_bytes(&bytes).ok_or_else(|| {
            AddressError::MalformedAddress(format!(
                "expected a {HASH160_LEN}-byte hash, got {} bytes",
                bytes.len()
            ))
        })?;
        Ok(StacksAddress {
            version,
            bytes: hash,
        })
    }
}

impl FromStr for StacksAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StacksAddress::from_string(s)
    }
}

impl fmt::Display for StacksAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // only reachable with a hand-built out-of-range version
        let encoded = c32_address(self.version, self.bytes.as_bytes()).map_err(|_| fmt::Error)?;
        write!(f, "{encoded}")
    }
}

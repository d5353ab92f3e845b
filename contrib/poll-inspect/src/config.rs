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

use std::fmt;
use std::fs;
use std::path::PathBuf;

use poll_clarity::types::serialization::SerializationLimits;
use poll_clarity::types::{MAX_TYPE_DEPTH, MAX_VALUE_SIZE};
use poll_common::types::Network;
use serde_derive::Deserialize;

#[derive(thiserror::Error, Debug, PartialEq)]
/// An error occurred parsing the provided configuration
pub enum ConfigError {
    /// Error occurred reading config file
    #[error("{0}")]
    InvalidConfig(String),
    /// An error occurred parsing the TOML data
    #[error("{0}")]
    ParseError(String),
    /// A field was malformed
    #[error("identifier={0}, value={1}")]
    BadField(String, String),
}

/// Validated inspector configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Network used for default address versions
    pub network: Network,
    /// Bounds applied while decoding and encoding values
    pub limits: SerializationLimits,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            network: Network::Mainnet,
            limits: SerializationLimits::DEFAULT,
        }
    }
}

/// The parsed but not yet validated config file
#[derive(Deserialize, Debug, Default)]
struct RawConfigFile {
    /// The network to use. One of "mainnet" or "testnet".
    pub network: Option<Network>,
    /// Maximum value nesting depth
    pub max_depth: Option<u8>,
    /// Maximum declared length of a sequence or tuple
    pub max_value_size: Option<u32>,
}

impl RawConfigFile {
    /// load the config from a string
    pub fn load_from_str(data: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(data).map_err(|e| ConfigError::ParseError(format!("{e:?}")))?;
        Ok(config)
    }
}

impl TryFrom<&PathBuf> for RawConfigFile {
    type Error = ConfigError;

    fn try_from(path: &PathBuf) -> Result<Self, Self::Error> {
        Self::load_from_str(&fs::read_to_string(path).map_err(|e| {
            ConfigError::InvalidConfig(format!("failed to read config file: {e:?}"))
        })?)
    }
}

impl TryFrom<RawConfigFile> for Config {
    type Error = ConfigError;

    /// Attempt to decode the raw config file's primitive types into our types.
    fn try_from(raw_data: RawConfigFile) -> Result<Self, Self::Error> {
        let defaults = Config::default();

        let max_depth = raw_data.max_depth.unwrap_or(defaults.limits.max_depth);
        if max_depth == 0 || max_depth > MAX_TYPE_DEPTH {
            return Err(ConfigError::BadField(
                "max_depth".to_string(),
                max_depth.to_string(),
            ));
        }

        let max_value_size = raw_data
            .max_value_size
            .unwrap_or(defaults.limits.max_value_size);
        if max_value_size == 0 || max_value_size > MAX_VALUE_SIZE {
            return Err(ConfigError::BadField(
                "max_value_size".to_string(),
                max_value_size.to_string(),
            ));
        }

        Ok(Config {
            network: raw_data.network.unwrap_or(defaults.network),
            limits: SerializationLimits::new(max_depth, max_value_size),
        })
    }
}

impl TryFrom<&PathBuf> for Config {
    type Error = ConfigError;
    fn try_from(path: &PathBuf) -> Result<Self, ConfigError> {
        let config_file = RawConfigFile::try_from(path)?;
        Self::try_from(config_file)
    }
}

impl Config {
    /// load the config from a string and parse it
    pub fn load_from_str(data: &str) -> Result<Self, ConfigError> {
        RawConfigFile::load_from_str(data)?.try_into()
    }

    /// load the config from a file and parse it
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        Self::try_from(&PathBuf::from(path))
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Network: {}", self.network)?;
        writeln!(
            f,
            "Default address version: {}",
            self.network.to_address_version()
        )?;
        writeln!(f, "Max depth: {}", self.limits.max_depth)?;
        write!(f, "Max value size: {}", self.limits.max_value_size)
    }
}

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
use std::path::PathBuf;

use clap::Parser;
use poll_common::util::hash::Hash160;

#[derive(Parser, Debug)]
#[command(author, version, about)]
/// Encode and decode c32 addresses and Clarity wire values
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,
    /// Subcommand action to take
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands for the inspector binary
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Encode a 20-byte hash as a c32check address
    EncodeAddress(EncodeAddressArgs),
    /// Decode a c32check address into its version and hash
    DecodeAddress(DecodeAddressArgs),
    /// Decode one hex-encoded Clarity value
    DecodeValue(DecodeValueArgs),
    /// Decode a hex-encoded function argument list
    DecodeArgs(DecodeArgsArgs),
    /// Serialize a standard or contract principal
    EncodePrincipal(EncodePrincipalArgs),
    /// Serialize a contract-call payload
    EncodeCall(EncodeCallArgs),
    /// Check a configuration file and output config information
    CheckConfig,
}

/// Arguments for the encode-address command
#[derive(Parser, Debug, Clone)]
pub struct EncodeAddressArgs {
    /// Address version (0-31). Defaults to the configured network's version.
    #[arg(long)]
    pub version: Option<u8>,
    /// Use the network's multi-sig version instead of single-sig
    #[arg(long, conflicts_with = "version")]
    pub multisig: bool,
    /// The hash160 to encode, as 40 hex characters
    #[arg(value_parser = parse_hash160)]
    pub hash: Hash160,
}

/// Arguments for the decode-address command
#[derive(Parser, Debug, Clone)]
pub struct DecodeAddressArgs {
    /// The c32check address
    pub address: String,
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the decode-value command
#[derive(Parser, Debug, Clone)]
pub struct DecodeValueArgs {
    /// The serialized value, optionally prefixed with 0x
    pub hex: String,
    /// Print as JSON instead of Clarity syntax
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the decode-args command
#[derive(Parser, Debug, Clone)]
pub struct DecodeArgsArgs {
    /// The serialized argument list, optionally prefixed with 0x
    pub hex: String,
}

/// Arguments for the encode-principal command
#[derive(Parser, Debug, Clone)]
pub struct EncodePrincipalArgs {
    /// `ADDRESS` or `ADDRESS.contract-name`
    pub principal: String,
}

/// Arguments for the encode-call command
#[derive(Parser, Debug, Clone)]
pub struct EncodeCallArgs {
    /// The contract to call, in the format "STACKS_ADDRESS.CONTRACT_NAME"
    pub contract_id: String,
    /// The public function to call
    pub function: String,
    /// Each argument as a hex-encoded Clarity value
    pub args: Vec<String>,
}

/// Parse a hash160 from a hex string
fn parse_hash160(hash: &str) -> Result<Hash160, String> {
    let hash = hash.strip_prefix("0x").unwrap_or(hash);
    Hash160::from_hex(hash).map_err(|e| format!("Invalid hash160: {e}"))
}

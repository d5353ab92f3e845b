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

use poll_clarity::contract_call::{ContractCall, FunctionArgs};
use poll_clarity::errors::ClarityTypeError;
use poll_clarity::types::serialization::SerializationError;
use poll_clarity::types::{PrincipalData, Value};
use poll_common::address::Error as AddressError;
use poll_common::types::StacksAddress;

use crate::cli::{
    Command, DecodeAddressArgs, DecodeArgsArgs, DecodeValueArgs, EncodeAddressArgs,
    EncodeCallArgs, EncodePrincipalArgs,
};
use crate::config::Config;

#[derive(thiserror::Error, Debug)]
/// A command failed on its input
pub enum CommandError {
    #[error("Invalid address: {0}")]
    Address(#[from] AddressError),
    #[error("{0}")]
    Serialization(#[from] SerializationError),
    #[error("Invalid value: {0}")]
    ClarityType(#[from] ClarityTypeError),
    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Argument {0}: {1}")]
    BadArgument(usize, SerializationError),
}

/// Run one subcommand and return what it prints
pub fn run(command: &Command, config: &Config) -> Result<String, CommandError> {
    match command {
        Command::EncodeAddress(args) => encode_address(args, config),
        Command::DecodeAddress(args) => decode_address(args),
        Command::DecodeValue(args) => decode_value(args, config),
        Command::DecodeArgs(args) => decode_args(args, config),
        Command::EncodePrincipal(args) => encode_principal(args),
        Command::EncodeCall(args) => encode_call(args, config),
        Command::CheckConfig => Ok(config.to_string()),
    }
}

fn encode_address(args: &EncodeAddressArgs, config: &Config) -> Result<String, CommandError> {
    let version = match args.version {
        Some(version) => version,
        None if args.multisig => config.network.to_multisig_address_version(),
        None => config.network.to_address_version(),
    };
    let address = StacksAddress::new(version, args.hash)?;
    Ok(address.to_string())
}

fn decode_address(args: &DecodeAddressArgs) -> Result<String, CommandError> {
    let address = StacksAddress::from_string(&args.address)?;
    if args.json {
        let output = serde_json::json!({
            "version": address.version,
            "hash": address.bytes.to_hex(),
            "mainnet": address.is_mainnet(),
        });
        Ok(output.to_string())
    } else {
        Ok(format!(
            "version: {}\nhash: {}",
            address.version,
            address.bytes.to_hex()
        ))
    }
}

fn decode_value(args: &DecodeValueArgs, config: &Config) -> Result<String, CommandError> {
    let value = Value::try_deserialize_hex_with_limits(&args.hex, &config.limits)?;
    debug!("Decoded value"; "depth" => value.depth(), "size" => value.serialized_size());
    if args.json {
        Ok(serde_json::to_string(&value)?)
    } else {
        Ok(value.to_string())
    }
}

fn decode_args(args: &DecodeArgsArgs, config: &Config) -> Result<String, CommandError> {
    let function_args = FunctionArgs::try_deserialize_hex_with_limits(&args.hex, &config.limits)?;
    let mut lines = Vec::with_capacity(function_args.len());
    for (i, arg) in function_args.iter().enumerate() {
        let hex = arg
            .serialize_to_hex()
            .map_err(|e| CommandError::BadArgument(i, e))?;
        lines.push(format!("{i}: {arg} 0x{hex}"));
    }
    Ok(lines.join("\n"))
}

fn encode_principal(args: &EncodePrincipalArgs) -> Result<String, CommandError> {
    let principal = PrincipalData::parse(&args.principal)?;
    Ok(Value::from(principal).serialize_to_hex()?)
}

fn encode_call(args: &EncodeCallArgs, config: &Config) -> Result<String, CommandError> {
    let mut values = Vec::with_capacity(args.args.len());
    for (i, arg) in args.args.iter().enumerate() {
        let value = Value::try_deserialize_hex_with_limits(arg, &config.limits)
            .map_err(|e| CommandError::BadArgument(i, e))?;
        values.push(value);
    }
    let call = ContractCall::new(&args.contract_id, &args.function, values)?;
    info!("Encoded contract call"; "call" => %call);
    Ok(call.serialize_to_hex()?)
}

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

//! Function-call argument lists and the contract-call payload that carries them.

use std::fmt;
use std::io::{Read, Write};

use poll_common::types::StacksAddress;
use poll_common::util::hash::to_hex;

use crate::codec::{Error as codec_error, StacksMessageCodec};
use crate::errors::ClarityTypeError;
use crate::representations::{ClarityName, ContractName};
use crate::types::serialization::{
    decode_hex, ClarityValueSerializable, SerializationError, SerializationLimits,
};
use crate::types::{QualifiedContractIdentifier, StandardPrincipalData, Value};

/// Arguments of a public function call: a u32 big-endian count followed by
/// each serialized value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FunctionArgs(pub Vec<Value>);

impl FunctionArgs {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<Value> {
        self.0
    }

    pub fn serialize_write<W: Write>(&self, w: &mut W) -> Result<(), SerializationError> {
        self.serialize_write_with_limits(w, &SerializationLimits::DEFAULT)
    }

    pub fn serialize_write_with_limits<W: Write>(
        &self,
        w: &mut W,
        limits: &SerializationLimits,
    ) -> Result<(), SerializationError> {
        let bytes = self.serialize_to_vec_with_limits(limits)?;
        w.write_all(&bytes)?;
        Ok(())
    }

    pub fn serialize_to_vec(&self) -> Result<Vec<u8>, SerializationError> {
        self.serialize_to_vec_with_limits(&SerializationLimits::DEFAULT)
    }

    /// A u32 count followed by each argument's encoding
    pub fn serialize_to_vec_with_limits(
        &self,
        limits: &SerializationLimits,
    ) -> Result<Vec<u8>, SerializationError> {
        let len = u32::try_from(self.0.len()).map_err(|_| SerializationError::ValueTooLarge)?;
        let mut bytes = len.to_be_bytes().to_vec();
        for arg in self.0.iter() {
            bytes.extend_from_slice(&arg.serialize_to_vec_with_limits(limits)?);
        }
        Ok(bytes)
    }

    pub fn serialize_to_hex(&self) -> Result<String, SerializationError> {
        Ok(to_hex(&self.serialize_to_vec()?))
    }

    pub fn deserialize_read<R: Read>(r: &mut R) -> Result<FunctionArgs, SerializationError> {
        FunctionArgs::deserialize_read_with_limits(r, &SerializationLimits::DEFAULT)
    }

    pub fn deserialize_read_with_limits<R: Read>(
        r: &mut R,
        limits: &SerializationLimits,
    ) -> Result<FunctionArgs, SerializationError> {
        let mut count = [0; 4];
        r.read_exact(&mut count)?;
        let count = u32::from_be_bytes(count);
        // every argument takes at least one byte
        if count > limits.max_value_size {
            debug!("Rejected function arguments"; "count" => count);
            return Err(SerializationError::ValueTooLarge);
        }

        let mut args = Vec::with_capacity((count as usize).min(256));
        for _i in 0..count {
            args.push(Value::deserialize_read_with_limits(r, limits)?);
        }
        Ok(FunctionArgs(args))
    }

    /// Decode exactly one argument list from `bytes`
    pub fn deserialize(bytes: &[u8]) -> Result<FunctionArgs, SerializationError> {
        FunctionArgs::deserialize_with_limits(bytes, &SerializationLimits::DEFAULT)
    }

    pub fn deserialize_with_limits(
        bytes: &[u8],
        limits: &SerializationLimits,
    ) -> Result<FunctionArgs, SerializationError> {
        let mut remaining = bytes;
        let args = FunctionArgs::deserialize_read_with_limits(&mut remaining, limits)?;
        if !remaining.is_empty() {
            return Err(SerializationError::TrailingData(remaining.len()));
        }
        Ok(args)
    }

    pub fn try_deserialize_hex(hex: &str) -> Result<FunctionArgs, SerializationError> {
        FunctionArgs::try_deserialize_hex_with_limits(hex, &SerializationLimits::DEFAULT)
    }

    pub fn try_deserialize_hex_with_limits(
        hex: &str,
        limits: &SerializationLimits,
    ) -> Result<FunctionArgs, SerializationError> {
        FunctionArgs::deserialize_with_limits(&decode_hex(hex)?, limits)
    }
}

impl From<Vec<Value>> for FunctionArgs {
    fn from(args: Vec<Value>) -> Self {
        FunctionArgs(args)
    }
}

impl fmt::Display for FunctionArgs {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for arg in self.0.iter() {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{arg}")?;
            first = false;
        }
        Ok(())
    }
}

/// A call of a public function on a deployed contract, laid out as a
/// transaction payload embeds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractCall {
    pub contract_address: StacksAddress,
    pub contract_name: ContractName,
    pub function_name: ClarityName,
    pub function_args: FunctionArgs,
}

impl ContractCall {
    /// Build a call from `ADDRESS.contract-name`, a function name and its arguments
    pub fn new(
        contract_id: &str,
        function: &str,
        args: Vec<Value>,
    ) -> Result<ContractCall, ClarityTypeError> {
        let contract = QualifiedContractIdentifier::parse(contract_id)?;
        let function_name = ClarityName::try_from(function)?;
        Ok(ContractCall {
            contract_address: StacksAddress::from(contract.issuer),
            contract_name: contract.name,
            function_name,
            function_args: FunctionArgs(args),
        })
    }

    pub fn to_clarity_contract_id(&self) -> Result<QualifiedContractIdentifier, ClarityTypeError> {
        let issuer = StandardPrincipalData::try_from(self.contract_address)?;
        Ok(QualifiedContractIdentifier::new(
            issuer,
            self.contract_name.clone(),
        ))
    }

    pub fn serialize_write<W: Write>(&self, w: &mut W) -> Result<(), SerializationError> {
        self.serialize_write_with_limits(w, &SerializationLimits::DEFAULT)
    }

    pub fn serialize_write_with_limits<W: Write>(
        &self,
        w: &mut W,
        limits: &SerializationLimits,
    ) -> Result<(), SerializationError> {
        let bytes = self.serialize_to_vec_with_limits(limits)?;
        w.write_all(&bytes)?;
        Ok(())
    }

    pub fn serialize_to_vec(&self) -> Result<Vec<u8>, SerializationError> {
        self.serialize_to_vec_with_limits(&SerializationLimits::DEFAULT)
    }

    pub fn serialize_to_vec_with_limits(
        &self,
        limits: &SerializationLimits,
    ) -> Result<Vec<u8>, SerializationError> {
        let mut bytes = vec![];
        self.to_clarity_contract_id()?.issuer.serialize_write(&mut bytes)?;
        self.contract_name.serialize_write(&mut bytes)?;
        self.function_name.serialize_write(&mut bytes)?;
        bytes.extend_from_slice(&self.function_args.serialize_to_vec_with_limits(limits)?);
        Ok(bytes)
    }

    pub fn serialize_to_hex(&self) -> Result<String, SerializationError> {
        Ok(to_hex(&self.serialize_to_vec()?))
    }

    pub fn deserialize_read<R: Read>(r: &mut R) -> Result<ContractCall, SerializationError> {
        ContractCall::deserialize_read_with_limits(r, &SerializationLimits::DEFAULT)
    }

    pub fn deserialize_read_with_limits<R: Read>(
        r: &mut R,
        limits: &SerializationLimits,
    ) -> Result<ContractCall, SerializationError> {
        let issuer = StandardPrincipalData::deserialize_read(r)?;
        let contract_name = ContractName::deserialize_read(r)?;
        let function_name = ClarityName::deserialize_read(r)?;
        let function_args = FunctionArgs::deserialize_read_with_limits(r, limits)?;
        Ok(ContractCall {
            contract_address: StacksAddress::from(issuer),
            contract_name,
            function_name,
            function_args,
        })
    }

    /// Decode exactly one contract call from `bytes`
    pub fn deserialize(bytes: &[u8]) -> Result<ContractCall, SerializationError> {
        let mut remaining = bytes;
        let call = ContractCall::deserialize_read(&mut remaining)?;
        if !remaining.is_empty() {
            return Err(SerializationError::TrailingData(remaining.len()));
        }
        Ok(call)
    }

    pub fn try_deserialize_hex(hex: &str) -> Result<ContractCall, SerializationError> {
        ContractCall::deserialize(&decode_hex(hex)?)
    }
}

impl fmt::Display for ContractCall {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "(contract-call? '{}.{} {}",
            self.contract_address, self.contract_name, self.function_name
        )?;
        if !self.function_args.is_empty() {
            write!(f, " {}", self.function_args)?;
        }
        write!(f, ")")
    }
}

fn to_codec_read_error(e: SerializationError) -> codec_error {
    match e {
        SerializationError::IOError(e) => codec_error::ReadError(e.err),
        e => codec_error::DeserializeError(e.to_string()),
    }
}

impl StacksMessageCodec for FunctionArgs {
    fn consensus_serialize<W: Write>(&self, fd: &mut W) -> Result<(), codec_error> {
        self.serialize_write(fd).map_err(codec_error::from)
    }

    fn consensus_deserialize<R: Read>(fd: &mut R) -> Result<FunctionArgs, codec_error> {
        FunctionArgs::deserialize_read(fd).map_err(to_codec_read_error)
    }
}

impl StacksMessageCodec for ContractCall {
    fn consensus_serialize<W: Write>(&self, fd: &mut W) -> Result<(), codec_error> {
        self.serialize_write(fd).map_err(codec_error::from)
    }

    fn consensus_deserialize<R: Read>(fd: &mut R) -> Result<ContractCall, codec_error> {
        ContractCall::deserialize_read(fd).map_err(to_codec_read_error)
    }
}

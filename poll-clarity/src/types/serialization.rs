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

use std::collections::HashSet;
use std::io::{Read, Write};
use std::{cmp, error, fmt, io};

use poll_common::util::hash::{hex_bytes, to_hex};

use crate::codec::{Error as codec_error, StacksMessageCodec};
use crate::errors::{ClarityTypeError, IncomparableError};
use crate::representations::{ClarityName, ContractName};
use crate::types::{
    BuffData, CharType, ListData, OptionalData, PrincipalData, QualifiedContractIdentifier,
    ResponseData, SequenceData, StandardPrincipalData, TupleData, Value, MAX_VALUE_SIZE,
};

/// Default bound on value nesting while encoding or decoding
pub const DEFAULT_MAX_DEPTH: u8 = 16;

/// Upper bound on up-front allocation for a length-prefixed payload.
///  Larger payloads grow as bytes actually arrive.
const MAX_PREALLOC_BYTES: usize = 4096;
const MAX_PREALLOC_ITEMS: usize = 1024;

/// Errors that may occur in serialization or deserialization.
/// Running out of input is reported as `TruncatedInput`; any other IO error
///   from the supplied reader or writer manifests as `IOError`.
#[derive(Debug, PartialEq)]
pub enum SerializationError {
    /// The type prefix byte names no known variant
    UnsupportedVariant(u8),
    /// A length prefix exceeds the configured maximum value size
    ValueTooLarge,
    /// The input ended before the value was complete
    TruncatedInput,
    /// Bytes remained after a complete value was read
    TrailingData(usize),
    /// The value nests deeper than the configured maximum depth
    MaxDepthExceeded,
    /// The bytes describe a value that cannot be constructed
    BadTypeError(ClarityTypeError),
    IOError(IncomparableError<io::Error>),
    DeserializationError(String),
}

impl fmt::Display for SerializationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SerializationError::UnsupportedVariant(prefix) => {
                write!(f, "Deserialization error: unsupported type prefix {prefix:#04x}")
            }
            SerializationError::ValueTooLarge => {
                write!(f, "Value exceeds the maximum serialized size")
            }
            SerializationError::TruncatedInput => {
                write!(f, "Deserialization error: input ended before the value was complete")
            }
            SerializationError::TrailingData(remaining) => write!(
                f,
                "Deserialization error: {remaining} bytes left over in buffer"
            ),
            SerializationError::MaxDepthExceeded => {
                write!(f, "Value exceeds the maximum nesting depth")
            }
            SerializationError::BadTypeError(e) => {
                write!(f, "Deserialization error, bad type, caused by: {e}")
            }
            SerializationError::IOError(e) => {
                write!(f, "Serialization error caused by IO: {}", e.err)
            }
            SerializationError::DeserializationError(e) => {
                write!(f, "Deserialization error: {e}")
            }
        }
    }
}

impl error::Error for SerializationError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            SerializationError::IOError(e) => Some(&e.err),
            SerializationError::BadTypeError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for SerializationError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => SerializationError::TruncatedInput,
            _ => SerializationError::IOError(IncomparableError { err }),
        }
    }
}

impl From<ClarityTypeError> for SerializationError {
    fn from(e: ClarityTypeError) -> Self {
        match e {
            ClarityTypeError::ValueTooLarge => SerializationError::ValueTooLarge,
            ClarityTypeError::TypeSignatureTooDeep => SerializationError::MaxDepthExceeded,
            e => SerializationError::BadTypeError(e),
        }
    }
}

/// Bounds enforced while encoding and decoding values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializationLimits {
    /// Maximum nesting depth; an atom has depth 1
    pub max_depth: u8,
    /// Maximum declared length of a buffer, string, list or tuple
    pub max_value_size: u32,
}

impl SerializationLimits {
    pub const DEFAULT: SerializationLimits = SerializationLimits {
        max_depth: DEFAULT_MAX_DEPTH,
        max_value_size: MAX_VALUE_SIZE,
    };

    pub fn new(max_depth: u8, max_value_size: u32) -> SerializationLimits {
        SerializationLimits {
            max_depth,
            max_value_size,
        }
    }

    fn check_len(&self, len: usize) -> Result<u32, SerializationError> {
        match u32::try_from(len) {
            Ok(len) if len <= self.max_value_size => Ok(len),
            _ => Err(SerializationError::ValueTooLarge),
        }
    }
}

impl Default for SerializationLimits {
    fn default() -> Self {
        SerializationLimits::DEFAULT
    }
}

define_u8_enum!(TypePrefix {
    Int = 0,
    UInt = 1,
    Buffer = 2,
    BoolTrue = 3,
    BoolFalse = 4,
    PrincipalStandard = 5,
    PrincipalContract = 6,
    ResponseOk = 7,
    ResponseErr = 8,
    OptionalNone = 9,
    OptionalSome = 10,
    List = 11,
    Tuple = 12,
    StringASCII = 13,
    StringUTF8 = 14
});

impl From<&PrincipalData> for TypePrefix {
    fn from(v: &PrincipalData) -> TypePrefix {
        match v {
            PrincipalData::Standard(_) => TypePrefix::PrincipalStandard,
            PrincipalData::Contract(_) => TypePrefix::PrincipalContract,
        }
    }
}

impl From<&Value> for TypePrefix {
    fn from(v: &Value) -> TypePrefix {
        use super::SequenceData::*;
        use super::Value::*;

        match v {
            Int(_) => TypePrefix::Int,
            UInt(_) => TypePrefix::UInt,
            Bool(value) => {
                if *value {
                    TypePrefix::BoolTrue
                } else {
                    TypePrefix::BoolFalse
                }
            }
            Principal(p) => TypePrefix::from(p),
            Response(response) => {
                if response.committed {
                    TypePrefix::ResponseOk
                } else {
                    TypePrefix::ResponseErr
                }
            }
            Optional(OptionalData { data: None }) => TypePrefix::OptionalNone,
            Optional(OptionalData { data: Some(_) }) => TypePrefix::OptionalSome,
            Tuple(_) => TypePrefix::Tuple,
            Sequence(Buffer(_)) => TypePrefix::Buffer,
            Sequence(List(_)) => TypePrefix::List,
            Sequence(String(CharType::ASCII(_))) => TypePrefix::StringASCII,
            Sequence(String(CharType::UTF8(_))) => TypePrefix::StringUTF8,
        }
    }
}

/// Not a public trait,
///   this is just used to simplify serializing the pieces that
///   principals and contract calls share.
pub(crate) trait ClarityValueSerializable<T: std::marker::Sized> {
    fn serialize_write<W: Write>(&self, w: &mut W) -> io::Result<()>;
    fn deserialize_read<R: Read>(r: &mut R) -> Result<T, SerializationError>;
}

impl ClarityValueSerializable<StandardPrincipalData> for StandardPrincipalData {
    fn serialize_write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&[self.version()])?;
        w.write_all(&self.1)
    }

    fn deserialize_read<R: Read>(r: &mut R) -> Result<Self, SerializationError> {
        let mut version = [0; 1];
        let mut data = [0; 20];
        r.read_exact(&mut version)?;
        r.read_exact(&mut data)?;
        Ok(StandardPrincipalData::new(version[0], data)?)
    }
}

macro_rules! serialize_guarded_string {
    ($Name:ident, $ErrorVariant:ident) => {
        impl ClarityValueSerializable<$Name> for $Name {
            fn serialize_write<W: Write>(&self, w: &mut W) -> io::Result<()> {
                w.write_all(&self.len().to_be_bytes())?;
                // guarded strings are ASCII, so len() counts bytes
                w.write_all(self.as_str().as_bytes())
            }

            fn deserialize_read<R: Read>(r: &mut R) -> Result<Self, SerializationError> {
                let mut len = [0; 1];
                r.read_exact(&mut len)?;
                let data = read_bytes(r, u32::from(len[0]))?;

                let name = String::from_utf8(data).map_err(|e| {
                    ClarityTypeError::$ErrorVariant(
                        String::from_utf8_lossy(e.as_bytes()).into_owned(),
                    )
                })?;
                Ok($Name::try_from(name)?)
            }
        }
    };
}

serialize_guarded_string!(ClarityName, InvalidClarityName);
serialize_guarded_string!(ContractName, InvalidContractName);

/// Read exactly `len` bytes, allocating only as bytes arrive.
fn read_bytes<R: Read>(r: &mut R, len: u32) -> Result<Vec<u8>, SerializationError> {
    let mut data = Vec::with_capacity(cmp::min(len as usize, MAX_PREALLOC_BYTES));
    r.take(u64::from(len)).read_to_end(&mut data)?;
    if data.len() != len as usize {
        return Err(SerializationError::TruncatedInput);
    }
    Ok(data)
}

/// Read a u32 length prefix and check it against the limits
fn read_len<R: Read>(r: &mut R, limits: &SerializationLimits) -> Result<u32, SerializationError> {
    let mut len = [0; 4];
    r.read_exact(&mut len)?;
    let len = u32::from_be_bytes(len);
    if len > limits.max_value_size {
        return Err(SerializationError::ValueTooLarge);
    }
    Ok(len)
}

/// Reader adapter that counts the bytes consumed
struct ReadCounter<'a, R: Read> {
    inner: &'a mut R,
    count: u64,
}

impl<R: Read> Read for ReadCounter<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let nr = self.inner.read(buf)?;
        self.count += nr as u64;
        Ok(nr)
    }
}

impl PrincipalData {
    fn inner_consensus_serialize<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&[TypePrefix::from(self) as u8])?;
        match self {
            PrincipalData::Standard(p) => p.serialize_write(w),
            PrincipalData::Contract(contract_identifier) => {
                contract_identifier.issuer.serialize_write(w)?;
                contract_identifier.name.serialize_write(w)
            }
        }
    }

    fn inner_consensus_deserialize<R: Read>(
        r: &mut R,
    ) -> Result<PrincipalData, SerializationError> {
        let mut header = [0];
        r.read_exact(&mut header)?;

        let prefix = TypePrefix::from_u8(header[0])
            .ok_or(SerializationError::UnsupportedVariant(header[0]))?;

        match prefix {
            TypePrefix::PrincipalStandard => {
                StandardPrincipalData::deserialize_read(r).map(PrincipalData::from)
            }
            TypePrefix::PrincipalContract => {
                let issuer = StandardPrincipalData::deserialize_read(r)?;
                let name = ContractName::deserialize_read(r)?;
                Ok(PrincipalData::from(QualifiedContractIdentifier {
                    issuer,
                    name,
                }))
            }
            _ => Err(SerializationError::UnsupportedVariant(header[0])),
        }
    }
}

impl Value {
    fn inner_deserialize_read<R: Read>(
        r: &mut R,
        limits: &SerializationLimits,
        depth: u8,
    ) -> Result<Value, SerializationError> {
        use super::PrincipalData::*;
        use super::Value::*;

        if depth >= limits.max_depth {
            return Err(SerializationError::MaxDepthExceeded);
        }

        let mut header = [0];
        r.read_exact(&mut header)?;

        let prefix = TypePrefix::from_u8(header[0])
            .ok_or(SerializationError::UnsupportedVariant(header[0]))?;

        match prefix {
            TypePrefix::Int => {
                let mut buffer = [0; 16];
                r.read_exact(&mut buffer)?;
                Ok(Int(i128::from_be_bytes(buffer)))
            }
            TypePrefix::UInt => {
                let mut buffer = [0; 16];
                r.read_exact(&mut buffer)?;
                Ok(UInt(u128::from_be_bytes(buffer)))
            }
            TypePrefix::Buffer => {
                let len = read_len(r, limits)?;
                let data = read_bytes(r, len)?;
                Ok(Sequence(SequenceData::Buffer(BuffData { data })))
            }
            TypePrefix::BoolTrue => Ok(Bool(true)),
            TypePrefix::BoolFalse => Ok(Bool(false)),
            TypePrefix::PrincipalStandard => {
                StandardPrincipalData::deserialize_read(r).map(Value::from)
            }
            TypePrefix::PrincipalContract => {
                let issuer = StandardPrincipalData::deserialize_read(r)?;
                let name = ContractName::deserialize_read(r)?;
                Ok(Principal(Contract(QualifiedContractIdentifier {
                    issuer,
                    name,
                })))
            }
            TypePrefix::ResponseOk | TypePrefix::ResponseErr => {
                let committed = prefix == TypePrefix::ResponseOk;
                let data = Value::inner_deserialize_read(r, limits, depth + 1)?;
                Ok(Response(ResponseData {
                    committed,
                    data: Box::new(data),
                }))
            }
            TypePrefix::OptionalNone => Ok(Value::none()),
            TypePrefix::OptionalSome => {
                let data = Value::inner_deserialize_read(r, limits, depth + 1)?;
                Ok(Optional(OptionalData {
                    data: Some(Box::new(data)),
                }))
            }
            TypePrefix::List => {
                let len = read_len(r, limits)?;
                let mut items = Vec::with_capacity(cmp::min(len as usize, MAX_PREALLOC_ITEMS));
                for _i in 0..len {
                    items.push(Value::inner_deserialize_read(r, limits, depth + 1)?);
                }
                Ok(Sequence(SequenceData::List(ListData { data: items })))
            }
            TypePrefix::Tuple => {
                let len = read_len(r, limits)?;
                if len == 0 {
                    return Err(ClarityTypeError::EmptyTuplesNotAllowed.into());
                }
                let capacity = cmp::min(len as usize, MAX_PREALLOC_ITEMS);
                let mut items = Vec::with_capacity(capacity);
                let mut seen = HashSet::with_capacity(capacity);
                for _i in 0..len {
                    let key = ClarityName::deserialize_read(r)?;
                    if !seen.insert(key.clone()) {
                        return Err(ClarityTypeError::DuplicateTupleField(key.into()).into());
                    }
                    let value = Value::inner_deserialize_read(r, limits, depth + 1)?;
                    items.push((key, value));
                }
                Ok(Tuple(TupleData { data: items }))
            }
            TypePrefix::StringASCII => {
                let len = read_len(r, limits)?;
                let data = read_bytes(r, len)?;
                Ok(Value::string_ascii_from_bytes(data)?)
            }
            TypePrefix::StringUTF8 => {
                let len = read_len(r, limits)?;
                let data = read_bytes(r, len)?;
                Ok(Value::string_utf8_from_bytes(data)?)
            }
        }
    }

    fn inner_serialize_write<W: Write>(
        &self,
        w: &mut W,
        limits: &SerializationLimits,
        depth: u8,
    ) -> Result<(), SerializationError> {
        use super::CharType::*;
        use super::SequenceData::{self, *};
        use super::Value::*;

        if depth >= limits.max_depth {
            return Err(SerializationError::MaxDepthExceeded);
        }

        w.write_all(&[TypePrefix::from(self) as u8])?;
        match self {
            Int(value) => w.write_all(&value.to_be_bytes())?,
            UInt(value) => w.write_all(&value.to_be_bytes())?,
            Principal(data) => match data {
                PrincipalData::Standard(p) => p.serialize_write(w)?,
                PrincipalData::Contract(contract_identifier) => {
                    contract_identifier.issuer.serialize_write(w)?;
                    contract_identifier.name.serialize_write(w)?;
                }
            },
            Response(response) => response.data.inner_serialize_write(w, limits, depth + 1)?,
            // Bool types don't need any more data.
            Bool(_) => {}
            // None types don't need any more data.
            Optional(OptionalData { data: None }) => {}
            Optional(OptionalData { data: Some(value) }) => {
                value.inner_serialize_write(w, limits, depth + 1)?;
            }
            Sequence(List(data)) => {
                let len = limits.check_len(data.data.len())?;
                w.write_all(&len.to_be_bytes())?;
                for item in data.data.iter() {
                    item.inner_serialize_write(w, limits, depth + 1)?;
                }
            }
            Sequence(Buffer(value)) => {
                let len = limits.check_len(value.len())?;
                w.write_all(&len.to_be_bytes())?;
                w.write_all(value.as_slice())?
            }
            Sequence(SequenceData::String(UTF8(value))) => {
                let len = limits.check_len(value.byte_len())?;
                w.write_all(&len.to_be_bytes())?;
                for bytes in value.data.iter() {
                    w.write_all(bytes)?
                }
            }
            Sequence(SequenceData::String(ASCII(value))) => {
                let len = limits.check_len(value.data.len())?;
                w.write_all(&len.to_be_bytes())?;
                w.write_all(&value.data)?
            }
            Tuple(data) => {
                let len = limits.check_len(data.data.len())?;
                w.write_all(&len.to_be_bytes())?;
                for (key, value) in data.sorted_fields() {
                    key.serialize_write(w)?;
                    value.inner_serialize_write(w, limits, depth + 1)?;
                }
            }
        };

        Ok(())
    }

    pub fn serialize_write<W: Write>(&self, w: &mut W) -> Result<(), SerializationError> {
        self.serialize_write_with_limits(w, &SerializationLimits::DEFAULT)
    }

    /// The value is encoded in full before anything reaches `w`, so a
    ///  limit violation leaves the writer untouched.
    pub fn serialize_write_with_limits<W: Write>(
        &self,
        w: &mut W,
        limits: &SerializationLimits,
    ) -> Result<(), SerializationError> {
        let byte_serialization = self.serialize_to_vec_with_limits(limits)?;
        w.write_all(&byte_serialization)?;
        Ok(())
    }

    /// Serialize into a new buffer. Writing to a `Vec` cannot fail, so errors
    ///  come only from the depth and size limits.
    pub fn serialize_to_vec(&self) -> Result<Vec<u8>, SerializationError> {
        self.serialize_to_vec_with_limits(&SerializationLimits::DEFAULT)
    }

    pub fn serialize_to_vec_with_limits(
        &self,
        limits: &SerializationLimits,
    ) -> Result<Vec<u8>, SerializationError> {
        let mut byte_serialization = Vec::new();
        self.inner_serialize_write(&mut byte_serialization, limits, 0)?;
        Ok(byte_serialization)
    }

    /// Lowercase hex of the consensus serialization, without a `0x` prefix
    pub fn serialize_to_hex(&self) -> Result<String, SerializationError> {
        let byte_serialization = self.serialize_to_vec()?;
        Ok(to_hex(byte_serialization.as_slice()))
    }

    /// Decode exactly one value from `bytes`. Leftover bytes are an error.
    pub fn deserialize(bytes: &[u8]) -> Result<Value, SerializationError> {
        Value::deserialize_with_limits(bytes, &SerializationLimits::DEFAULT)
    }

    pub fn deserialize_with_limits(
        bytes: &[u8],
        limits: &SerializationLimits,
    ) -> Result<Value, SerializationError> {
        let mut remaining = bytes;
        let value = Value::deserialize_read_with_limits(&mut remaining, limits)?;
        if !remaining.is_empty() {
            debug!("Rejected Clarity value with trailing bytes"; "remaining" => remaining.len());
            return Err(SerializationError::TrailingData(remaining.len()));
        }
        Ok(value)
    }

    /// Read one value from the stream, leaving any further bytes unread
    pub fn deserialize_read<R: Read>(r: &mut R) -> Result<Value, SerializationError> {
        Value::deserialize_read_with_limits(r, &SerializationLimits::DEFAULT)
    }

    pub fn deserialize_read_with_limits<R: Read>(
        r: &mut R,
        limits: &SerializationLimits,
    ) -> Result<Value, SerializationError> {
        Value::deserialize_read_count_with_limits(r, limits).map(|(value, _)| value)
    }

    /// Deserialize just like `deserialize_read` but also
    ///  return the bytes read
    pub fn deserialize_read_count<R: Read>(r: &mut R) -> Result<(Value, u64), SerializationError> {
        Value::deserialize_read_count_with_limits(r, &SerializationLimits::DEFAULT)
    }

    pub fn deserialize_read_count_with_limits<R: Read>(
        r: &mut R,
        limits: &SerializationLimits,
    ) -> Result<(Value, u64), SerializationError> {
        let mut counter = ReadCounter { inner: r, count: 0 };
        match Value::inner_deserialize_read(&mut counter, limits, 0) {
            Ok(value) => Ok((value, counter.count)),
            Err(e) => {
                debug!("Rejected Clarity value"; "err" => %e, "bytes_read" => counter.count);
                Err(e)
            }
        }
    }

    /// Decode one value from hex, with or without a leading `0x`
    pub fn try_deserialize_hex(hex: &str) -> Result<Value, SerializationError> {
        Value::try_deserialize_hex_with_limits(hex, &SerializationLimits::DEFAULT)
    }

    pub fn try_deserialize_hex_with_limits(
        hex: &str,
        limits: &SerializationLimits,
    ) -> Result<Value, SerializationError> {
        let data = decode_hex(hex)?;
        Value::deserialize_with_limits(&data, limits)
    }
}

/// Hex decoding shared by the value and argument-list helpers
pub(crate) fn decode_hex(hex: &str) -> Result<Vec<u8>, SerializationError> {
    let hex = hex.strip_prefix("0x").unwrap_or(hex);
    hex_bytes(hex)
        .map_err(|e| SerializationError::DeserializationError(format!("Bad hex string: {e}")))
}

impl From<SerializationError> for codec_error {
    fn from(e: SerializationError) -> Self {
        match e {
            SerializationError::IOError(e) => codec_error::WriteError(e.err),
            e => codec_error::SerializeError(e.to_string()),
        }
    }
}

impl StacksMessageCodec for Value {
    fn consensus_serialize<W: Write>(&self, fd: &mut W) -> Result<(), codec_error> {
        self.serialize_write(fd).map_err(codec_error::from)
    }

    fn consensus_deserialize<R: Read>(fd: &mut R) -> Result<Value, codec_error> {
        Value::deserialize_read(fd).map_err(|e| match e {
            SerializationError::IOError(e) => codec_error::ReadError(e.err),
            e => codec_error::DeserializeError(e.to_string()),
        })
    }
}

impl StacksMessageCodec for PrincipalData {
    fn consensus_serialize<W: Write>(&self, fd: &mut W) -> Result<(), codec_error> {
        self.inner_consensus_serialize(fd)
            .map_err(codec_error::WriteError)
    }

    fn consensus_deserialize<R: Read>(fd: &mut R) -> Result<PrincipalData, codec_error> {
        PrincipalData::inner_consensus_deserialize(fd)
            .map_err(|e| codec_error::DeserializeError(e.to_string()))
    }
}

macro_rules! impl_guarded_string_codec {
    ($Name:ident) => {
        impl StacksMessageCodec for $Name {
            fn consensus_serialize<W: Write>(&self, fd: &mut W) -> Result<(), codec_error> {
                self.serialize_write(fd).map_err(codec_error::WriteError)
            }

            fn consensus_deserialize<R: Read>(fd: &mut R) -> Result<$Name, codec_error> {
                $Name::deserialize_read(fd)
                    .map_err(|e| codec_error::DeserializeError(e.to_string()))
            }
        }
    };
}

impl_guarded_string_codec!(ClarityName);
impl_guarded_string_codec!(ContractName);

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

pub mod serialization;

use std::collections::HashSet;
use std::{fmt, str};

use poll_common::address::c32;
use poll_common::address::{
    C32_ADDRESS_VERSION_MAINNET_MULTISIG, C32_ADDRESS_VERSION_MAINNET_SINGLESIG,
    C32_ADDRESS_VERSION_TESTNET_MULTISIG,
};
use poll_common::types::StacksAddress;
use poll_common::util::hash::{self, Hash160};

use crate::errors::ClarityTypeError;
use crate::representations::{ClarityName, ContractName};

/// Maximum size in bytes allowed for a value.
pub const MAX_VALUE_SIZE: u32 = 1024 * 1024; // 1MB
/// Maximum allowed nesting depth of a constructed value.
pub const MAX_TYPE_DEPTH: u8 = 32;
/// this is the charged size for wrapped values, i.e., response or optionals
pub const WRAPPER_VALUE_SIZE: u32 = 1;

#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct TupleData {
    /// Fields in construction (or decoded) order. Names are unique.
    data: Vec<(ClarityName, Value)>,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuffData {
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListData {
    pub data: Vec<Value>,
}

#[derive(Clone, Eq, PartialEq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct StandardPrincipalData(u8, pub [u8; 20]);

impl StandardPrincipalData {
    pub fn new(version: u8, bytes: [u8; 20]) -> Result<Self, ClarityTypeError> {
        if version >= 32 {
            return Err(ClarityTypeError::InvalidPrincipalVersion(version));
        }
        Ok(Self(version, bytes))
    }

    pub fn version(&self) -> u8 {
        self.0
    }

    pub fn to_address(&self) -> String {
        c32::c32_address(self.0, &self.1[..]).unwrap_or_else(|_| "INVALID_C32_ADD".to_string())
    }

    pub fn is_mainnet(&self) -> bool {
        self.0 == C32_ADDRESS_VERSION_MAINNET_MULTISIG
            || self.0 == C32_ADDRESS_VERSION_MAINNET_SINGLESIG
    }

    pub fn is_multisig(&self) -> bool {
        self.0 == C32_ADDRESS_VERSION_MAINNET_MULTISIG
            || self.0 == C32_ADDRESS_VERSION_TESTNET_MULTISIG
    }
}

impl fmt::Display for StandardPrincipalData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let c32_str = self.to_address();
        write!(f, "{c32_str}")
    }
}

impl fmt::Debug for StandardPrincipalData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let c32_str = self.to_address();
        write!(f, "StandardPrincipalData({c32_str})")
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct QualifiedContractIdentifier {
    pub issuer: StandardPrincipalData,
    pub name: ContractName,
}

impl QualifiedContractIdentifier {
    pub fn new(issuer: StandardPrincipalData, name: ContractName) -> QualifiedContractIdentifier {
        Self { issuer, name }
    }

    /// Parse `ADDRESS.contract-name`
    pub fn parse(literal: &str) -> Result<QualifiedContractIdentifier, ClarityTypeError> {
        let (issuer, name) = literal
            .split_once('.')
            .ok_or(ClarityTypeError::QualifiedContractMissingDot)?;
        let sender = PrincipalData::parse_standard_principal(issuer)?;
        let name = ContractName::try_from(name.to_string())?;
        Ok(QualifiedContractIdentifier::new(sender, name))
    }
}

impl fmt::Display for QualifiedContractIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}", self.issuer, self.name)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum PrincipalData {
    Standard(StandardPrincipalData),
    Contract(QualifiedContractIdentifier),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionalData {
    pub data: Option<Box<Value>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseData {
    pub committed: bool,
    pub data: Box<Value>,
}

/// A Clarity value. The set of variants is closed; each one has exactly one
/// wire tag (see `serialization::TypePrefix`).
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Int(i128),
    UInt(u128),
    Bool(bool),
    Sequence(SequenceData),
    Principal(PrincipalData),
    Tuple(TupleData),
    Optional(OptionalData),
    Response(ResponseData),
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum SequenceData {
    Buffer(BuffData),
    List(ListData),
    String(CharType),
}

impl SequenceData {
    pub fn len(&self) -> usize {
        match self {
            SequenceData::Buffer(data) => data.data.len(),
            SequenceData::List(data) => data.data.len(),
            SequenceData::String(CharType::ASCII(data)) => data.data.len(),
            SequenceData::String(CharType::UTF8(data)) => data.data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum CharType {
    UTF8(UTF8Data),
    ASCII(ASCIIData),
}

impl fmt::Display for CharType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CharType::ASCII(string) => write!(f, "{string}"),
            CharType::UTF8(string) => write!(f, "{string}"),
        }
    }
}

impl fmt::Debug for CharType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ASCIIData {
    pub data: Vec<u8>,
}

impl fmt::Display for ASCIIData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut escaped_str = String::new();
        for c in self.data.iter() {
            let escaped_char = format!("{}", std::ascii::escape_default(*c));
            escaped_str.push_str(&escaped_char);
        }
        write!(f, "\"{escaped_str}\"")
    }
}

/// UTF-8 string stored one encoded scalar per entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UTF8Data {
    pub data: Vec<Vec<u8>>,
}

impl UTF8Data {
    /// Total encoded length in bytes
    pub fn byte_len(&self) -> usize {
        self.data.iter().map(|c| c.len()).sum()
    }
}

impl fmt::Display for UTF8Data {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut result = String::new();
        for c in self.data.iter() {
            if c.len() > 1 {
                // We escape extended charset
                result.push_str(&format!("\\u{{{}}}", hash::to_hex(&c[..])));
            } else if let Some(byte) = c.first() {
                // We render an ASCII char, escaped
                let escaped_char = format!("{}", std::ascii::escape_default(*byte));
                result.push_str(&escaped_char);
            }
        }
        write!(f, "u\"{result}\"")
    }
}

impl PartialEq for TupleData {
    /// Field order does not matter
    fn eq(&self, other: &TupleData) -> bool {
        self.data.len() == other.data.len() && self.sorted_fields() == other.sorted_fields()
    }
}

pub const NONE: Value = Value::Optional(OptionalData { data: None });

impl Value {
    fn check_wrappable(data: &Value) -> Result<(), ClarityTypeError> {
        if data.serialized_size() + u64::from(WRAPPER_VALUE_SIZE) > u64::from(MAX_VALUE_SIZE) {
            Err(ClarityTypeError::ValueTooLarge)
        } else if data.depth() + 1 > MAX_TYPE_DEPTH {
            Err(ClarityTypeError::TypeSignatureTooDeep)
        } else {
            Ok(())
        }
    }

    pub fn some(data: Value) -> Result<Value, ClarityTypeError> {
        Value::check_wrappable(&data)?;
        Ok(Value::Optional(OptionalData {
            data: Some(Box::new(data)),
        }))
    }

    pub fn none() -> Value {
        NONE.clone()
    }

    pub fn okay_true() -> Value {
        Value::Response(ResponseData {
            committed: true,
            data: Box::new(Value::Bool(true)),
        })
    }

    pub fn err_uint(ecode: u128) -> Value {
        Value::Response(ResponseData {
            committed: false,
            data: Box::new(Value::UInt(ecode)),
        })
    }

    pub fn okay(data: Value) -> Result<Value, ClarityTypeError> {
        Value::check_wrappable(&data)?;
        Ok(Value::Response(ResponseData {
            committed: true,
            data: Box::new(data),
        }))
    }

    pub fn error(data: Value) -> Result<Value, ClarityTypeError> {
        Value::check_wrappable(&data)?;
        Ok(Value::Response(ResponseData {
            committed: false,
            data: Box::new(data),
        }))
    }

    /// Nesting depth: atoms are 1, every wrapper or container adds one.
    pub fn depth(&self) -> u8 {
        let inner = match self {
            Value::Optional(OptionalData { data: Some(inner) }) => inner.depth(),
            Value::Response(ResponseData { data, .. }) => data.depth(),
            Value::Sequence(SequenceData::List(list)) => {
                list.data.iter().map(Value::depth).max().unwrap_or(0)
            }
            Value::Tuple(tuple) => return tuple.depth(),
            _ => return 1,
        };
        inner.saturating_add(1)
    }

    /// Length in bytes of this value's consensus serialization
    pub fn serialized_size(&self) -> u64 {
        // one type prefix byte, plus the payload
        1 + match self {
            Value::Int(_) | Value::UInt(_) => 16,
            Value::Bool(_) => 0,
            Value::Principal(PrincipalData::Standard(_)) => 21,
            Value::Principal(PrincipalData::Contract(id)) => 21 + 1 + u64::from(id.name.len()),
            Value::Optional(OptionalData { data: None }) => 0,
            Value::Optional(OptionalData { data: Some(inner) }) => inner.serialized_size(),
            Value::Response(ResponseData { data, .. }) => data.serialized_size(),
            Value::Sequence(SequenceData::Buffer(buff)) => 4 + buff.data.len() as u64,
            Value::Sequence(SequenceData::String(CharType::ASCII(s))) => 4 + s.data.len() as u64,
            Value::Sequence(SequenceData::String(CharType::UTF8(s))) => 4 + s.byte_len() as u64,
            Value::Sequence(SequenceData::List(list)) => {
                4 + list.data.iter().map(Value::serialized_size).sum::<u64>()
            }
            Value::Tuple(tuple) => tuple.payload_size(),
        }
    }

    pub fn list_from(list_data: Vec<Value>) -> Result<Value, ClarityTypeError> {
        let list_value = Value::Sequence(SequenceData::List(ListData { data: list_data }));
        if list_value.serialized_size() > u64::from(MAX_VALUE_SIZE) {
            return Err(ClarityTypeError::ValueTooLarge);
        }
        if list_value.depth() > MAX_TYPE_DEPTH {
            return Err(ClarityTypeError::TypeSignatureTooDeep);
        }
        Ok(list_value)
    }

    /// # Errors
    /// - ClarityTypeError::ValueTooLarge if `buff_data` is too large.
    pub fn buff_from(buff_data: Vec<u8>) -> Result<Value, ClarityTypeError> {
        check_sequence_len(buff_data.len())?;
        Ok(Value::Sequence(SequenceData::Buffer(BuffData {
            data: buff_data,
        })))
    }

    pub fn string_ascii_from_bytes(bytes: Vec<u8>) -> Result<Value, ClarityTypeError> {
        check_sequence_len(bytes.len())?;

        for b in bytes.iter() {
            if !b.is_ascii_alphanumeric() && !b.is_ascii_punctuation() && !b.is_ascii_whitespace() {
                return Err(ClarityTypeError::InvalidAsciiCharacter(*b));
            }
        }
        Ok(Value::Sequence(SequenceData::String(CharType::ASCII(
            ASCIIData { data: bytes },
        ))))
    }

    pub fn string_utf8_from_bytes(bytes: Vec<u8>) -> Result<Value, ClarityTypeError> {
        let validated_utf8_str =
            str::from_utf8(&bytes).map_err(|_| ClarityTypeError::InvalidUtf8Encoding)?;
        Value::string_utf8_from_str(validated_utf8_str)
    }

    pub fn string_utf8_from_str(s: &str) -> Result<Value, ClarityTypeError> {
        check_sequence_len(s.len())?;
        let data = s
            .chars()
            .map(|char| {
                let mut encoded_char = vec![0u8; char.len_utf8()];
                char.encode_utf8(&mut encoded_char);
                encoded_char
            })
            .collect::<Vec<_>>();

        Ok(Value::Sequence(SequenceData::String(CharType::UTF8(
            UTF8Data { data },
        ))))
    }

    /// Parse a signed decimal literal. Only `-` may precede the digits.
    pub fn int_from_str(literal: &str) -> Result<Value, ClarityTypeError> {
        if literal.starts_with('+') {
            return Err(ClarityTypeError::IntegerOutOfRange(literal.to_string()));
        }
        literal
            .parse::<i128>()
            .map(Value::Int)
            .map_err(|_| ClarityTypeError::IntegerOutOfRange(literal.to_string()))
    }

    /// Parse an unsigned decimal literal, with or without Clarity's `u` prefix
    pub fn uint_from_str(literal: &str) -> Result<Value, ClarityTypeError> {
        let digits = literal.strip_prefix('u').unwrap_or(literal);
        if digits.starts_with('+') {
            return Err(ClarityTypeError::IntegerOutOfRange(literal.to_string()));
        }
        digits
            .parse::<u128>()
            .map(Value::UInt)
            .map_err(|_| ClarityTypeError::IntegerOutOfRange(literal.to_string()))
    }

    pub fn expect_tuple(self) -> Option<TupleData> {
        match self {
            Value::Tuple(data) => Some(data),
            _ => None,
        }
    }
}

fn check_sequence_len(len: usize) -> Result<(), ClarityTypeError> {
    match u32::try_from(len) {
        Ok(len) if len <= MAX_VALUE_SIZE => Ok(()),
        _ => Err(ClarityTypeError::ValueTooLarge),
    }
}

impl BuffData {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        self.data.as_slice()
    }
}

impl ListData {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Display for OptionalData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.data {
            Some(ref x) => write!(f, "(some {x})"),
            None => write!(f, "none"),
        }
    }
}

impl fmt::Display for ResponseData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.committed {
            true => write!(f, "(ok {})", self.data),
            false => write!(f, "(err {})", self.data),
        }
    }
}

impl fmt::Display for BuffData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", hash::to_hex(&self.data))
    }
}

impl fmt::Debug for BuffData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Int(int) => write!(f, "{int}"),
            Value::UInt(int) => write!(f, "u{int}"),
            Value::Bool(boolean) => write!(f, "{boolean}"),
            Value::Tuple(data) => write!(f, "{data}"),
            Value::Principal(principal_data) => write!(f, "{principal_data}"),
            Value::Optional(opt_data) => write!(f, "{opt_data}"),
            Value::Response(res_data) => write!(f, "{res_data}"),
            Value::Sequence(SequenceData::Buffer(vec_bytes)) => write!(f, "0x{vec_bytes}"),
            Value::Sequence(SequenceData::String(string)) => write!(f, "{string}"),
            Value::Sequence(SequenceData::List(list_data)) => {
                write!(f, "(list")?;
                for v in list_data.data.iter() {
                    write!(f, " {v}")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl PrincipalData {
    pub fn version(&self) -> u8 {
        match self {
            PrincipalData::Standard(p) => p.version(),
            PrincipalData::Contract(QualifiedContractIdentifier { issuer, name: _ }) => {
                issuer.version()
            }
        }
    }

    /// Parse a standard (`ADDRESS`) or contract (`ADDRESS.name`) principal
    pub fn parse(literal: &str) -> Result<PrincipalData, ClarityTypeError> {
        // be permissive about leading single-quote
        let literal = literal.strip_prefix('\'').unwrap_or(literal);

        if literal.contains('.') {
            PrincipalData::parse_qualified_contract_principal(literal)
        } else {
            PrincipalData::parse_standard_principal(literal).map(PrincipalData::from)
        }
    }

    pub fn parse_qualified_contract_principal(
        literal: &str,
    ) -> Result<PrincipalData, ClarityTypeError> {
        let contract_id = QualifiedContractIdentifier::parse(literal)?;
        Ok(PrincipalData::Contract(contract_id))
    }

    pub fn parse_standard_principal(
        literal: &str,
    ) -> Result<StandardPrincipalData, ClarityTypeError> {
        let (version, data) = c32::c32_address_decode(literal)
            .map_err(|x| ClarityTypeError::InvalidPrincipalEncoding(x.to_string()))?;
        if data.len() != 20 {
            return Err(ClarityTypeError::InvalidPrincipalLength(data.len()));
        }
        let mut fixed_data = [0; 20];
        fixed_data.copy_from_slice(&data[..20]);
        StandardPrincipalData::new(version, fixed_data)
    }
}

impl fmt::Display for PrincipalData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PrincipalData::Standard(sender) => write!(f, "{sender}"),
            PrincipalData::Contract(contract_identifier) => write!(
                f,
                "{}.{}",
                contract_identifier.issuer, contract_identifier.name
            ),
        }
    }
}

impl TryFrom<StacksAddress> for StandardPrincipalData {
    type Error = ClarityTypeError;

    fn try_from(addr: StacksAddress) -> Result<Self, Self::Error> {
        Self::new(addr.version, addr.bytes.into_bytes())
    }
}

impl From<StandardPrincipalData> for StacksAddress {
    fn from(o: StandardPrincipalData) -> StacksAddress {
        // the principal constructor already bounds the version
        StacksAddress {
            version: o.version(),
            bytes: Hash160(o.1),
        }
    }
}

impl From<StandardPrincipalData> for Value {
    fn from(principal: StandardPrincipalData) -> Self {
        Value::Principal(PrincipalData::from(principal))
    }
}

impl From<QualifiedContractIdentifier> for Value {
    fn from(principal: QualifiedContractIdentifier) -> Self {
        Value::Principal(PrincipalData::Contract(principal))
    }
}

impl From<PrincipalData> for Value {
    fn from(p: PrincipalData) -> Self {
        Value::Principal(p)
    }
}

impl From<StandardPrincipalData> for PrincipalData {
    fn from(p: StandardPrincipalData) -> Self {
        PrincipalData::Standard(p)
    }
}

impl From<QualifiedContractIdentifier> for PrincipalData {
    fn from(principal: QualifiedContractIdentifier) -> Self {
        PrincipalData::Contract(principal)
    }
}

impl From<TupleData> for Value {
    fn from(t: TupleData) -> Self {
        Value::Tuple(t)
    }
}

impl From<ASCIIData> for Value {
    fn from(ascii: ASCIIData) -> Self {
        Value::Sequence(SequenceData::String(CharType::ASCII(ascii)))
    }
}

impl TupleData {
    /// Return the number of fields in this tuple value
    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    /// Checks whether the tuple value is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn from_data(data: Vec<(ClarityName, Value)>) -> Result<TupleData, ClarityTypeError> {
        if data.is_empty() {
            return Err(ClarityTypeError::EmptyTuplesNotAllowed);
        }
        let mut seen = HashSet::with_capacity(data.len());
        for (name, _) in data.iter() {
            if !seen.insert(name.as_str()) {
                return Err(ClarityTypeError::DuplicateTupleField(name.to_string()));
            }
        }

        let tuple = TupleData { data };
        if 1 + tuple.payload_size() > u64::from(MAX_VALUE_SIZE) {
            return Err(ClarityTypeError::ValueTooLarge);
        }
        if tuple.depth() > MAX_TYPE_DEPTH {
            return Err(ClarityTypeError::TypeSignatureTooDeep);
        }
        Ok(tuple)
    }

    fn depth(&self) -> u8 {
        let inner = self.data.iter().map(|(_, v)| v.depth()).max().unwrap_or(0);
        inner.saturating_add(1)
    }

    /// Serialized length without the type prefix
    fn payload_size(&self) -> u64 {
        4 + self
            .data
            .iter()
            .map(|(name, v)| 1 + u64::from(name.len()) + v.serialized_size())
            .sum::<u64>()
    }

    pub fn get(&self, name: &str) -> Result<&Value, ClarityTypeError> {
        self.data
            .iter()
            .find(|(field, _)| field.as_str() == name)
            .map(|(_, value)| value)
            .ok_or_else(|| ClarityTypeError::NoSuchTupleField(name.to_string()))
    }

    pub fn get_owned(self, name: &str) -> Result<Value, ClarityTypeError> {
        self.data
            .into_iter()
            .find(|(field, _)| field.as_str() == name)
            .map(|(_, value)| value)
            .ok_or_else(|| ClarityTypeError::NoSuchTupleField(name.to_string()))
    }

    /// Fields in construction (or decoded) order
    pub fn iter(&self) -> impl Iterator<Item = (&ClarityName, &Value)> {
        self.data.iter().map(|(name, value)| (name, value))
    }

    /// Fields in canonical order: byte-lexicographic by name
    pub fn sorted_fields(&self) -> Vec<(&ClarityName, &Value)> {
        let mut fields: Vec<_> = self.iter().collect();
        fields.sort_by(|(a, _), (b, _)| a.as_bytes().cmp(b.as_bytes()));
        fields
    }
}

impl fmt::Display for TupleData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(tuple")?;
        for (name, value) in self.sorted_fields() {
            write!(f, " ({name} {value})")?;
        }
        write!(f, ")")
    }
}

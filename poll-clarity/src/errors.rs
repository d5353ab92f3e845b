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

use std::{error, fmt};

/// Errors originating purely from the Clarity type layer: values or names
/// that cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClarityTypeError {
    // Size & Depth Invariants
    /// The constructed value exceeds the maximum allowed Clarity value size.
    ValueTooLarge,
    /// The constructed value exceeds the maximum allowed nesting depth.
    TypeSignatureTooDeep,

    // String & Encoding Errors
    /// A byte outside printable ASCII and whitespace was found in an ASCII string.
    InvalidAsciiCharacter(u8),
    /// The provided bytes did not form valid UTF-8.
    InvalidUtf8Encoding,

    // Tuple Errors
    /// A tuple was constructed with duplicate field names.
    DuplicateTupleField(String),
    /// Empty tuple is not allowed in Clarity.
    EmptyTuplesNotAllowed,
    /// Referenced tuple field does not exist.
    NoSuchTupleField(String),

    // Name Errors
    /// Invalid Clarity name.
    /// The `String` represents the offending value.
    InvalidClarityName(String),
    /// Invalid contract name.
    /// The `String` represents the offending value.
    InvalidContractName(String),

    // Principal & Identifier Errors
    /// An invalid version byte was used for a principal.
    InvalidPrincipalVersion(u8),
    /// An invalid principal byte length was supplied.
    InvalidPrincipalLength(usize),
    /// C32 decode failed
    InvalidPrincipalEncoding(String),
    /// An invalid qualified identifier was supplied with a missing '.' separator.
    QualifiedContractMissingDot,

    /// Decimal input that is not an integer in the range of the target type
    IntegerOutOfRange(String),
}

impl fmt::Display for ClarityTypeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl error::Error for ClarityTypeError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        None
    }
}

/// Wraps an error type that has no meaningful equality so that error enums
/// carrying it can still derive `PartialEq`. Two wrapped errors never compare equal.
#[derive(Debug)]
pub struct IncomparableError<T> {
    pub err: T,
}

impl<T> PartialEq<IncomparableError<T>> for IncomparableError<T> {
    fn eq(&self, _other: &IncomparableError<T>) -> bool {
        false
    }
}

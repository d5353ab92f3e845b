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

pub mod c32;

pub const C32_ADDRESS_VERSION_MAINNET_SINGLESIG: u8 = 22; // P
pub const C32_ADDRESS_VERSION_MAINNET_MULTISIG: u8 = 20; // M
pub const C32_ADDRESS_VERSION_TESTNET_SINGLESIG: u8 = 26; // T
pub const C32_ADDRESS_VERSION_TESTNET_MULTISIG: u8 = 21; // N

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Input contains a character outside the c32 alphabet (or non-ASCII)
    InvalidCharacter(char),
    /// Checksum did not match: (computed, expected)
    ChecksumMismatch(u32, u32),
    /// Structurally invalid address (missing prefix, too short, wrong payload length)
    MalformedAddress(String),
    /// Version does not fit in a single c32 character
    InvalidVersion(u8),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::InvalidCharacter(c) => write!(f, "Invalid c32 character: {c:?}"),
            Error::ChecksumMismatch(computed, expected) => write!(
                f,
                "Invalid checksum: {computed:08x} (computed) != {expected:08x} (expected)"
            ),
            Error::MalformedAddress(ref msg) => write!(f, "Malformed address: {msg}"),
            Error::InvalidVersion(v) => write!(f, "Invalid address version: {v}"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        None
    }
}

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

use std::fmt::Write;

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use crate::util::HexError;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash160(pub [u8; 20]);
impl_byte_array_newtype!(Hash160, 20);
impl_byte_array_serde!(Hash160);

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha256Sum(pub [u8; 32]);
impl_byte_array_newtype!(Sha256Sum, 32);

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DoubleSha256(pub [u8; 32]);
impl_byte_array_newtype!(DoubleSha256, 32);

impl Hash160 {
    /// RIPEMD160 of an existing SHA256 digest
    pub fn from_sha256(sha256_hash: &[u8; 32]) -> Hash160 {
        let mut ret = [0u8; 20];
        ret.copy_from_slice(Ripemd160::digest(sha256_hash).as_slice());
        Hash160(ret)
    }

    /// Create a hash by hashing some data: RIPEMD160(SHA256(data))
    pub fn from_data(data: &[u8]) -> Hash160 {
        let sha2_result = Sha256Sum::from_data(data);
        Hash160::from_sha256(sha2_result.as_bytes())
    }

    pub fn zero() -> Hash160 {
        Hash160([0u8; 20])
    }
}

impl Sha256Sum {
    pub fn from_data(data: &[u8]) -> Sha256Sum {
        let mut ret = [0u8; 32];
        ret.copy_from_slice(Sha256::digest(data).as_slice());
        Sha256Sum(ret)
    }
}

impl DoubleSha256 {
    pub fn from_data(data: &[u8]) -> DoubleSha256 {
        let mut ret = [0u8; 32];
        ret.copy_from_slice(Sha256::digest(Sha256::digest(data)).as_slice());
        DoubleSha256(ret)
    }

    /// The first four bytes, used as a c32check checksum
    pub fn checksum(&self) -> [u8; 4] {
        let mut ret = [0u8; 4];
        ret.copy_from_slice(&self.0[0..4]);
        ret
    }
}

/// Convert a hexadecimal-encoded string to its corresponding bytes
pub fn hex_bytes(s: &str) -> Result<Vec<u8>, HexError> {
    if s.len() % 2 != 0 {
        return Err(HexError::BadLength(s.len()));
    }
    let mut v = Vec::with_capacity(s.len() / 2);
    let mut chars = s.chars();
    while let (Some(hi), Some(lo)) = (chars.next(), chars.next()) {
        match (hi.to_digit(16), lo.to_digit(16)) {
            (None, _) => return Err(HexError::BadCharacter(hi)),
            (_, None) => return Err(HexError::BadCharacter(lo)),
            (Some(hi), Some(lo)) => v.push((hi * 0x10 + lo) as u8),
        }
    }
    Ok(v)
}

/// Convert a slice of u8 to a hex string
pub fn to_hex(s: &[u8]) -> String {
    let mut r = String::with_capacity(s.len() * 2);
    for b in s.iter() {
        // writing to a String never fails
        let _ = write!(r, "{:02x}", b);
    }
    r
}

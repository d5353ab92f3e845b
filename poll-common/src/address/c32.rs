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

//! c32check: Crockford-style base32 with an embedded double-SHA256 checksum.

use super::Error;
use crate::consts::{C32_CHECKSUM_LEN, C32_MAX_VERSION};
use crate::util::hash::DoubleSha256;

const C32_CHARACTERS: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// C32 digit values indexed by ASCII code.
/// Both letter cases are accepted, and the look-alike letters are folded:
///   * `O` and `o` as `0`
///   * `L`, `l`, `I` and `i` as `1`
const C32_CHARACTERS_MAP: [Option<u8>; 128] = build_c32_map();

const fn build_c32_map() -> [Option<u8>; 128] {
    let mut table: [Option<u8>; 128] = [None; 128];
    let mut i = 0;
    while i < C32_CHARACTERS.len() {
        let c = C32_CHARACTERS[i];
        table[c as usize] = Some(i as u8);
        table[c.to_ascii_lowercase() as usize] = Some(i as u8);
        i += 1;
    }
    table[b'O' as usize] = Some(0);
    table[b'o' as usize] = Some(0);
    table[b'L' as usize] = Some(1);
    table[b'l' as usize] = Some(1);
    table[b'I' as usize] = Some(1);
    table[b'i' as usize] = Some(1);
    table
}

fn c32_digit(c: char) -> Option<u8> {
    if !c.is_ascii() {
        return None;
    }
    C32_CHARACTERS_MAP[c as usize]
}

/// Fail on the first character that has no c32 digit value
fn check_c32_characters(input_str: &str) -> Result<(), Error> {
    match input_str.chars().find(|c| c32_digit(*c).is_none()) {
        Some(bad) => {
            debug!("Rejecting c32 input"; "character" => ?bad);
            Err(Error::InvalidCharacter(bad))
        }
        None => Ok(()),
    }
}

/// Encode bytes as c32, keeping one `0` per leading zero byte
pub fn c32_encode(input_bytes: &[u8]) -> String {
    let mut result = vec![];
    let mut carry = 0;
    let mut carry_bits = 0;

    for current_value in input_bytes.iter().rev() {
        let low_bits_to_take = 5 - carry_bits;
        let low_bits = current_value & ((1 << low_bits_to_take) - 1);
        let c32_value = (low_bits << carry_bits) + carry;
        result.push(C32_CHARACTERS[c32_value as usize]);
        carry_bits = (8 + carry_bits) - 5;
        carry = current_value >> (8 - carry_bits);

        if carry_bits >= 5 {
            let c32_value = carry & ((1 << 5) - 1);
            result.push(C32_CHARACTERS[c32_value as usize]);
            carry_bits -= 5;
            carry >>= 5;
        }
    }

    if carry_bits > 0 {
        result.push(C32_CHARACTERS[carry as usize]);
    }

    // drop the zero digits produced by the bit packing
    while result.last() == Some(&C32_CHARACTERS[0]) {
        result.pop();
    }

    // and restore exactly one per leading zero byte
    let leading_zeros = input_bytes.iter().take_while(|b| **b == 0).count();
    result.extend(std::iter::repeat(C32_CHARACTERS[0]).take(leading_zeros));

    result.iter().rev().map(|b| char::from(*b)).collect()
}

/// Decode a c32 string, normalizing case and look-alike letters
pub fn c32_decode(input_str: &str) -> Result<Vec<u8>, Error> {
    check_c32_characters(input_str)?;

    let digits: Vec<u8> = input_str.chars().rev().filter_map(c32_digit).collect();

    let mut result = Vec::with_capacity(digits.len() * 5 / 8 + 1);
    let mut carry: u16 = 0;
    let mut carry_bits = 0; // can be up to 5

    for current_5bit in digits.iter() {
        carry += (*current_5bit as u16) << carry_bits;
        carry_bits += 5;

        if carry_bits >= 8 {
            result.push((carry & 0xff) as u8);
            carry_bits -= 8;
            carry >>= 8;
        }
    }

    if carry_bits > 0 {
        result.push(carry as u8);
    }

    while result.last() == Some(&0) {
        result.pop();
    }

    let leading_zeros = digits.iter().rev().take_while(|d| **d == 0).count();
    result.extend(std::iter::repeat(0).take(leading_zeros));

    result.reverse();
    Ok(result)
}

fn checksum_u32(sum: &[u8]) -> u32 {
    sum.iter()
        .take(C32_CHECKSUM_LEN)
        .enumerate()
        .fold(0u32, |acc, (i, b)| acc | ((*b as u32) << (8 * i)))
}

/// Version character followed by c32(data ++ checksum), without the `S` prefix
pub fn c32_check_encode(version: u8, data: &[u8]) -> Result<String, Error> {
    if version > C32_MAX_VERSION {
        return Err(Error::InvalidVersion(version));
    }

    let mut check_data = Vec::with_capacity(data.len() + 1);
    check_data.push(version);
    check_data.extend_from_slice(data);
    let checksum = DoubleSha256::from_data(&check_data).checksum();

    let mut encoding_data = data.to_vec();
    encoding_data.extend_from_slice(&checksum);

    let mut c32_string = String::with_capacity(encoding_data.len() * 8 / 5 + 2);
    c32_string.push(char::from(C32_CHARACTERS[version as usize]));
    c32_string.push_str(&c32_encode(&encoding_data));
    Ok(c32_string)
}

/// Inverse of [`c32_check_encode`]; the checksum is verified before anything
/// about the payload is interpreted.
pub fn c32_check_decode(check_data: &str) -> Result<(u8, Vec<u8>), Error> {
    check_c32_characters(check_data)?;

    let mut chars = check_data.chars();
    let version = match chars.next().and_then(c32_digit) {
        Some(v) => v,
        None => {
            return Err(Error::MalformedAddress(
                "missing version character".to_string(),
            ))
        }
    };

    let data_sum_bytes = c32_decode(chars.as_str())?;
    if data_sum_bytes.len() < C32_CHECKSUM_LEN {
        return Err(Error::MalformedAddress(format!(
            "decoded {} bytes, too short to carry a checksum",
            data_sum_bytes.len()
        )));
    }

    let (data_bytes, expected_sum) =
        data_sum_bytes.split_at(data_sum_bytes.len() - C32_CHECKSUM_LEN);

    let mut versioned = Vec::with_capacity(data_bytes.len() + 1);
    versioned.push(version);
    versioned.extend_from_slice(data_bytes);

    let computed_sum = DoubleSha256::from_data(&versioned).checksum();
    if computed_sum[..] != expected_sum[..] {
        let computed = checksum_u32(&computed_sum);
        let expected = checksum_u32(expected_sum);
        debug!("c32check checksum mismatch";
               "computed" => format!("{computed:08x}"),
               "expected" => format!("{expected:08x}"));
        return Err(Error::ChecksumMismatch(computed, expected));
    }

    Ok((version, data_bytes.to_vec()))
}

/// Decode an `S`-prefixed address into its version and payload bytes
pub fn c32_address_decode(c32_address_str: &str) -> Result<(u8, Vec<u8>), Error> {
    check_c32_characters(c32_address_str)?;

    // 'S' + version + at least four checksum characters
    if c32_address_str.len() <= 5 {
        return Err(Error::MalformedAddress(format!(
            "address too short ({} characters)",
            c32_address_str.len()
        )));
    }

    match c32_address_str.strip_prefix(['S', 's']) {
        Some(check_data) => c32_check_decode(check_data),
        None => Err(Error::MalformedAddress(
            "address must begin with 'S'".to_string(),
        )),
    }
}

/// Encode a version and payload as an `S`-prefixed c32check address
pub fn c32_address(version: u8, data: &[u8]) -> Result<String, Error> {
    let c32_string = c32_check_encode(version, data)?;
    Ok(format!("S{c32_string}"))
}

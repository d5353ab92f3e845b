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

mod types;

use crate::types::{StandardPrincipalData, Value};

/// Principal with version 22 and the given repeated byte as its hash
pub(crate) fn mainnet_principal(byte: u8) -> StandardPrincipalData {
    StandardPrincipalData::new(22, [byte; 20]).unwrap()
}

/// Serialize, deserialize, and check that nothing changed on the way
pub(crate) fn assert_round_trip(value: &Value) {
    let bytes = value.serialize_to_vec().unwrap();
    assert_eq!(bytes.len() as u64, value.serialized_size());
    assert_eq!(&Value::deserialize(&bytes).unwrap(), value);
}

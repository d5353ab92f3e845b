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

/// Define a "u8" enum
///  gives you a from_u8(u8) -> Option<Self> function
#[macro_export]
macro_rules! define_u8_enum {
    ($(#[$outer:meta])* $Name:ident { $($Variant:ident = $Val:literal),+ }) =>
    {
        $(#[$outer])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[repr(u8)]
        pub enum $Name {
            $($Variant = $Val),*,
        }
        impl $Name {
            pub const ALL: &'static [$Name] = &[$($Name::$Variant),*];

            pub fn to_u8(&self) -> u8 {
                match self {
                    $(
                        $Name::$Variant => $Val,
                    )*
                }
            }

            pub fn from_u8(v: u8) -> Option<Self> {
                match v {
                    $(
                        v if v == $Name::$Variant as u8 => Some($Name::$Variant),
                    )*
                    _ => None
                }
            }
        }
    }
}

/// Fixed-size byte array newtype helpers: hex conversion, slice conversion, `Display`.
#[macro_export]
macro_rules! impl_byte_array_newtype {
    ($thing:ident, $len:expr) => {
        impl $thing {
            /// Instantiates from a hex string
            pub fn from_hex(hex_str: &str) -> Result<$thing, $crate::util::HexError> {
                let bytes = $crate::util::hash::hex_bytes(hex_str)?;
                $thing::from_bytes(&bytes)
                    .ok_or($crate::util::HexError::BadLength(hex_str.len()))
            }

            /// Instantiates from a slice of bytes
            pub fn from_bytes(inp: &[u8]) -> Option<$thing> {
                if inp.len() != $len {
                    return None;
                }
                let mut ret = [0; $len];
                ret.copy_from_slice(inp);
                Some($thing(ret))
            }

            /// Returns the underlying bytes.
            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            /// Returns the underlying bytes.
            pub fn into_bytes(self) -> [u8; $len] {
                self.0
            }

            /// Convert to a hex string
            pub fn to_hex(&self) -> String {
                $crate::util::hash::to_hex(&self.0)
            }
        }

        impl std::fmt::Display for $thing {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "{}", self.to_hex())
            }
        }

        impl std::fmt::Debug for $thing {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "{}", self.to_hex())
            }
        }

        impl std::convert::AsRef<[u8]> for $thing {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl std::convert::From<[u8; $len]> for $thing {
            fn from(o: [u8; $len]) -> Self {
                Self(o)
            }
        }
    };
}

#[macro_export]
macro_rules! impl_byte_array_serde {
    ($thing:ident) => {
        impl serde::Serialize for $thing {
            fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
                let inst = self.to_hex();
                s.serialize_str(inst.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $thing {
            fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<$thing, D::Error> {
                let inst_str = <String as serde::Deserialize>::deserialize(d)?;
                $thing::from_hex(&inst_str).map_err(serde::de::Error::custom)
            }
        }
    };
}

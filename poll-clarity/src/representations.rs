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

use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

use regex::Regex;

use crate::errors::ClarityTypeError;

pub const CONTRACT_MIN_NAME_LENGTH: usize = 1;
pub const CONTRACT_MAX_NAME_LENGTH: usize = 40;
pub const MAX_STRING_LEN: u8 = 128;

lazy_static! {
    pub static ref CONTRACT_NAME_REGEX_STRING: String = format!(
        r#"([a-zA-Z](([a-zA-Z0-9]|[-_])){{{},{}}})"#,
        CONTRACT_MIN_NAME_LENGTH - 1,
        CONTRACT_MAX_NAME_LENGTH - 1
    );
    pub static ref CONTRACT_NAME_REGEX: Regex =
        Regex::new(&format!("^{}$|^__transient$", *CONTRACT_NAME_REGEX_STRING))
            .unwrap_or_else(|_| panic!("FAIL: invalid regex {}", *CONTRACT_NAME_REGEX_STRING));
    pub static ref CLARITY_NAME_REGEX_STRING: String =
        "^[a-zA-Z]([a-zA-Z0-9]|[-_!?+<>=/*])*$|^[-+=/*]$|^[<>]=?$".into();
    pub static ref CLARITY_NAME_REGEX: Regex = Regex::new(&CLARITY_NAME_REGEX_STRING)
        .unwrap_or_else(|_| panic!("FAIL: invalid regex {}", *CLARITY_NAME_REGEX_STRING));
}

/// A string newtype that can only be built from input matching `$Regex`
/// and no longer than `$MaxLen` bytes.
macro_rules! guarded_string {
    ($Name:ident, $Label:literal, $Regex:expr, $MaxLen:expr, $ErrorVariant:path) => {
        #[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(try_from = "String", into = "String")]
        pub struct $Name(String);

        impl TryFrom<String> for $Name {
            type Error = ClarityTypeError;
            fn try_from(value: String) -> Result<Self, Self::Error> {
                if value.is_empty() || value.len() > ($MaxLen as usize) {
                    return Err($ErrorVariant(value));
                }
                if $Regex.is_match(&value) {
                    Ok(Self(value))
                } else {
                    Err($ErrorVariant(value))
                }
            }
        }

        impl TryFrom<&str> for $Name {
            type Error = ClarityTypeError;
            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::try_from(value.to_string())
            }
        }

        impl std::str::FromStr for $Name {
            type Err = ClarityTypeError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::try_from(s.to_string())
            }
        }

        impl $Name {
            pub const LABEL: &'static str = $Label;

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Length in bytes. Construction bounds this well below 256.
            pub fn len(&self) -> u8 {
                self.0.len() as u8
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl Deref for $Name {
            type Target = str;
            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Borrow<str> for $Name {
            fn borrow(&self) -> &str {
                self.as_str()
            }
        }

        impl From<$Name> for String {
            fn from(name: $Name) -> String {
                name.0
            }
        }

        impl fmt::Display for $Name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

guarded_string!(
    ClarityName,
    "ClarityName",
    CLARITY_NAME_REGEX,
    MAX_STRING_LEN,
    ClarityTypeError::InvalidClarityName
);

guarded_string!(
    ContractName,
    "ContractName",
    CONTRACT_NAME_REGEX,
    CONTRACT_MAX_NAME_LENGTH,
    ClarityTypeError::InvalidContractName
);

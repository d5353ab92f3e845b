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

//! Clarity values, the names that qualify them, and their canonical
//! consensus serialization.

#[allow(unused_imports)]
#[macro_use(o, slog_log, slog_trace, slog_debug, slog_info, slog_warn, slog_error)]
extern crate slog;

#[macro_use]
extern crate lazy_static;

#[macro_use]
extern crate serde_derive;

#[macro_use]
extern crate poll_common;

pub use poll_common::{codec, util};

pub mod contract_call;
pub mod errors;
pub mod representations;
pub mod types;

pub use contract_call::{ContractCall, FunctionArgs};
pub use errors::{ClarityTypeError, IncomparableError};
pub use representations::{ClarityName, ContractName};
pub use types::serialization::{SerializationError, SerializationLimits};
pub use types::Value;

#[cfg(test)]
pub mod tests;

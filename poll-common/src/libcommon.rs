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

#![allow(clippy::assertions_on_constants)]

#[allow(unused_imports)]
#[macro_use(o, slog_log, slog_trace, slog_debug, slog_info, slog_warn, slog_error)]
pub extern crate slog;

#[macro_use]
extern crate serde_derive;

#[macro_use]
extern crate lazy_static;

#[macro_use]
pub mod util;

pub mod codec;

pub mod address;

pub mod types;

pub mod consts {
    /// Number of bytes in a hash160 address payload
    pub const HASH160_LEN: usize = 20;

    /// Length of the c32check checksum, in bytes
    pub const C32_CHECKSUM_LEN: usize = 4;

    /// Smallest valid version byte is 0, largest is 31: versions are a single c32 character
    pub const C32_MAX_VERSION: u8 = 31;
}

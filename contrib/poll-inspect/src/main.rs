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

#[allow(unused_imports)]
#[macro_use(slog_log, slog_debug, slog_info, slog_warn, slog_error)]
extern crate slog;
#[macro_use]
extern crate poll_common;

mod cli;
mod commands;
mod config;

use std::process;

use clap::Parser;

use crate::cli::Cli;
use crate::config::Config;

fn main() {
    let cli = Cli::parse();

    let config = match cli.config.as_ref() {
        Some(path) => Config::try_from(path),
        None => Ok(Config::default()),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration"; "err" => %e);
            eprintln!("Invalid configuration: {e}");
            process::exit(1);
        }
    };
    info!("Loaded configuration";
        "network" => %config.network,
        "max_depth" => config.limits.max_depth,
        "max_value_size" => config.limits.max_value_size
    );

    match commands::run(&cli.command, &config) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            error!("Command failed"; "err" => %e);
            eprintln!("{e}");
            process::exit(1);
        }
    }
}

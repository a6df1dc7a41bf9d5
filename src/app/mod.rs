// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

pub mod cli_parser;
pub mod config;
pub mod console;
pub mod logging;
pub mod output;
pub mod run;

pub use config::AppConfig;
pub use run::run;

use crate::check::RunSummary;

/// `ExitStatus` represents the exit states that will be return to the OS after termination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// All fine.
    Ok,
    /// CLI argument parsing failed.
    CliParsingFailed,
    /// Config could not be derived from CLI arguments.
    ConfigParsingFailed,
    /// Nameserver directory could not be loaded.
    DirectoryLoadFailed,
    /// Too few nameservers passed the check.
    CheckFailed,
    /// An unrecoverable error occurred. This is worst case and should not happen.
    UnrecoverableError,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        match self {
            ExitStatus::Ok => 0,
            ExitStatus::CliParsingFailed
            | ExitStatus::ConfigParsingFailed
            | ExitStatus::DirectoryLoadFailed
            | ExitStatus::UnrecoverableError => 1,
            ExitStatus::CheckFailed => 2,
        }
    }
}

impl From<&RunSummary> for ExitStatus {
    fn from(summary: &RunSummary) -> Self {
        if summary.passed {
            ExitStatus::Ok
        } else {
            ExitStatus::CheckFailed
        }
    }
}

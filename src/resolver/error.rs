// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinError;

/// Failure of a single query.
///
/// Query errors are data: they end up in the outcome of their nameserver and never abort a check.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum Error {
    #[error("invalid nameserver address '{server}': {reason}")]
    InvalidServer { server: String, reason: String },
    #[error("invalid domain name '{name}': {reason}")]
    InvalidName { name: String, reason: String },
    #[error("{reason}")]
    ResolveError { reason: String },
    #[error("query has been cancelled")]
    CancelledError,
    #[error("query execution panicked")]
    RuntimePanicError,
}

impl From<JoinError> for Error {
    fn from(error: JoinError) -> Self {
        if error.is_cancelled() {
            return Error::CancelledError;
        }
        Error::RuntimePanicError
    }
}

// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Execution of a single DNS query against a single nameserver.
//!
//! Everything that talks DNS on the wire sits behind [`QueryExecutor`]; the checks only see answer strings or an
//! [`Error`].

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use futures::future::BoxFuture;
use serde::Serialize;

pub use error::Error;
pub use lookup::HickoryExecutor;
pub use query::QueryTarget;

use crate::RecordType;

pub mod error;
pub mod lookup;
pub mod query;

pub type ResolverResult<T> = std::result::Result<T, Error>;

/// Sends one query of `record_type` for `name` to `server` and returns the answers as strings.
///
/// Implementations must be safe to call concurrently; every call is independent and may fail on its own.
pub trait QueryExecutor: Send + Sync {
    fn query<'a>(
        &'a self,
        record_type: RecordType,
        name: &'a str,
        server: &'a str,
    ) -> BoxFuture<'a, ResolverResult<Vec<String>>>;
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize)]
pub enum Protocol {
    Udp,
    Tcp,
}

impl FromStr for Protocol {
    type Err = crate::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "udp" => Ok(Protocol::Udp),
            "tcp" => Ok(Protocol::Tcp),
            _ => Err(crate::Error::ParserError {
                what: s.to_string(),
                to: "Protocol",
                why: "invalid protocol".to_string(),
            }),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Udp => f.write_str("udp"),
            Protocol::Tcp => f.write_str("tcp"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolverOpts {
    /// Number of retries after a failed query
    pub retries: usize,
    pub timeout: Duration,
    pub protocol: Protocol,
    /// Port used for server addresses without explicit port
    pub default_port: u16,
}

impl Default for ResolverOpts {
    fn default() -> Self {
        ResolverOpts {
            retries: 0,
            timeout: Duration::from_secs(5),
            protocol: Protocol::Udp,
            default_port: 53,
        }
    }
}

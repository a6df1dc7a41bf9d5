// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Instant;

use futures::future::BoxFuture;
use futures::FutureExt;
use hickory_resolver::config::{NameServerConfig, ResolverConfig};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::proto::rr::Name;
use hickory_resolver::proto::xfer;
use hickory_resolver::Resolver;
use tracing::{debug, trace};

use crate::resolver::{Error, Protocol, QueryExecutor, ResolverOpts, ResolverResult};
use crate::RecordType;

/// [`QueryExecutor`] sending queries with `hickory-resolver`.
///
/// Every query gets its own resolver configured with exactly one nameserver, so answers are never served from a cache
/// or by a different server.
#[derive(Debug, Clone, Default)]
pub struct HickoryExecutor {
    opts: ResolverOpts,
}

impl HickoryExecutor {
    pub fn new(opts: ResolverOpts) -> HickoryExecutor {
        HickoryExecutor { opts }
    }

    pub fn opts(&self) -> &ResolverOpts {
        &self.opts
    }

    async fn lookup(&self, record_type: RecordType, name: &str, server: &str) -> ResolverResult<Vec<String>> {
        let socket_addr = parse_server(server, self.opts.default_port)?;
        let name = parse_name(name)?;
        let resolver = self.resolver(socket_addr);

        let start_time = Instant::now();
        trace!("Sending query for '{}', record type {} to {}.", name, record_type, socket_addr);
        let result = resolver.lookup(name.clone(), record_type).await;
        let elapsed = Instant::now() - start_time;

        match result {
            Ok(lookup) => {
                let answers: Vec<String> = lookup
                    .iter()
                    .filter(|rdata| rdata.record_type() == record_type)
                    .map(ToString::to_string)
                    .collect();
                debug!(
                    "Lookup for '{}', record type {} from {} returned {} answers within {} ms.",
                    name,
                    record_type,
                    socket_addr,
                    answers.len(),
                    elapsed.as_millis()
                );
                Ok(answers)
            }
            Err(err) if err.is_no_records_found() => {
                debug!(
                    "Lookup for '{}', record type {} from {} returned no records.",
                    name, record_type, socket_addr
                );
                Ok(Vec::new())
            }
            Err(err) => {
                debug!("Lookup error from {}: {}", socket_addr, err);
                Err(Error::ResolveError {
                    reason: err.to_string(),
                })
            }
        }
    }

    fn resolver(&self, socket_addr: SocketAddr) -> Resolver<TokioConnectionProvider> {
        let mut config = ResolverConfig::new();
        config.add_name_server(NameServerConfig::new(socket_addr, self.opts.protocol.into()));

        let mut opts = hickory_resolver::config::ResolverOpts::default();
        opts.attempts = self.opts.retries;
        opts.timeout = self.opts.timeout;
        opts.ndots = 0;

        Resolver::builder_with_config(config, TokioConnectionProvider::default())
            .with_options(opts)
            .build()
    }
}

impl QueryExecutor for HickoryExecutor {
    fn query<'a>(
        &'a self,
        record_type: RecordType,
        name: &'a str,
        server: &'a str,
    ) -> BoxFuture<'a, ResolverResult<Vec<String>>> {
        self.lookup(record_type, name, server).boxed()
    }
}

#[doc(hidden)]
impl From<Protocol> for xfer::Protocol {
    fn from(protocol: Protocol) -> Self {
        match protocol {
            Protocol::Udp => xfer::Protocol::Udp,
            Protocol::Tcp => xfer::Protocol::Tcp,
        }
    }
}

/// Parses `IP`, `IP:PORT`, and `[IPv6]:PORT`; addresses without port use `default_port`.
pub fn parse_server(server: &str, default_port: u16) -> ResolverResult<SocketAddr> {
    let server = server.trim();
    if let Ok(socket_addr) = SocketAddr::from_str(server) {
        return Ok(socket_addr);
    }
    IpAddr::from_str(server)
        .map(|ip_addr| SocketAddr::new(ip_addr, default_port))
        .map_err(|e| Error::InvalidServer {
            server: server.to_string(),
            reason: e.to_string(),
        })
}

/// Parses `name` as fully qualified domain name, so no search domains get appended.
pub fn parse_name(name: &str) -> ResolverResult<Name> {
    let fqdn = if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{}.", name)
    };
    Name::from_str(&fqdn).map_err(|e| Error::InvalidName {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

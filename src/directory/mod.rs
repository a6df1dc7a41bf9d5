// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Directory of public nameservers grouped by provider.
//!
//! The directory is loaded once, either from the nameserver list embedded at build time or from a YAML file with the
//! same layout, and is read-only afterwards.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::resolver::QueryTarget;
use crate::{Error, RecordType, Result};

pub mod load;

/// Nameserver list compiled into the binary.
pub static EMBEDDED_NAMESERVERS: &str = include_str!("nameservers.yaml");

/// Selects which providers of a directory take part in a check.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Serialize)]
pub enum Selection {
    /// Only providers listed as core providers
    #[default]
    Core,
    /// Every provider of the directory
    Full,
}

impl Selection {
    pub fn from_full_scan(full_scan: bool) -> Selection {
        if full_scan {
            Selection::Full
        } else {
            Selection::Core
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Core => f.write_str("core providers"),
            Selection::Full => f.write_str("all providers"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawDirectory {
    #[serde(default)]
    core_providers: Vec<String>,
    #[serde(default)]
    public_nameservers: IndexMap<String, Vec<String>>,
}

/// Immutable mapping of provider names to their nameserver addresses.
///
/// Providers keep the order of their source, so selections and reports are reproducible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderDirectory {
    providers: IndexMap<String, Vec<String>>,
    core_providers: Vec<String>,
}

impl ProviderDirectory {
    /// Creates a directory and checks that every core provider is a known provider.
    pub fn new<T: Into<IndexMap<String, Vec<String>>>, S: Into<String>, C: IntoIterator<Item = S>>(
        providers: T,
        core_providers: C,
    ) -> Result<ProviderDirectory> {
        let providers = providers.into();
        let mut core: Vec<String> = Vec::new();
        for provider in core_providers.into_iter().map(Into::into) {
            if !providers.contains_key(&provider) {
                return Err(Error::UnknownCoreProvider { provider });
            }
            if !core.contains(&provider) {
                core.push(provider);
            }
        }

        Ok(ProviderDirectory {
            providers,
            core_providers: core,
        })
    }

    /// Loads the nameserver list embedded at build time.
    pub fn embedded() -> Result<ProviderDirectory> {
        EMBEDDED_NAMESERVERS.parse()
    }

    pub fn is_core_provider(&self, provider: &str) -> bool {
        self.core_providers.iter().any(|x| x == provider)
    }

    pub fn core_providers(&self) -> &[String] {
        &self.core_providers
    }

    pub fn providers(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.providers.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn servers(&self, provider: &str) -> Option<&[String]> {
        self.providers.get(provider).map(Vec::as_slice)
    }

    /// Returns all `(provider, server)` pairs for `selection` in directory order.
    pub fn pairs(&self, selection: Selection) -> Vec<(&str, &str)> {
        self.providers
            .iter()
            .filter(|(provider, _)| selection == Selection::Full || self.is_core_provider(provider))
            .flat_map(|(provider, servers)| servers.iter().map(move |server| (provider.as_str(), server.as_str())))
            .collect()
    }

    /// Builds one query target per selected `(provider, server)` pair.
    pub fn targets(&self, selection: Selection, record_type: RecordType, name: &str) -> Vec<QueryTarget> {
        let targets: Vec<_> = self
            .pairs(selection)
            .into_iter()
            .map(|(provider, server)| QueryTarget::new(provider, server, record_type, name))
            .collect();
        debug!("Selected {} nameservers of {}.", targets.len(), selection);

        targets
    }

    /// Number of servers over all providers
    pub fn len(&self) -> usize {
        self.providers.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromStr for ProviderDirectory {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let raw: RawDirectory = serde_yaml::from_str(s)?;
        ProviderDirectory::new(raw.public_nameservers, raw.core_providers)
    }
}

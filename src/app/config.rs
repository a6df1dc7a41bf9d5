// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::convert::TryFrom;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;

use crate::app::output::json::JsonOptions;
use crate::app::output::summary::SummaryOptions;
use crate::app::output::{OutputConfig, OutputType};
use crate::check::{Assertion, DispatchOpts, ErrorPolicy};
use crate::directory::Selection;
use crate::resolver::{self, Protocol, ResolverOpts};
use crate::RecordType;

#[derive(Debug)]
pub struct AppConfig {
    /// Set unless only the directory is listed
    pub query: Option<QueryConfig>,
    pub selection: Selection,
    pub assertion: Assertion,
    pub max_concurrent: usize,
    pub timeout: Duration,
    pub retries: usize,
    pub protocol: Protocol,
    pub nameservers_file: Option<String>,
    pub list_nameservers: bool,
    pub quiet: bool,
    pub long: bool,
    pub no_color: bool,
    pub ascii: bool,
    pub verbosity: u8,
    pub output_config: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryConfig {
    pub record_type: RecordType,
    pub domain_name: String,
}

impl AppConfig {
    pub fn resolver_opts(&self) -> ResolverOpts {
        ResolverOpts {
            retries: self.retries,
            timeout: self.timeout,
            protocol: self.protocol,
            ..Default::default()
        }
    }

    pub fn dispatch_opts(&self) -> DispatchOpts {
        DispatchOpts {
            max_concurrent: self.max_concurrent,
        }
    }
}

impl TryFrom<&ArgMatches> for AppConfig {
    type Error = anyhow::Error;

    fn try_from(args: &ArgMatches) -> std::result::Result<Self, Self::Error> {
        let list_nameservers = args.get_flag("list-nameservers");
        let query = if list_nameservers {
            None
        } else {
            Some(parse_query(args)?)
        };

        let output = args
            .get_one::<String>("output")
            .map(|x| OutputType::try_from(x.as_str()).context("failed to parse output type"))
            .unwrap()?; // Safe unwrap, because of clap's default value
        let quiet = args.get_flag("quiet");
        let long = args.get_flag("long");
        let output_config = match output {
            OutputType::Json => OutputConfig::json(JsonOptions::new(true)),
            OutputType::Summary => OutputConfig::summary(SummaryOptions::new(long, true)),
        };

        let config = AppConfig {
            query,
            selection: Selection::from_full_scan(args.get_flag("full-scan")),
            assertion: parse_assertion(args)?,
            max_concurrent: parse_max_concurrent(args)?,
            timeout: args
                .get_one::<String>("timeout")
                .map(|x| humantime::parse_duration(x).context("failed to parse timeout"))
                .unwrap()?, // Safe unwrap, because of clap's default value
            retries: *args.get_one::<usize>("retries").unwrap(), // Safe unwrap, because of clap's default value
            protocol: if args.get_flag("tcp") {
                Protocol::Tcp
            } else {
                Protocol::Udp
            },
            nameservers_file: args.get_one::<String>("nameservers-file").cloned(),
            list_nameservers,
            quiet,
            long,
            no_color: args.get_flag("no-color"),
            ascii: args.get_flag("ascii"),
            verbosity: args.get_count("v"),
            output_config,
        };

        Ok(config)
    }
}

fn parse_query(args: &ArgMatches) -> Result<QueryConfig> {
    let record_type = args
        .get_one::<String>("record type")
        .context("No record type to query specified")?;
    let record_type =
        RecordType::from_str(&record_type.to_uppercase()).with_context(|| format!("invalid record type '{}'", record_type))?;

    let domain_name = args
        .get_one::<String>("domain name")
        .context("No domain name to query specified")?;
    resolver::lookup::parse_name(domain_name).context("failed to parse domain name")?;

    Ok(QueryConfig {
        record_type,
        domain_name: domain_name.to_string(),
    })
}

fn parse_assertion(args: &ArgMatches) -> Result<Assertion> {
    let expected: Vec<&str> = args
        .get_many::<String>("assert")
        .map(|values| values.map(String::as_str).collect())
        .unwrap_or_default();
    let threshold = *args.get_one::<f64>("assert-threshold").unwrap(); // Safe unwrap, because of clap's default value
    let error_policy = if args.get_flag("fail-on-error") {
        ErrorPolicy::Strict
    } else {
        ErrorPolicy::Lenient
    };

    let assertion = Assertion::new(expected, threshold)
        .context("failed to parse assertion")?
        .with_error_policy(error_policy);

    Ok(assertion)
}

fn parse_max_concurrent(args: &ArgMatches) -> Result<usize> {
    let max_concurrent = *args.get_one::<usize>("max-concurrent").unwrap(); // Safe unwrap, because of clap's default value
    if max_concurrent == 0 {
        return Err(anyhow!("max-concurrent must be at least 1"));
    }

    Ok(max_concurrent)
}

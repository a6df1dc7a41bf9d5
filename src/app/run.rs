// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::convert::TryFrom;
use std::env;
use std::ffi::OsString;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use tracing::{debug, info};

use crate::app::cli_parser::create_parser;
use crate::app::config::QueryConfig;
use crate::app::console::{Console, ConsoleOpts};
use crate::app::logging::Logging;
use crate::app::output::{self, styles};
use crate::app::{AppConfig, ExitStatus};
use crate::check::{CheckReport, Dispatcher};
use crate::directory::ProviderDirectory;
use crate::resolver::{HickoryExecutor, QueryTarget};

/// Runs a complete check for the given command line and tells how the process should exit.
pub async fn run<I, T>(args: I) -> ExitStatus
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = match create_parser().try_get_matches_from(args) {
        Ok(args) => args,
        Err(err) => {
            // Help and version are delivered as errors, too
            let status = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitStatus::Ok,
                _ => ExitStatus::CliParsingFailed,
            };
            let _ = err.print();
            return status;
        }
    };

    let app_config = match AppConfig::try_from(&args) {
        Ok(config) => config,
        Err(err) => {
            Console::new(ConsoleOpts::default()).error(format!("{:#}", err));
            return ExitStatus::ConfigParsingFailed;
        }
    };

    if app_config.no_color {
        styles::no_color_mode();
    }
    if app_config.ascii {
        styles::ascii_mode();
    }

    let console = Console::new(ConsoleOpts::from(&app_config));

    let logging = Logging::new(app_config.verbosity, env::var_os("RUST_LOG"), !app_config.no_color);
    if let Err(err) = logging.start() {
        console.error(format!("Failed to start logging: {:#}", err));
        return ExitStatus::UnrecoverableError;
    }
    debug!("Parsed args and set up logging.");

    let directory = match load_directory(&app_config).await {
        Ok(directory) => directory,
        Err(err) => {
            console.error(format!("{:#}", err));
            return ExitStatus::DirectoryLoadFailed;
        }
    };

    let res = if app_config.list_nameservers {
        console.print_nameservers(&directory).map(|_| ExitStatus::Ok)
    } else {
        check(&app_config, &directory, &console).await
    };

    match res {
        Ok(status) => {
            info!("Exiting with {:?}.", status);
            status
        }
        Err(err) => {
            console.error(format!("{:#}", err));
            ExitStatus::UnrecoverableError
        }
    }
}

async fn load_directory(app_config: &AppConfig) -> Result<ProviderDirectory> {
    let directory = match &app_config.nameservers_file {
        Some(path) => ProviderDirectory::from_file(path)
            .await
            .with_context(|| format!("Failed to load nameservers from '{}'", path))?,
        None => ProviderDirectory::embedded().context("Failed to load built-in nameservers")?,
    };
    info!(
        "Loaded {} nameservers of {} core providers.",
        directory.len(),
        directory.core_providers().len()
    );

    Ok(directory)
}

async fn check(app_config: &AppConfig, directory: &ProviderDirectory, console: &Console) -> Result<ExitStatus> {
    let query = app_config
        .query
        .as_ref()
        .context("No record type and domain name to check specified")?;

    Check::init(app_config, query, directory, console)
        .dispatch()
        .await
        .output()
}

pub struct Check {}

impl Check {
    pub fn init<'a>(
        app_config: &'a AppConfig,
        query: &'a QueryConfig,
        directory: &ProviderDirectory,
        console: &'a Console,
    ) -> Queries<'a> {
        let targets = directory.targets(app_config.selection, query.record_type, &query.domain_name);

        console.print_opts(&app_config.dispatch_opts(), &app_config.resolver_opts());
        if targets.is_empty() {
            console.attention(format!("No nameservers to query among {}.", app_config.selection));
        } else {
            console.print_estimates(targets.len(), app_config.selection);
        }

        Queries {
            app_config,
            query,
            console,
            targets,
        }
    }
}

pub struct Queries<'a> {
    app_config: &'a AppConfig,
    query: &'a QueryConfig,
    console: &'a Console,
    targets: Vec<QueryTarget>,
}

impl<'a> Queries<'a> {
    pub async fn dispatch(self) -> Report<'a> {
        let executor = Arc::new(HickoryExecutor::new(self.app_config.resolver_opts()));
        let dispatcher = Dispatcher::new(executor, self.app_config.dispatch_opts());

        info!("Running queries.");
        let start_time = Instant::now();
        let outcomes = dispatcher.dispatch(self.targets, &self.app_config.assertion).await;
        let total_run_time = Instant::now() - start_time;
        info!("Finished queries.");

        let report = CheckReport::new(
            self.query.record_type,
            self.query.domain_name.as_str(),
            self.app_config.selection,
            self.app_config.assertion.clone(),
            outcomes,
        );
        self.console.print_run_time(report.summary(), total_run_time);

        Report {
            app_config: self.app_config,
            report,
        }
    }
}

pub struct Report<'a> {
    app_config: &'a AppConfig,
    report: CheckReport,
}

impl Report<'_> {
    pub fn output(self) -> Result<ExitStatus> {
        if !self.app_config.quiet {
            output::output(&self.app_config.output_config, &self.report)?;
        }

        let summary = self.report.summary();
        info!("{}", summary);

        Ok(ExitStatus::from(summary))
    }
}

// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::fmt;
use std::io::Write;
use std::time::Duration;

use anyhow::{anyhow, Result};
use tabwriter::TabWriter;
use yansi::Paint;

use crate::app::output::styles::{self, ATTENTION, EMPH, ERROR};
use crate::app::output::OutputType;
use crate::app::AppConfig;
use crate::check::{DispatchOpts, RunSummary};
use crate::directory::{ProviderDirectory, Selection};
use crate::resolver::ResolverOpts;

#[derive(Debug, Default)]
pub struct ConsoleOpts {
    quiet: bool,
    /// Progress messages would corrupt machine readable output
    machine_output: bool,
}

impl From<&AppConfig> for ConsoleOpts {
    fn from(app_config: &AppConfig) -> Self {
        ConsoleOpts {
            quiet: app_config.quiet,
            machine_output: app_config.output_config.output_type() == OutputType::Json,
        }
    }
}

#[derive(Debug)]
pub struct Console {
    opts: ConsoleOpts,
}

impl Console {
    pub fn new(opts: ConsoleOpts) -> Console {
        Console { opts }
    }

    pub fn print_opts(&self, dispatch_opts: &DispatchOpts, opts: &ResolverOpts) {
        if self.show_headers() {
            self.caption(options_line(dispatch_opts, opts));
        }
    }

    pub fn print_estimates(&self, num_targets: usize, selection: Selection) {
        if self.show_headers() {
            let nameservers_str = if num_targets == 1 {
                "1 nameserver".to_string()
            } else {
                format!("{} nameservers", num_targets)
            };
            self.info(format!("Sending 1 query to each of {} of {}.", nameservers_str, selection));
        }
    }

    pub fn print_run_time(&self, summary: &RunSummary, run_time: Duration) {
        if self.show_headers() {
            self.info(format!(
                "Received {} outcomes within {} ms of total run time.",
                summary.total,
                run_time.as_millis()
            ));
        }
    }

    pub fn print_nameservers(&self, directory: &ProviderDirectory) -> Result<()> {
        if self.opts.quiet {
            return Ok(());
        }
        self.caption(format!(
            "{} nameservers of {} providers; core providers are marked with '*'.",
            directory.len(),
            directory.providers().count()
        ));
        print!("{}", nameservers_table(directory)?);

        Ok(())
    }

    pub fn caption<T: AsRef<str>>(&self, str: T) {
        println!("{}", format!("{} {}", styles::caption_prefix(), str.as_ref()).paint(EMPH));
    }

    pub fn info<T: AsRef<str>>(&self, str: T) {
        println!("{} {}", styles::info_prefix(), str.as_ref());
    }

    pub fn attention<T: AsRef<str>>(&self, str: T) {
        if self.show_headers() {
            println!("{} {}", styles::attention_prefix().paint(ATTENTION), str.as_ref());
        }
    }

    /// Errors go to stderr and are shown even in quiet mode.
    pub fn error<T: fmt::Display>(&self, err: T) {
        eprintln!("{} {}", styles::error_prefix().paint(ERROR), err);
    }

    fn show_headers(&self) -> bool {
        !self.opts.quiet && !self.opts.machine_output
    }
}

fn options_line(dispatch_opts: &DispatchOpts, opts: &ResolverOpts) -> String {
    format!(
        "{}: concurrent queries={}, retries={}, timeout={}, protocol={}",
        "Options".paint(EMPH),
        dispatch_opts.max_concurrent,
        opts.retries,
        humantime::format_duration(opts.timeout),
        opts.protocol,
    )
}

fn nameservers_table(directory: &ProviderDirectory) -> Result<String> {
    let mut tw = TabWriter::new(vec![]);

    for (provider, servers) in directory.providers() {
        let core = if directory.is_core_provider(provider) { "*" } else { "" };
        for server in servers {
            writeln!(tw, " {} {}\t{}\t{}", styles::itemazation_prefix(), provider, server, core)?;
        }
    }

    let text_buffer = tw
        .into_inner()
        .map_err(|_| anyhow!("failed to finish TabWriter buffer"))?;
    let out = String::from_utf8(text_buffer).map_err(|_| anyhow!("failed to convert TabWriter buffer to output"))?;

    Ok(out)
}

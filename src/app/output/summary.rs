// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use yansi::Paint;

use super::styles::{self, ANSWER_ITEM, ATTENTION, ERROR, OK, PROVIDER, SERVER};
use super::*;
use crate::check::{CheckOutcome, CheckReport, RunSummary};

#[derive(Debug, Default)]
pub struct SummaryOptions {
    /// Show answers even if an assertion decides about success
    long: bool,
    /// Print a final line summarizing the run
    show_run_summary: bool,
}

impl SummaryOptions {
    pub fn new(long: bool, show_run_summary: bool) -> SummaryOptions {
        SummaryOptions {
            long,
            show_run_summary,
        }
    }

    pub fn long(&self) -> bool {
        self.long
    }

    pub fn show_run_summary(&self) -> bool {
        self.show_run_summary
    }
}

#[derive(Debug, Default)]
pub struct SummaryFormat {
    opts: SummaryOptions,
}

impl SummaryFormat {
    pub fn new(opts: SummaryOptions) -> SummaryFormat {
        SummaryFormat { opts }
    }

    pub fn opts(&self) -> &SummaryOptions {
        &self.opts
    }
}

pub trait SummaryFormatter {
    fn output<W: Write>(&self, writer: &mut W, opts: &SummaryOptions) -> Result<()>;
}

impl<T: SummaryFormatter> OutputFormat<T> for SummaryFormat {
    fn output<W: Write>(&self, writer: &mut W, data: &T) -> Result<()> {
        data.output(writer, &self.opts)
    }
}

impl SummaryFormatter for CheckReport {
    fn output<W: Write>(&self, writer: &mut W, opts: &SummaryOptions) -> Result<()> {
        // Without an assertion, the answers are the result.
        let show_answers = opts.long() || !self.assertion().is_configured();

        for outcome in self.outcomes() {
            writeln!(writer, "{}", outcome.render(self.assertion().is_configured()))?;
            if show_answers && !outcome.is_err() {
                for answer in outcome.answers() {
                    writeln!(writer, " {} {}", "-".paint(ANSWER_ITEM), answer)?;
                }
            }
        }

        if opts.show_run_summary() {
            let line = if self.assertion().is_configured() || self.summary().total == 0 {
                render_summary(self.summary())
            } else {
                render_answered(self.outcomes())
            };
            writeln!(writer, "{}", line)?;
        }

        Ok(())
    }
}

/// Without an assertion, a run summary counts the nameservers that answered without error.
fn render_answered(outcomes: &[CheckOutcome]) -> String {
    let answered = outcomes.iter().filter(|x| !x.is_err()).count();
    let (prefix, style) = if answered == outcomes.len() {
        (styles::info_prefix(), OK)
    } else {
        (styles::attention_prefix(), ATTENTION)
    };
    let text = format!("{} of {} nameservers answered", answered, outcomes.len());

    format!("{} {}", prefix, text.paint(style))
}

trait Rendering {
    fn render(&self, asserting: bool) -> String;
}

impl Rendering for CheckOutcome {
    fn render(&self, asserting: bool) -> String {
        let provider = format!("[{}]", self.provider());
        let server = format!("({})", self.server());

        if let Some(err) = self.error() {
            let err = format!("Error: {}", err);
            return format!("{} {} {}", provider.paint(PROVIDER), server.paint(SERVER), err.paint(ERROR));
        }

        let mark = match (asserting, self.assertion_succeeded()) {
            (false, _) => String::new(),
            (true, true) => styles::ok_mark().paint(OK).to_string(),
            (true, false) => styles::failed_mark().paint(ERROR).to_string(),
        };
        format!("{} {} {}", provider.paint(PROVIDER), server.paint(SERVER), mark)
            .trim_end()
            .to_string()
    }
}

fn render_summary(summary: &RunSummary) -> String {
    let style = if summary.passed { OK } else { ERROR };
    let prefix = if summary.passed {
        styles::info_prefix()
    } else {
        styles::attention_prefix()
    };

    format!("{} {}", prefix, summary.to_string().paint(style))
}

// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Fan-out of queries to many nameservers and verification of their answers.

use serde::Serialize;

pub use assertion::{Assertion, ErrorPolicy};
pub use dispatch::{DispatchOpts, Dispatcher};
pub use summary::RunSummary;

use crate::directory::Selection;
use crate::resolver::{self, QueryTarget, ResolverResult};
use crate::RecordType;

pub mod assertion;
pub mod dispatch;
pub mod summary;

/// Result of querying one nameserver.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckOutcome {
    provider: String,
    server: String,
    answers: Vec<String>,
    error: Option<resolver::Error>,
    assertion_succeeded: bool,
}

impl CheckOutcome {
    /// Creates the outcome for `target` from the query `result` and evaluates `assertion` against it.
    pub fn new(target: QueryTarget, result: ResolverResult<Vec<String>>, assertion: &Assertion) -> CheckOutcome {
        let assertion_succeeded = assertion.evaluate(&result);
        let (answers, error) = match result {
            Ok(answers) => (answers, None),
            Err(err) => (Vec::new(), Some(err)),
        };
        let (provider, server) = target.into_provider_server();

        CheckOutcome {
            provider,
            server,
            answers,
            error,
            assertion_succeeded,
        }
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn error(&self) -> Option<&resolver::Error> {
        self.error.as_ref()
    }

    pub fn is_err(&self) -> bool {
        self.error.is_some()
    }

    pub fn assertion_succeeded(&self) -> bool {
        self.assertion_succeeded
    }
}

/// Everything a check run produced, ready to be reported.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    record_type: RecordType,
    name: String,
    selection: Selection,
    assertion: Assertion,
    outcomes: Vec<CheckOutcome>,
    summary: RunSummary,
}

impl CheckReport {
    /// Bundles `outcomes` with the summary computed for the threshold of `assertion`.
    pub fn new<N: Into<String>>(
        record_type: RecordType,
        name: N,
        selection: Selection,
        assertion: Assertion,
        outcomes: Vec<CheckOutcome>,
    ) -> CheckReport {
        let summary = RunSummary::from_outcomes(&outcomes, assertion.threshold());
        CheckReport {
            record_type,
            name: name.into(),
            selection,
            assertion,
            outcomes,
            summary,
        }
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn assertion(&self) -> &Assertion {
        &self.assertion
    }

    pub fn outcomes(&self) -> &[CheckOutcome] {
        &self.outcomes
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }
}

// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use serde::Serialize;

use crate::resolver::ResolverResult;
use crate::{Error, Result};

/// Decides whether a failed query counts as success when no answers are expected.
///
/// With expected answers, a failed query is always a failure.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Serialize)]
pub enum ErrorPolicy {
    /// Failed queries succeed unless answers are expected
    #[default]
    Lenient,
    /// Failed queries always fail
    Strict,
}

/// Expected answers and the share of nameservers that must serve them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assertion {
    expected: Vec<String>,
    threshold: f64,
    error_policy: ErrorPolicy,
}

impl Assertion {
    pub const DEFAULT_THRESHOLD: f64 = 100.0;

    /// Creates an assertion for `expected` answers that must be served by at least `threshold` percent of nameservers.
    ///
    /// Empty values are ignored, so an expectation consisting of only empty strings is no assertion at all.
    pub fn new<I: IntoIterator<Item = S>, S: Into<String>>(expected: I, threshold: f64) -> Result<Assertion> {
        if !(0.0..=100.0).contains(&threshold) {
            return Err(Error::InvalidThreshold { threshold });
        }

        let mut expected: Vec<String> = expected
            .into_iter()
            .map(Into::into)
            .filter(|x: &String| !x.is_empty())
            .collect();
        expected.sort();

        Ok(Assertion {
            expected,
            threshold,
            error_policy: ErrorPolicy::default(),
        })
    }

    /// No expected answers; every answered query succeeds.
    pub fn none() -> Assertion {
        Assertion {
            expected: Vec::new(),
            threshold: Assertion::DEFAULT_THRESHOLD,
            error_policy: ErrorPolicy::default(),
        }
    }

    pub fn with_error_policy(self, error_policy: ErrorPolicy) -> Assertion {
        Assertion { error_policy, ..self }
    }

    pub fn is_configured(&self) -> bool {
        !self.expected.is_empty()
    }

    /// Expected answers in sorted order
    pub fn expected(&self) -> &[String] {
        &self.expected
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn error_policy(&self) -> ErrorPolicy {
        self.error_policy
    }

    /// Checks `answers` against the expected answers.
    ///
    /// The order of answers does not matter, but the answers must equal the expected answers exactly -- neither a
    /// subset nor a superset matches. Strings are compared as is.
    pub fn matches(&self, answers: &[String]) -> bool {
        if !self.is_configured() {
            return true;
        }
        if answers.len() != self.expected.len() {
            return false;
        }

        let mut answers: Vec<&String> = answers.iter().collect();
        answers.sort();
        answers.into_iter().eq(self.expected.iter())
    }

    /// Decides whether the result of a query satisfies this assertion.
    pub fn evaluate(&self, result: &ResolverResult<Vec<String>>) -> bool {
        match result {
            Ok(answers) => self.matches(answers),
            Err(_) if self.is_configured() => false,
            Err(_) => self.error_policy == ErrorPolicy::Lenient,
        }
    }
}

impl Default for Assertion {
    fn default() -> Self {
        Assertion::none()
    }
}

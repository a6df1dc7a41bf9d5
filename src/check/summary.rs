// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::fmt;

use serde::Serialize;

use crate::check::CheckOutcome;

/// Aggregate of all outcomes of a check run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub failures: usize,
    pub pass_percentage: f64,
    pub threshold: f64,
    pub passed: bool,
}

impl RunSummary {
    /// Summarizes `outcomes` and compares the share of succeeded outcomes with `threshold` (inclusive).
    ///
    /// A run without any outcome has a pass percentage of 0 and never passes.
    pub fn from_outcomes(outcomes: &[CheckOutcome], threshold: f64) -> RunSummary {
        let total = outcomes.len();
        let failures = outcomes.iter().filter(|x| !x.assertion_succeeded()).count();

        if total == 0 {
            return RunSummary {
                total,
                failures,
                pass_percentage: 0.0,
                threshold,
                passed: false,
            };
        }

        let pass_percentage = (1.0 - failures as f64 / total as f64) * 100.0;
        RunSummary {
            total,
            failures,
            pass_percentage,
            threshold,
            passed: pass_percentage >= threshold,
        }
    }

    pub fn successes(&self) -> usize {
        self.total - self.failures
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} nameservers passed ({:.1}%, threshold {:.1}%)",
            self.successes(),
            self.total,
            self.pass_percentage,
            self.threshold
        )
    }
}

#[cfg(test)]
mod tests {
    use spectral::prelude::*;

    use super::*;
    use crate::check::Assertion;
    use crate::resolver::{self, QueryTarget};
    use crate::RecordType;

    fn outcome(answers: &[&str], assertion: &Assertion) -> CheckOutcome {
        let target = QueryTarget::new("P", "192.0.2.1", RecordType::A, "example.com");
        CheckOutcome::new(target, Ok(answers.iter().map(ToString::to_string).collect()), assertion)
    }

    fn failed_outcome(assertion: &Assertion) -> CheckOutcome {
        let target = QueryTarget::new("P", "192.0.2.2", RecordType::A, "example.com");
        CheckOutcome::new(target, Err(resolver::Error::RuntimePanicError), assertion)
    }

    #[test]
    fn no_outcomes_never_pass() {
        let summary = RunSummary::from_outcomes(&[], 0.0);

        assert_that(&summary.total).is_equal_to(0);
        assert_that(&summary.failures).is_equal_to(0);
        assert_that(&summary.pass_percentage).is_equal_to(0.0);
        assert_that(&summary.passed).is_false();
    }

    #[test]
    fn single_succeeded_outcome() {
        let assertion = Assertion::new(["10.0.0.1"], 100.0).unwrap();
        let outcomes = vec![outcome(&["10.0.0.1"], &assertion)];

        let summary = RunSummary::from_outcomes(&outcomes, assertion.threshold());

        assert_that(&summary.total).is_equal_to(1);
        assert_that(&summary.failures).is_equal_to(0);
        assert_that(&summary.pass_percentage).is_equal_to(100.0);
        assert_that(&summary.passed).is_true();
    }

    #[test]
    fn single_failed_outcome() {
        let assertion = Assertion::new(["10.0.0.1"], 100.0).unwrap();
        let outcomes = vec![outcome(&["10.0.0.2"], &assertion)];

        let summary = RunSummary::from_outcomes(&outcomes, assertion.threshold());

        assert_that(&summary.failures).is_equal_to(1);
        assert_that(&summary.pass_percentage).is_equal_to(0.0);
        assert_that(&summary.passed).is_false();
    }

    #[test]
    fn failures_are_counted_over_many_outcomes() {
        let assertion = Assertion::new(["10.0.0.1"], 75.0).unwrap();
        let mut outcomes: Vec<_> = (0..6).map(|_| outcome(&["10.0.0.1"], &assertion)).collect();
        outcomes.push(outcome(&["10.0.0.2"], &assertion));
        outcomes.push(failed_outcome(&assertion));

        let summary = RunSummary::from_outcomes(&outcomes, assertion.threshold());

        assert_that(&summary.total).is_equal_to(8);
        assert_that(&summary.failures).is_equal_to(2);
        assert_that(&summary.successes()).is_equal_to(6);
        assert_that(&summary.pass_percentage).is_equal_to(75.0);
        assert_that(&summary.passed).is_true();
    }

    #[test]
    fn below_threshold_fails() {
        let assertion = Assertion::new(["10.0.0.1"], 80.0).unwrap();
        let outcomes = vec![
            outcome(&["10.0.0.1"], &assertion),
            outcome(&["10.0.0.1"], &assertion),
            outcome(&["10.0.0.1"], &assertion),
            failed_outcome(&assertion),
        ];

        let summary = RunSummary::from_outcomes(&outcomes, assertion.threshold());

        assert_that(&summary.pass_percentage).is_equal_to(75.0);
        assert_that(&summary.passed).is_false();
    }

    #[test]
    fn summary_is_independent_of_outcome_order() {
        let assertion = Assertion::new(["10.0.0.1"], 50.0).unwrap();
        let mut outcomes = vec![
            failed_outcome(&assertion),
            outcome(&["10.0.0.1"], &assertion),
            outcome(&["10.0.0.3"], &assertion),
        ];

        let summary = RunSummary::from_outcomes(&outcomes, assertion.threshold());
        outcomes.reverse();
        let reversed = RunSummary::from_outcomes(&outcomes, assertion.threshold());

        assert_that(&reversed).is_equal_to(summary);
    }

    #[test]
    fn display() {
        let summary = RunSummary {
            total: 4,
            failures: 1,
            pass_percentage: 75.0,
            threshold: 50.0,
            passed: true,
        };

        assert_that(&summary.to_string())
            .is_equal_to("3 of 4 nameservers passed (75.0%, threshold 50.0%)".to_string());
    }
}

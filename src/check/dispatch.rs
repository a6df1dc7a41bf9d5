// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tokio::task;
use tracing::{debug, trace, warn};

use crate::check::{Assertion, CheckOutcome};
use crate::resolver::{Error, QueryExecutor, QueryTarget};

#[derive(Debug, Clone)]
pub struct DispatchOpts {
    /// Maximum number of queries in flight
    pub max_concurrent: usize,
}

impl DispatchOpts {
    pub const DEFAULT_MAX_CONCURRENT: usize = 10;
}

impl Default for DispatchOpts {
    fn default() -> Self {
        DispatchOpts {
            max_concurrent: DispatchOpts::DEFAULT_MAX_CONCURRENT,
        }
    }
}

/// Sends every query target to its nameserver and collects one outcome per target.
#[derive(Debug)]
pub struct Dispatcher<E: ?Sized> {
    executor: Arc<E>,
    opts: DispatchOpts,
}

impl<E: QueryExecutor + ?Sized + 'static> Dispatcher<E> {
    pub fn new(executor: Arc<E>, opts: DispatchOpts) -> Self {
        Dispatcher { executor, opts }
    }

    pub fn opts(&self) -> &DispatchOpts {
        &self.opts
    }

    /// Runs one query task per target with at most `max_concurrent` tasks in flight and waits for all of them.
    ///
    /// Failed queries are part of the returned outcomes. Outcomes are in the same order as `targets`, regardless of the
    /// order the queries complete.
    pub async fn dispatch(&self, targets: Vec<QueryTarget>, assertion: &Assertion) -> Vec<CheckOutcome> {
        let max_concurrent = self.opts.max_concurrent.max(1);
        let assertion = Arc::new(assertion.clone());
        debug!(
            "Dispatching {} queries with at most {} in flight.",
            targets.len(),
            max_concurrent
        );

        let mut outcomes: Vec<(usize, CheckOutcome)> = stream::iter(targets.into_iter().enumerate())
            .map(|(index, target)| spawn_check(index, self.executor.clone(), target, assertion.clone()))
            .buffer_unordered(max_concurrent)
            .collect()
            .await;
        outcomes.sort_by_key(|(index, _)| *index);
        debug!("Received {} outcomes.", outcomes.len());

        outcomes.into_iter().map(|(_, outcome)| outcome).collect()
    }
}

async fn spawn_check<E: QueryExecutor + ?Sized + 'static>(
    index: usize,
    executor: Arc<E>,
    target: QueryTarget,
    assertion: Arc<Assertion>,
) -> (usize, CheckOutcome) {
    let fallback = target.clone();
    let outcome = match task::spawn(check(executor, target, assertion.clone())).await {
        Ok(outcome) => outcome,
        // A crashed task must still account for its nameserver.
        Err(err) => {
            warn!("Query task for {} failed: {}", fallback, err);
            CheckOutcome::new(fallback, Err(Error::from(err)), &assertion)
        }
    };

    (index, outcome)
}

async fn check<E: QueryExecutor + ?Sized>(
    executor: Arc<E>,
    target: QueryTarget,
    assertion: Arc<Assertion>,
) -> CheckOutcome {
    trace!("Querying {}.", target);
    let result = executor
        .query(target.record_type(), target.name(), target.server())
        .await;
    let outcome = CheckOutcome::new(target, result, &assertion);
    trace!(
        "Outcome from {} ({}): {}",
        outcome.server(),
        outcome.provider(),
        if outcome.assertion_succeeded() { "ok" } else { "failed" }
    );

    outcome
}

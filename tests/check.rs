use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use indexmap::IndexMap;
use spectral::prelude::*;
use tokio::sync::Semaphore;

use dns_check::app::ExitStatus;
use dns_check::check::{Assertion, CheckReport, DispatchOpts, Dispatcher, RunSummary};
use dns_check::directory::{ProviderDirectory, Selection};
use dns_check::resolver::{self, QueryExecutor, ResolverResult};
use dns_check::RecordType;

/// Counts queries in flight and holds every query until the gate is opened.
struct GatedExecutor {
    gate: Semaphore,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    queries: AtomicUsize,
}

impl GatedExecutor {
    fn closed() -> Self {
        GatedExecutor {
            gate: Semaphore::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            queries: AtomicUsize::new(0),
        }
    }

    fn open(&self, permits: usize) {
        self.gate.add_permits(permits);
    }
}

impl QueryExecutor for GatedExecutor {
    fn query<'a>(&'a self, _: RecordType, _: &'a str, _: &'a str) -> BoxFuture<'a, ResolverResult<Vec<String>>> {
        async move {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(current, Ordering::SeqCst);
            // The permit goes back to the gate when dropped, so one open gate serves every query
            let _permit = self.gate.acquire().await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.queries.fetch_add(1, Ordering::SeqCst);

            Ok(vec!["10.0.0.1".to_string()])
        }
        .boxed()
    }
}

/// Answers from a fixed table and records every server it has been asked.
#[derive(Default)]
struct RecordingExecutor {
    answers: HashMap<String, ResolverResult<Vec<String>>>,
    asked: Mutex<Vec<String>>,
}

impl RecordingExecutor {
    fn answer(mut self, server: &str, answers: &[&str]) -> Self {
        self.answers.insert(
            server.to_string(),
            Ok(answers.iter().map(ToString::to_string).collect()),
        );
        self
    }

    fn error(mut self, server: &str) -> Self {
        self.answers.insert(
            server.to_string(),
            Err(resolver::Error::ResolveError {
                reason: "request timed out".to_string(),
            }),
        );
        self
    }

    fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }
}

impl QueryExecutor for RecordingExecutor {
    fn query<'a>(&'a self, _: RecordType, _: &'a str, server: &'a str) -> BoxFuture<'a, ResolverResult<Vec<String>>> {
        async move {
            self.asked.lock().unwrap().push(server.to_string());
            self.answers.get(server).cloned().unwrap_or_else(|| Ok(Vec::new()))
        }
        .boxed()
    }
}

fn directory(providers: &[(&str, &[&str])], core: &[&str]) -> ProviderDirectory {
    let providers: IndexMap<String, Vec<String>> = providers
        .iter()
        .map(|(provider, servers)| (provider.to_string(), servers.iter().map(ToString::to_string).collect()))
        .collect();
    ProviderDirectory::new(providers, core.iter().copied()).unwrap()
}

async fn run_check<E: QueryExecutor + 'static>(
    executor: Arc<E>,
    directory: &ProviderDirectory,
    selection: Selection,
    assertion: Assertion,
) -> CheckReport {
    let targets = directory.targets(selection, RecordType::A, "www.example.com");
    let dispatcher = Dispatcher::new(executor, DispatchOpts::default());
    let outcomes = dispatcher.dispatch(targets, &assertion).await;

    CheckReport::new(RecordType::A, "www.example.com", selection, assertion, outcomes)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrency_is_bounded() {
    let providers: IndexMap<String, Vec<String>> = (0..100)
        .map(|p| (format!("Provider {}", p), (0..10).map(|s| format!("192.0.{}.{}", p, s)).collect()))
        .collect();
    let directory = ProviderDirectory::new(providers, Vec::<String>::new()).unwrap();
    let targets = directory.targets(Selection::Full, RecordType::A, "www.example.com");
    assert_that(&targets).has_length(1000);

    let executor = Arc::new(GatedExecutor::closed());
    let dispatcher = Dispatcher::new(executor.clone(), DispatchOpts { max_concurrent: 10 });
    let dispatch = tokio::spawn(async move {
        let assertion = Assertion::none();
        dispatcher.dispatch(targets, &assertion).await
    });

    // All slots fill up while the gate is closed.
    for _ in 0..500 {
        if executor.in_flight.load(Ordering::SeqCst) == 10 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_that(&executor.in_flight.load(Ordering::SeqCst)).is_equal_to(10);

    // Blocked queries must not let any further query start.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_that(&executor.in_flight.load(Ordering::SeqCst)).is_equal_to(10);
    assert_that(&executor.max_in_flight.load(Ordering::SeqCst)).is_equal_to(10);
    assert_that(&executor.queries.load(Ordering::SeqCst)).is_equal_to(0);

    executor.open(10);
    let outcomes = dispatch.await.unwrap();

    assert_that(&outcomes).has_length(1000);
    assert_that(&executor.queries.load(Ordering::SeqCst)).is_equal_to(1000);
    assert_that(&executor.in_flight.load(Ordering::SeqCst)).is_equal_to(0);
    assert_that(&executor.max_in_flight.load(Ordering::SeqCst)).is_equal_to(10);
}

#[tokio::test]
async fn core_scan_queries_only_core_providers() {
    let directory = directory(&[("A", &["1.1.1.1"]), ("B", &["8.8.8.8"])], &["A"]);
    let executor = Arc::new(RecordingExecutor::default().answer("1.1.1.1", &["10.0.0.1"]));

    let report = run_check(executor.clone(), &directory, Selection::Core, Assertion::none()).await;

    assert_that(&executor.asked()).is_equal_to(vec!["1.1.1.1".to_string()]);
    assert_that(&report.summary().total).is_equal_to(1);
    assert_that(&report.outcomes()[0].provider()).is_equal_to("A");
}

#[tokio::test]
async fn full_scan_queries_every_nameserver() {
    let directory = directory(&[("A", &["1.1.1.1", "1.0.0.1"]), ("B", &["8.8.8.8"])], &["A"]);
    let executor = Arc::new(RecordingExecutor::default());

    let report = run_check(executor.clone(), &directory, Selection::Full, Assertion::none()).await;

    let mut asked = executor.asked();
    asked.sort();
    assert_that(&asked).is_equal_to(vec![
        "1.0.0.1".to_string(),
        "1.1.1.1".to_string(),
        "8.8.8.8".to_string(),
    ]);
    assert_that(&report.summary().total).is_equal_to(3);
}

#[tokio::test]
async fn error_and_mismatch_both_fail() {
    let directory = directory(&[("A", &["1.1.1.1"]), ("B", &["8.8.8.8"])], &["A", "B"]);
    let executor = Arc::new(
        RecordingExecutor::default()
            .error("1.1.1.1")
            .answer("8.8.8.8", &["10.0.0.2"]),
    );
    let assertion = Assertion::new(["10.0.0.1"], 100.0).unwrap();

    let report = run_check(executor, &directory, Selection::Core, assertion).await;

    let summary = report.summary();
    assert_that(&summary.total).is_equal_to(2);
    assert_that(&summary.failures).is_equal_to(2);
    assert_that(&summary.pass_percentage).is_equal_to(0.0);
    assert_that(&summary.passed).is_false();
    assert_that(&ExitStatus::from(summary).code()).is_equal_to(2);
}

#[tokio::test]
async fn threshold_is_inclusive() {
    let directory = directory(
        &[
            ("A", &["192.0.2.1"]),
            ("B", &["192.0.2.2"]),
            ("C", &["192.0.2.3"]),
            ("D", &["192.0.2.4"]),
        ],
        &["A", "B", "C", "D"],
    );
    let executor = Arc::new(
        RecordingExecutor::default()
            .answer("192.0.2.1", &["10.0.0.1"])
            .answer("192.0.2.2", &["10.0.0.1"])
            .answer("192.0.2.3", &["10.0.0.1", "10.0.0.2"])
            .error("192.0.2.4"),
    );
    let assertion = Assertion::new(["10.0.0.1"], 50.0).unwrap();

    let report = run_check(executor, &directory, Selection::Core, assertion).await;

    let summary = report.summary();
    assert_that(&summary.pass_percentage).is_equal_to(50.0);
    assert_that(&summary.passed).is_true();
    assert_that(&ExitStatus::from(summary).code()).is_equal_to(0);
}

#[tokio::test]
async fn errors_pass_without_assertion_unless_strict() {
    let directory = directory(&[("A", &["1.1.1.1"]), ("B", &["8.8.8.8"])], &["A", "B"]);
    let executor = Arc::new(
        RecordingExecutor::default()
            .error("1.1.1.1")
            .answer("8.8.8.8", &["10.0.0.1"]),
    );

    let lenient = run_check(executor.clone(), &directory, Selection::Core, Assertion::none()).await;
    let strict = run_check(
        executor,
        &directory,
        Selection::Core,
        Assertion::none().with_error_policy(dns_check::check::ErrorPolicy::Strict),
    )
    .await;

    assert_that(&lenient.summary().passed).is_true();
    assert_that(&strict.summary().failures).is_equal_to(1);
    assert_that(&strict.summary().passed).is_false();
}

#[tokio::test]
async fn empty_selection_fails() {
    let directory = directory(&[("A", &["1.1.1.1"])], &[]);
    let executor = Arc::new(RecordingExecutor::default());

    let report = run_check(executor.clone(), &directory, Selection::Core, Assertion::none()).await;

    assert_that(&executor.asked()).is_empty();
    assert_that(report.summary()).is_equal_to(&RunSummary {
        total: 0,
        failures: 0,
        pass_percentage: 0.0,
        threshold: 100.0,
        passed: false,
    });
    assert_that(&ExitStatus::from(report.summary()).code()).is_equal_to(2);
}

// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! dns-check queries a DNS name against a directory of public nameservers and verifies the answers.
//!
//! The library is split into three parts:
//!
//! * [`directory`] holds the nameserver directory, i.e., providers and their server addresses.
//! * [`resolver`] executes a single query against a single nameserver.
//! * [`check`] fans queries out with bounded concurrency, evaluates assertions, and summarizes the run.
//!
//! # Example
//! ```no_run
//! # use std::sync::Arc;
//! # use dns_check::check::{Assertion, Dispatcher, DispatchOpts, RunSummary};
//! # use dns_check::directory::{ProviderDirectory, Selection};
//! # use dns_check::resolver::{HickoryExecutor, ResolverOpts};
//! # use dns_check::RecordType;
//! # #[tokio::main]
//! # async fn main() -> dns_check::Result<()> {
//! let directory = ProviderDirectory::embedded()?;
//! let targets = directory.targets(Selection::Core, RecordType::A, "www.example.com");
//!
//! let assertion = Assertion::new(["93.184.215.14"], 100.0)?;
//! let dispatcher = Dispatcher::new(Arc::new(HickoryExecutor::new(ResolverOpts::default())), DispatchOpts::default());
//! let outcomes = dispatcher.dispatch(targets, &assertion).await;
//!
//! let summary = RunSummary::from_outcomes(&outcomes, assertion.threshold());
//! println!("{}", summary);
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "app-cli")]
pub mod app;
pub mod check;
pub mod directory;
pub mod error;
pub mod resolver;

pub use error::Error;
pub use hickory_resolver::proto::rr::RecordType;

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    pub mod logging {
        use std::sync::Once;

        use tracing::subscriber::set_global_default;
        use tracing_log::LogTracer;
        use tracing_subscriber::fmt;
        use tracing_subscriber::layer::SubscriberExt;
        use tracing_subscriber::EnvFilter;

        static LOGGING: Once = Once::new();

        pub fn init() {
            LOGGING.call_once(|| {
                // Subscribe to all log crate log messages and transform them to a tracing events
                LogTracer::init().expect("failed to init logging for testing");

                let filter = if std::env::var_os("RUST_LOG").is_some() {
                    // This is controlled by the env variable RUST_LOG
                    EnvFilter::from_default_env()
                } else {
                    // If RUST_LOG is not set
                    EnvFilter::new(format!("{}=info", env!("CARGO_CRATE_NAME")))
                };

                let fmt = fmt::layer()
                    .with_test_writer()
                    .with_ansi(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_target(false);

                let registry = tracing_subscriber::registry().with(filter).with(fmt);
                set_global_default(registry).expect("failed to init tracing for testing");
            });
        }
    }
}

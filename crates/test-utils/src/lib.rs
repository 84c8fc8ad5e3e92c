//! Shared fixtures for genomedag's integration tests: dataset builders, a
//! scriptable dispatch engine and tracing setup.

pub mod builders;
pub mod fake_engine;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use genomedag::logging::{resolve_directives, LOG_ENV};
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Route genomedag's tracing output into the test harness.
///
/// Uses the same `GENOMEDAG_LOG` directives as the binary, e.g.
/// `GENOMEDAG_LOG=genomedag::exec=debug cargo test --test local_engine`.
/// Output is captured per test and shown only for failures unless run with
/// `-- --nocapture`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let env = std::env::var(LOG_ENV).ok();
        let filter = EnvFilter::try_new(resolve_directives(None, env.as_deref()))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Bound a driver or engine future so a wait loop that never drains fails
/// the test instead of hanging it.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    tokio::time::timeout(Duration::from_secs(10), f)
        .await
        .expect("driver or engine did not finish within 10 seconds")
}

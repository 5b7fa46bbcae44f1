//! Tracing initialization, adapted from the teacher's `logging.rs`.
//!
//! The teacher rotates file appenders per deployment tier; this service has
//! no file-logging requirement (spec §1 calls cosmetic logging out of
//! scope), so it keeps only the piece that matters for an ambient stack:
//! structured, non-blocking stdout logging with an env-driven filter and an
//! optional JSON layer.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Initializes the global tracing subscriber. The returned guard must be
/// held for the lifetime of `main` — dropping it flushes the non-blocking
/// writer and stops further log delivery.
pub fn init_logging(json: bool) -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        registry
            .with(fmt::layer().json().with_writer(writer))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(writer)).init();
    }

    guard
}

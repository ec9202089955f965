//! Diagnostic logging to stderr.
//!
//! Progress lines and the failure message meant for the person watching the
//! launch go through `println!`/`eprintln!`. Events here are for debugging,
//! filtered by `RUST_LOG` and quiet by default.

use std::io::IsTerminal;
use std::sync::OnceLock;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

const DEFAULT_FILTER: &str = "warn";

pub fn init_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(true)
                .with_level(true)
                .with_filter(filter),
        );

        // another subscriber may already be installed (tests)
        if subscriber.try_init().is_err() {
            tracing::debug!("tracing subscriber already initialized");
        }
    });
}

//! Logging setup and JSONL diagnostics.
//!
//! Console output goes through `tracing_subscriber::fmt`. When
//! `CLINICDESK_LOGS_DIR` is set, every event is also appended to a
//! per-session JSONL file; that file is where the underlying causes of media
//! failures end up, since the UI only ever shows the generic message.
//!
//! ```text
//! logs/
//! └── raw/
//!     ├── 2026-10-19_desk-01J9....jsonl
//!     └── 2026-10-19_cli-01J9....jsonl
//! ```
//!
//! ```bash
//! # Every failed load with its cause
//! jq 'select(.msg == "Failed to load media") | .fields' logs/raw/*.jsonl
//! ```

pub mod entry;
pub mod layer;

pub use entry::JsonLogEntry;
pub use layer::{JsonlLayer, SessionLogWriter};

use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Environment variable enabling the JSONL diagnostics file
pub const LOGS_DIR_ENV: &str = "CLINICDESK_LOGS_DIR";

/// Map a `-v` count to a default filter.
pub fn verbosity_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. `RUST_LOG` overrides `default_filter`.
///
/// Falls back to console-only logging if the JSONL file cannot be opened.
pub fn init(default_filter: &str, session: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let jsonl = std::env::var(LOGS_DIR_ENV)
        .ok()
        .map(|dir| (JsonlLayer::new(&dir, session), dir));

    match jsonl {
        Some((Ok(layer), dir)) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .with(tracing_subscriber::fmt::layer().with_target(false))
                .init();
            tracing::info!(logs_dir = %dir, session, "JSONL diagnostics enabled");
        }
        Some((Err(e), dir)) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .init();
            tracing::warn!(logs_dir = %dir, "Failed to initialize JSONL logging: {}", e);
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .init();
        }
    }
}

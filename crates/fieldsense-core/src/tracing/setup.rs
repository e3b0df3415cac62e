//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter.
pub const LOG_ENV_VAR: &str = "FIELDSENSE_LOG";

/// Filter used when `FIELDSENSE_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "fieldsense=info";

/// Initialize the Fieldsense tracing/logging system.
///
/// Reads `FIELDSENSE_LOG` for per-crate log levels, e.g.
/// `FIELDSENSE_LOG=fieldsense_analysis=debug,fieldsense_storage=warn`.
///
/// Idempotent.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        // A subscriber installed elsewhere (e.g. by a test harness) wins.
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::AppError;

/// Default filter when `RUST_LOG` is unset: our own events at info, the HTTP
/// client quieter.
pub const DEFAULT_FILTER: &str = "info,ledger_backend=info,reqwest=warn,hyper=warn";

/// Installs the process-wide JSON subscriber.
///
/// Fails if a global subscriber is already set.
pub fn init_tracing() -> Result<(), AppError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_ansi(false)
        .json()
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| AppError::config(format!("tracing already initialised: {e}")))
}

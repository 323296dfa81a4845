//! Test logging shared by the ledger backend's unit and integration tests.
//!
//! `TEST_LOG` (or `RUST_LOG`) picks the filter, default `"warn"`. Set
//! `TEST_LOG_FORMAT=json` to get the same flattened JSON lines the service
//! emits in production, e.g.
//! `TEST_LOG=ledger_backend=debug TEST_LOG_FORMAT=json cargo test settle`.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

fn filter() -> EnvFilter {
    std::env::var("TEST_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

fn wants_json() -> bool {
    std::env::var("TEST_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"))
}

/// Installs the test subscriber once per process; later calls are no-ops,
/// as is losing the race to another global subscriber.
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let builder = fmt()
            .with_env_filter(filter())
            .with_test_writer()
            .without_time()
            .with_target(true);

        if wants_json() {
            builder.json().flatten_event(true).try_init().ok();
        } else {
            builder.try_init().ok();
        }
    });
}

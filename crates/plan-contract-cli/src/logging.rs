// crates/plan-contract-cli/src/logging.rs
// ============================================================================
// Module: CLI Logging
// Description: Global tracing subscriber for the plan-contract binary.
// Purpose: Route library events to stderr as text or JSON lines.
// Dependencies: tracing-subscriber
// ============================================================================

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub(crate) const DEFAULT_LOG_FILTER: &str = "warn,plan_contract_core=info,plan_contract=info";

/// Builds the filter, preferring `RUST_LOG`.
pub(crate) fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Installs the global subscriber; events go to stderr so stdout stays parseable.
///
/// # Errors
///
/// Returns a message when a global subscriber is already installed.
pub(crate) fn init_logging(json: bool) -> Result<(), String> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(std::io::stderr)
        .with_target(false);
    let result = if json { builder.json().try_init() } else { builder.try_init() };
    result.map_err(|err| format!("failed to install log subscriber: {err}"))
}

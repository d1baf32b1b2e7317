use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use crate::config::ObservabilityConfig;

/// Initialize structured logging for the console. JSON output is opt-in
/// through configuration so interactive sessions stay readable; RUST_LOG
/// overrides the configured level either way.
pub fn init_telemetry(observability: &ObservabilityConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(observability.log_level.clone()));

    if observability.json_logs {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true),
            )
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .with(filter)
            .init();
    }

    tracing::debug!("telemetry initialized");
    Ok(())
}

/// Generate a correlation ID for linking the calls of one workflow run.
pub fn generate_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Create a span with common fulfillment workflow attributes.
pub fn create_fulfillment_span(
    operation: &str,
    order_code: Option<&str>,
    correlation_id: &str,
) -> tracing::Span {
    tracing::info_span!(
        "fulfillment",
        operation = operation,
        order.code = order_code,
        correlation.id = correlation_id,
    )
}

/// Shutdown telemetry gracefully.
pub fn shutdown_telemetry() {
    tracing::debug!("telemetry shutdown complete");
}

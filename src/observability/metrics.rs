//! Metrics collection and exposition.
//!
//! # Metrics
//! - `galera_health_probes_total` (counter): probes by verdict and stage
//! - `galera_health_probe_duration_seconds` (histogram): probe latency
//!
//! Recording is a no-op until a recorder is installed, so probes never
//! depend on the exporter being enabled.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::health::ProbeOutcome;

pub const PROBES_TOTAL: &str = "galera_health_probes_total";
pub const PROBE_DURATION_SECONDS: &str = "galera_health_probe_duration_seconds";

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_probe(outcome: &ProbeOutcome, start: Instant) {
    let healthy = if outcome.verdict.healthy { "true" } else { "false" };

    metrics::counter!(
        PROBES_TOTAL,
        "healthy" => healthy,
        "stage" => outcome.stage.as_str()
    )
    .increment(1);

    metrics::histogram!(PROBE_DURATION_SECONDS).record(start.elapsed().as_secs_f64());
}

//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the database pool from validated configuration
//! - Check database connectivity (warning only)
//! - Start the metrics exporter when enabled
//! - Bind the probe listener
//!
//! # Design Decisions
//! - Fail fast on anything that prevents serving (bind, metrics exporter)
//! - An unreachable database is not fatal: probes report it as unhealthy
//! - Listener binds last so traffic only arrives when ready

use tokio::net::TcpListener;

use crate::config::HealthConfig;
use crate::health::MySqlSource;
use crate::observability::metrics;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
}

/// Everything the server needs once startup has succeeded.
pub struct Started {
    pub source: MySqlSource,
    pub listener: TcpListener,
}

pub async fn start(config: &HealthConfig) -> Result<Started, StartupError> {
    let source = MySqlSource::connect_lazy(&config.db);

    match source.ping().await {
        Ok(()) => tracing::info!(
            db_host = %config.db.host,
            db_port = config.db.port,
            "Database reachable"
        ),
        Err(e) => tracing::warn!(
            db_host = %config.db.host,
            db_port = config.db.port,
            error = %e,
            "Could not connect to database"
        ),
    }

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address)?;
    }

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    Ok(Started { source, listener })
}

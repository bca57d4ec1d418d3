//! Galera Cluster health adapter.
//!
//! Translates a node's wsrep status variables into an HTTP verdict for
//! load balancers and orchestration probes.
//!
//! # Architecture Overview
//!
//! ```text
//!     Probe (any method, any path)
//!     ───────────────────────────▶ http::server ──▶ health::probe
//!                                                      │
//!                                      pooled conn ◀───┤ health::reader
//!                                    4 status queries  │   (sqlx / MySQL)
//!                                                      ▼
//!                                              health::evaluator
//!                                                      │
//!     200 "synced" / 503 "not ready"  ◀────────────────┘
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use galera_health::config::{load_config, ConfigOverrides};
use galera_health::lifecycle::{self, drain_with_deadline, Shutdown};
use galera_health::observability::logging;
use galera_health::ProbeServer;

#[derive(Parser)]
#[command(name = "galera-health")]
#[command(version, about = "HTTP health check for Galera Cluster nodes", long_about = None)]
struct Cli {
    /// TOML config file
    #[arg(short, long, default_value = "/etc/default/galera-health")]
    config: PathBuf,

    /// IP used for listening, leave empty for all available IP addresses
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Port used for listening
    #[arg(short, long)]
    port: Option<u16>,

    /// Database host
    #[arg(long)]
    db_host: Option<String>,

    /// Database port
    #[arg(long)]
    db_port: Option<u16>,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            host: self.host.clone(),
            port: self.port,
            db_host: self.db_host.clone(),
            db_port: self.db_port,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config, &cli.overrides())?;
    logging::init_logging(&config.observability.log_level, cli.verbose);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %cli.config.display(),
        "galera-health starting"
    );
    tracing::debug!(
        host = %config.host,
        port = config.port,
        db_host = %config.db.host,
        db_port = config.db.port,
        db_username = %config.db.username,
        available_when_donor = config.available_when_donor,
        "Configuration loaded"
    );

    let started = lifecycle::start(&config).await?;
    let source = started.source.clone();

    let shutdown = Shutdown::new();
    let server = ProbeServer::new(&config, started.source);
    let mut server_task = tokio::spawn(server.run(started.listener, shutdown.subscribe()));

    tokio::select! {
        _ = lifecycle::wait_for_signal() => {}
        result = &mut server_task => {
            // Server exited on its own: nothing left to drain.
            source.close().await;
            result??;
            return Ok(());
        }
    }

    tracing::info!("Shutting down server...");
    shutdown.trigger();

    let deadline = Duration::from_secs(config.timeouts.shutdown_secs);
    if !drain_with_deadline(&mut server_task, deadline).await {
        server_task.abort();
        tracing::warn!("Server forced to shutdown");
    }

    tracing::info!(open_connections = source.pool_size(), "Closing database connection pool");
    source.close().await;

    tracing::info!("Server gracefully stopped");
    Ok(())
}

//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the health
//! adapter. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use crate::health::Policy;

/// Root configuration for the health adapter.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Listen host. Empty means all interfaces.
    pub host: String,

    /// Listen port for the probe endpoint.
    pub port: u16,

    /// Report the donor/desynced state as healthy.
    pub available_when_donor: bool,

    /// Database connection settings.
    pub db: DbConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 33060,
            available_when_donor: true,
            db: DbConfig::default(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl HealthConfig {
    /// Address the probe listener binds to (e.g., "0.0.0.0:33060").
    pub fn bind_address(&self) -> String {
        let host = self.host.trim();
        if host.is_empty() {
            format!("0.0.0.0:{}", self.port)
        } else if host.contains(':') && !host.starts_with('[') {
            format!("[{}]:{}", host, self.port)
        } else {
            format!("{}:{}", host, self.port)
        }
    }

    /// Donor policy handed to the probe handler.
    pub fn policy(&self) -> Policy {
        Policy {
            available_when_donor: self.available_when_donor,
        }
    }
}

/// Database connection and pool configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DbConfig {
    /// Database host.
    pub host: String,

    /// Database port.
    pub port: u16,

    /// Monitoring user.
    pub username: String,

    /// Monitoring user password.
    pub password: String,

    /// Upper bound on pooled connections.
    pub max_connections: u32,

    /// Connections older than this are closed and replaced.
    pub max_lifetime_secs: u64,

    /// Idle connections are reaped after this long.
    pub idle_timeout_secs: u64,

    /// Maximum time to wait for a pooled connection.
    pub acquire_timeout_secs: u64,

    /// Maximum time for a single status query.
    pub query_timeout_secs: u64,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            username: "monitoring".to_string(),
            password: String::new(),
            max_connections: 10,
            max_lifetime_secs: 180,
            idle_timeout_secs: 60,
            acquire_timeout_secs: 3,
            query_timeout_secs: 5,
        }
    }
}

impl DbConfig {
    pub fn max_lifetime(&self) -> Duration {
        Duration::from_secs(self.max_lifetime_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }
}

/// Timeout configuration for the probe server.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline for one probe, connection acquisition included, in seconds.
    pub request_secs: u64,

    /// Drain deadline for in-flight probes on shutdown, in seconds.
    pub shutdown_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 10,
            shutdown_secs: 15,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address, parsed when the file is loaded.
    pub metrics_address: SocketAddr,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: SocketAddr::from((Ipv4Addr::LOCALHOST, 9104)),
        }
    }
}

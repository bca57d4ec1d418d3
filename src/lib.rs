//! Galera Cluster health adapter library.

pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::HealthConfig;
pub use health::{evaluate, Policy, StatusSnapshot, Verdict};
pub use http::ProbeServer;
pub use lifecycle::Shutdown;

//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Probe handler / server produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (probe counters and latency histogram)
//!
//! Consumers:
//!     → stdout (log collection)
//!     → Prometheus scrape endpoint (optional)
//! ```

pub mod logging;
pub mod metrics;

//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Build pool → Ping → Bind listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain probes → Close pool → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered shutdown: the pool outlives every in-flight probe
//! - Drain has a deadline: forced exit afterwards

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{drain_with_deadline, recv_shutdown, Shutdown};
pub use signals::wait_for_signal;
pub use startup::{start, Started, StartupError};

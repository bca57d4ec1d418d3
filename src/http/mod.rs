//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, any method, any path)
//!     → ProbeHandler::probe (bounded by request deadline)
//!     → Verdict → 200/503 with reason body
//! ```

pub mod server;

pub use server::{status_code, verdict_response, AppState, ProbeServer, PROBE_TIMED_OUT};

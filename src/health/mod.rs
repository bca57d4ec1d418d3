//! Health evaluation subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound probe (probe.rs):
//!     → acquire pooled connection (reader.rs)
//!     → four status queries → StatusSnapshot (status.rs)
//!     → assess(snapshot) → Assessment → verdict(policy) → Verdict (evaluator.rs)
//!
//! Failures (failure.rs):
//!     driver error → QueryFailure { kind, message } → verdict reason
//! ```
//!
//! # Design Decisions
//! - Evaluation is a pure function; all I/O lives in reader.rs
//! - "Variable missing" and "query failed" are distinct outcomes
//! - Snapshots are never cached between probes

pub mod evaluator;
pub mod failure;
pub mod probe;
pub mod reader;
pub mod status;

pub use evaluator::{assess, evaluate, Assessment, Policy, Verdict};
pub use failure::{FailureKind, QueryFailure};
pub use probe::{ProbeHandler, ProbeOutcome, ProbeStage};
pub use reader::{read_snapshot, MySqlSession, MySqlSource, StatusReader, StatusSource};
pub use status::{NodeState, StatusSnapshot, StatusValue, StatusVariable};

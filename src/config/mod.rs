//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → command-line overrides (flags win over the file)
//!     → validation.rs (semantic checks)
//!     → HealthConfig (validated, immutable)
//!     → Policy + DbConfig handed to subsystems at construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no process-wide mutable state
//! - All fields have defaults to allow minimal configs
//! - Missing database credentials are fatal at startup

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError, ConfigOverrides};
pub use schema::{DbConfig, HealthConfig, ObservabilityConfig, TimeoutConfig};
pub use validation::{validate_config, ValidationError};

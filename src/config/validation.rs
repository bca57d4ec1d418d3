//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Require database credentials before anything starts serving
//! - Validate value ranges (timeouts > 0, ports valid)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: HealthConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use crate::config::schema::HealthConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    Missing(&'static str),
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &HealthConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.db.host.trim().is_empty() {
        errors.push(ValidationError::Missing("db.host"));
    }
    if config.db.username.trim().is_empty() {
        errors.push(ValidationError::Missing("db.username"));
    }
    if config.db.password.is_empty() {
        errors.push(ValidationError::Missing("db.password"));
    }

    if config.port == 0 {
        errors.push(ValidationError::Zero("port"));
    }
    if config.db.port == 0 {
        errors.push(ValidationError::Zero("db.port"));
    }
    if config.db.max_connections == 0 {
        errors.push(ValidationError::Zero("db.max_connections"));
    }
    if config.db.acquire_timeout_secs == 0 {
        errors.push(ValidationError::Zero("db.acquire_timeout_secs"));
    }
    if config.db.query_timeout_secs == 0 {
        errors.push(ValidationError::Zero("db.query_timeout_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

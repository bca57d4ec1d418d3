//! Query failure classification.
//!
//! Every database-layer failure other than "variable does not exist" lands
//! here. Classification is structured where the driver exposes enough
//! information and falls back to text matching otherwise.

use std::fmt;
use std::io::ErrorKind;
use std::time::Duration;

/// Canonical reason reported for refused connections.
pub const CONNECTION_REFUSED: &str = "connection refused";

/// Broad category of a query failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    ConnectionRefused,
    Timeout,
    Authentication,
    Protocol,
    Transport,
    /// The variable exists but its value could not be interpreted.
    InvalidValue,
    Other,
}

impl FailureKind {
    /// Fallback for failures the driver gives no structure for.
    fn from_message(message: &str) -> Self {
        if message.to_ascii_lowercase().contains(CONNECTION_REFUSED) {
            FailureKind::ConnectionRefused
        } else {
            FailureKind::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::ConnectionRefused => "connection_refused",
            FailureKind::Timeout => "timeout",
            FailureKind::Authentication => "authentication",
            FailureKind::Protocol => "protocol",
            FailureKind::Transport => "transport",
            FailureKind::InvalidValue => "invalid_value",
            FailureKind::Other => "other",
        }
    }
}

/// A failed status query or connection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl QueryFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Classify a bare error message.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: FailureKind::from_message(&message),
            message,
        }
    }

    pub fn timeout(what: &str, after: Duration) -> Self {
        Self::new(
            FailureKind::Timeout,
            format!("{} timed out after {}s", what, after.as_secs_f64()),
        )
    }

    pub fn invalid_value(variable: &str, value: &str) -> Self {
        Self::new(
            FailureKind::InvalidValue,
            format!("invalid value for {}: '{}'", variable, value),
        )
    }

    /// Text reported to the prober for this failure.
    pub fn reason(&self) -> String {
        match self.kind {
            FailureKind::ConnectionRefused => CONNECTION_REFUSED.to_string(),
            _ => self.message.clone(),
        }
    }
}

impl fmt::Display for QueryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for QueryFailure {}

impl From<sqlx::Error> for QueryFailure {
    fn from(err: sqlx::Error) -> Self {
        let message = err.to_string();
        let kind = match &err {
            sqlx::Error::Io(io) => match io.kind() {
                ErrorKind::ConnectionRefused => FailureKind::ConnectionRefused,
                ErrorKind::TimedOut => FailureKind::Timeout,
                _ => FailureKind::from_message(&message),
            },
            sqlx::Error::PoolTimedOut => FailureKind::Timeout,
            sqlx::Error::Tls(_) => FailureKind::Transport,
            sqlx::Error::Protocol(_) => FailureKind::Protocol,
            // SQLSTATE 28000: invalid authorization specification
            sqlx::Error::Database(db) if db.code().as_deref() == Some("28000") => {
                FailureKind::Authentication
            }
            _ => FailureKind::from_message(&message),
        };
        Self { kind, message }
    }
}

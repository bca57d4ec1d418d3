//! Replication status variables and the per-probe snapshot.

use std::fmt;

use crate::health::failure::QueryFailure;

/// The four replication status variables a probe inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusVariable {
    WsrepOn,
    WsrepReady,
    WsrepConnected,
    WsrepLocalState,
}

impl StatusVariable {
    /// Query order used by every probe.
    pub const ALL: [StatusVariable; 4] = [
        StatusVariable::WsrepOn,
        StatusVariable::WsrepReady,
        StatusVariable::WsrepConnected,
        StatusVariable::WsrepLocalState,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StatusVariable::WsrepOn => "wsrep_on",
            StatusVariable::WsrepReady => "wsrep_ready",
            StatusVariable::WsrepConnected => "wsrep_connected",
            StatusVariable::WsrepLocalState => "wsrep_local_state",
        }
    }

    /// Statement returning a single `(Variable_name, Value)` row, or none
    /// when the engine does not know the variable.
    pub fn query(&self) -> &'static str {
        match self {
            StatusVariable::WsrepOn => "SHOW VARIABLES LIKE 'wsrep_on'",
            StatusVariable::WsrepReady => "SHOW STATUS LIKE 'wsrep_ready'",
            StatusVariable::WsrepConnected => "SHOW STATUS LIKE 'wsrep_connected'",
            StatusVariable::WsrepLocalState => "SHOW STATUS LIKE 'wsrep_local_state'",
        }
    }
}

impl fmt::Display for StatusVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of reading one status variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusValue<T> {
    Present(T),
    /// The engine does not define the variable.
    Absent,
    Failed(QueryFailure),
}

impl<T> StatusValue<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, StatusValue::Absent)
    }

    pub fn failure(&self) -> Option<&QueryFailure> {
        match self {
            StatusValue::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn present(&self) -> Option<&T> {
        match self {
            StatusValue::Present(value) => Some(value),
            _ => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for StatusValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusValue::Present(value) => write!(f, "{}", value),
            StatusValue::Absent => f.write_str("<absent>"),
            StatusValue::Failed(failure) => write!(f, "<error: {}>", failure),
        }
    }
}

/// Inputs to one evaluation. Built fresh for every probe and never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub wsrep_on: StatusValue<String>,
    pub ready: StatusValue<String>,
    pub connected: StatusValue<String>,
    pub local_state: StatusValue<i64>,
}

/// Local replication state reported by `wsrep_local_state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Joining,
    DonorDesynced,
    Joined,
    Synced,
    Unrecognized(i64),
}

impl NodeState {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => NodeState::Joining,
            2 => NodeState::DonorDesynced,
            3 => NodeState::Joined,
            4 => NodeState::Synced,
            other => NodeState::Unrecognized(other),
        }
    }
}

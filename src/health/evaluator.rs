//! Health evaluation.
//!
//! Pure decision function over a [`StatusSnapshot`]. Checks run in a fixed
//! order and the first one that resolves produces the verdict:
//!
//! ```text
//! wsrep_on absent / failed   → unhealthy
//! wsrep_on = off             → healthy ("not a cluster node")
//! ready/connected/state absent  → unhealthy ("<variable> not set")
//! ready/connected/state failed  → unhealthy (failure reason)
//! ready = off                → unhealthy ("not ready")
//! connected = off            → unhealthy ("not connected")
//! local state                → per NodeState, donor subject to Policy
//! ```
//!
//! A node with replication disabled is classified before the dependent
//! variables are looked at, since a standalone server does not define them.

use crate::health::failure::QueryFailure;
use crate::health::status::{NodeState, StatusSnapshot, StatusValue, StatusVariable};

/// Operator policy applied during evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    /// Count the donor/desynced state as healthy.
    pub available_when_donor: bool,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            available_when_donor: true,
        }
    }
}

/// Binary health outcome plus its diagnostic reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub healthy: bool,
    pub reason: String,
}

impl Verdict {
    pub fn healthy(reason: impl Into<String>) -> Self {
        Self {
            healthy: true,
            reason: reason.into(),
        }
    }

    pub fn unhealthy(reason: impl Into<String>) -> Self {
        Self {
            healthy: false,
            reason: reason.into(),
        }
    }
}

fn is_off(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("off")
}

/// What a snapshot says about the node, before policy is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assessment {
    /// Replication is disabled.
    Standalone,
    /// The variable is not defined by the engine.
    NotSet(StatusVariable),
    /// Reading a status variable failed.
    Failed(QueryFailure),
    NotReady,
    NotConnected,
    /// Ready and connected; health follows the local state.
    State(NodeState),
}

impl Assessment {
    /// Apply `policy` to produce the verdict served to callers.
    pub fn verdict(&self, policy: Policy) -> Verdict {
        match self {
            Assessment::Standalone => Verdict::healthy("not a cluster node"),
            Assessment::NotSet(variable) => {
                Verdict::unhealthy(format!("{} not set", variable.name()))
            }
            Assessment::Failed(failure) => Verdict::unhealthy(failure.reason()),
            Assessment::NotReady => Verdict::unhealthy("not ready"),
            Assessment::NotConnected => Verdict::unhealthy("not connected"),
            Assessment::State(NodeState::Joining) => Verdict::unhealthy("joining"),
            Assessment::State(NodeState::DonorDesynced) => Verdict {
                healthy: policy.available_when_donor,
                reason: "donor".to_string(),
            },
            Assessment::State(NodeState::Joined) => Verdict::unhealthy("joined"),
            Assessment::State(NodeState::Synced) => Verdict::healthy("synced"),
            Assessment::State(NodeState::Unrecognized(code)) => {
                Verdict::unhealthy(format!("unrecognized state: {}", code))
            }
        }
    }
}

/// Run the ordered checks over a snapshot.
pub fn assess(snapshot: &StatusSnapshot) -> Assessment {
    use StatusValue::{Absent, Failed, Present};

    match &snapshot.wsrep_on {
        Absent => return Assessment::NotSet(StatusVariable::WsrepOn),
        Failed(failure) => return Assessment::Failed(failure.clone()),
        Present(value) if is_off(value) => return Assessment::Standalone,
        Present(_) => {}
    }

    // Every absence outranks every failure; within each, variables keep
    // their query order.
    match (&snapshot.ready, &snapshot.connected, &snapshot.local_state) {
        (Absent, _, _) => Assessment::NotSet(StatusVariable::WsrepReady),
        (_, Absent, _) => Assessment::NotSet(StatusVariable::WsrepConnected),
        (_, _, Absent) => Assessment::NotSet(StatusVariable::WsrepLocalState),
        (Failed(failure), _, _) | (_, Failed(failure), _) | (_, _, Failed(failure)) => {
            Assessment::Failed(failure.clone())
        }
        (Present(ready), _, _) if is_off(ready) => Assessment::NotReady,
        (_, Present(connected), _) if is_off(connected) => Assessment::NotConnected,
        (Present(_), Present(_), Present(code)) => Assessment::State(NodeState::from_code(*code)),
    }
}

/// Classify a snapshot under the given policy.
pub fn evaluate(snapshot: &StatusSnapshot, policy: Policy) -> Verdict {
    assess(snapshot).verdict(policy)
}

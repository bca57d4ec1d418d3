//! Probe orchestration.
//!
//! # States
//! ```text
//! START → CONNECTING ──(acquire failed)──────────────→ RESPONDED
//!              └──→ QUERYING → EVALUATED ────────────→ RESPONDED
//! ```
//!
//! Each probe runs the machine to completion on its own; nothing is retried
//! and nothing is carried over between probes.

use crate::health::evaluator::{assess, Assessment, Policy, Verdict};
use crate::health::reader::{read_snapshot, StatusSource};
use crate::health::status::NodeState;

/// Last stage a probe reached before producing its verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStage {
    /// No connection could be obtained.
    Connecting,
    /// Status was read and evaluated.
    Evaluated,
    /// The request deadline fired first.
    TimedOut,
}

impl ProbeStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeStage::Connecting => "connecting",
            ProbeStage::Evaluated => "evaluated",
            ProbeStage::TimedOut => "timed_out",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub stage: ProbeStage,
    pub verdict: Verdict,
}

/// Runs one health evaluation per inbound probe.
pub struct ProbeHandler<S> {
    source: S,
    policy: Policy,
}

impl<S: StatusSource> ProbeHandler<S> {
    pub fn new(source: S, policy: Policy) -> Self {
        Self { source, policy }
    }

    pub async fn probe(&self) -> ProbeOutcome {
        let mut session = match self.source.acquire().await {
            Ok(session) => session,
            Err(failure) => {
                tracing::error!(
                    kind = failure.kind.as_str(),
                    error = %failure,
                    "Database connection error"
                );
                return ProbeOutcome {
                    stage: ProbeStage::Connecting,
                    verdict: Verdict::unhealthy(failure.reason()),
                };
            }
        };

        let snapshot = read_snapshot(&mut session).await;
        drop(session);

        tracing::debug!(
            wsrep_on = %snapshot.wsrep_on,
            wsrep_ready = %snapshot.ready,
            wsrep_connected = %snapshot.connected,
            wsrep_local_state = %snapshot.local_state,
            "wsrep status"
        );

        let assessment = assess(&snapshot);
        let verdict = assessment.verdict(self.policy);
        log_verdict(&assessment, &verdict);

        ProbeOutcome {
            stage: ProbeStage::Evaluated,
            verdict,
        }
    }
}

fn log_verdict(assessment: &Assessment, verdict: &Verdict) {
    let reason = verdict.reason.as_str();
    match assessment {
        Assessment::Standalone | Assessment::State(NodeState::Synced) => {
            tracing::debug!(reason, "Node healthy")
        }
        Assessment::State(NodeState::DonorDesynced) => {
            tracing::info!(healthy = verdict.healthy, "Node is donor")
        }
        Assessment::NotReady
        | Assessment::NotConnected
        | Assessment::State(NodeState::Joining | NodeState::Joined) => {
            tracing::info!(reason, "Node unavailable")
        }
        Assessment::State(NodeState::Unrecognized(code)) => {
            tracing::warn!(wsrep_local_state = *code, "Unrecognized local state")
        }
        Assessment::NotSet(_) | Assessment::Failed(_) => tracing::warn!(reason, "Node unhealthy"),
    }
}

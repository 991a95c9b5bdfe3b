use crate::domain::decision::{Mode, RoutingApproach};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttemptId(String);

impl AttemptId {
    pub fn from_index(index: u32) -> Self {
        Self(format!("PAY_SIM_{:05}", index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardLabel {
    Success,
    Fail,
}

impl CardLabel {
    pub fn card_number(&self) -> &'static str {
        match self {
            CardLabel::Success => "4242424242424242",
            CardLabel::Fail => "4000000000000002",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CardLabel::Success => "SUCCESS",
            CardLabel::Fail => "FAIL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NormalizedStatus {
    Charged,
    Authorized,
    Failure,
    Declined,
}

impl NormalizedStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NormalizedStatus::Charged => "CHARGED",
            NormalizedStatus::Authorized => "AUTHORIZED",
            NormalizedStatus::Failure => "FAILURE",
            NormalizedStatus::Declined => "DECLINED",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, NormalizedStatus::Charged | NormalizedStatus::Authorized)
    }
}

impl fmt::Display for NormalizedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    Baseline,
    ForcedFailure,
    Recovery,
}

impl PhaseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseKind::Baseline => "baseline",
            PhaseKind::ForcedFailure => "forced_failure",
            PhaseKind::Recovery => "recovery",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptResult {
    pub attempt_id: AttemptId,
    pub phase: PhaseKind,
    pub card_label: CardLabel,
    pub connector: String,
    /// Connector label echoed by the payment endpoint; `simulated_connector` on the fallback path.
    pub processed_by: String,
    pub normalized_status: NormalizedStatus,
    pub error_message: Option<String>,
    pub routing_approach: RoutingApproach,
    pub mode: Mode,
}

impl AttemptResult {
    pub fn is_simulated(&self) -> bool {
        self.processed_by == crate::payments::simulated::SIMULATED_CONNECTOR
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "connector", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkipReason {
    NoDecision,
    UnknownConnector(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedAttempt {
    pub attempt_id: AttemptId,
    pub phase: PhaseKind,
    pub reason: SkipReason,
}

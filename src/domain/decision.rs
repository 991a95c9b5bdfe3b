use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const SR_SELECTION_V3_ROUTING: &str = "SR_SELECTION_V3_ROUTING";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RankingAlgorithm {
    SrBasedRouting,
    PlBasedRouting,
    NtwBasedRouting,
}

impl RankingAlgorithm {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "SR_BASED_ROUTING" => Some(RankingAlgorithm::SrBasedRouting),
            "PL_BASED_ROUTING" => Some(RankingAlgorithm::PlBasedRouting),
            "NTW_BASED_ROUTING" => Some(RankingAlgorithm::NtwBasedRouting),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    Exploitation,
    Exploration,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutingApproach(String);

impl RoutingApproach {
    pub fn new(approach: impl Into<String>) -> Self {
        Self(approach.into())
    }

    pub fn unknown() -> Self {
        Self("UNKNOWN".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn mode(&self) -> Mode {
        if self.0 == SR_SELECTION_V3_ROUTING {
            Mode::Exploitation
        } else {
            Mode::Exploration
        }
    }
}

impl fmt::Display for RoutingApproach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecisionResult {
    pub decided_connector: Option<String>,
    pub priority_map: BTreeMap<String, f64>,
    pub routing_approach: RoutingApproach,
}

impl DecisionResult {
    pub fn none() -> Self {
        Self {
            decided_connector: None,
            priority_map: BTreeMap::new(),
            routing_approach: RoutingApproach::unknown(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.routing_approach.mode()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentAttributes {
    pub amount: f64,
    pub currency: String,
    pub customer_id: String,
    pub payment_type: String,
    pub payment_method_type: String,
    pub payment_method: String,
}

impl Default for PaymentAttributes {
    fn default() -> Self {
        Self {
            amount: 100.50,
            currency: "USD".to_string(),
            customer_id: "CUST12345".to_string(),
            payment_type: "ORDER_PAYMENT".to_string(),
            payment_method_type: "CARD".to_string(),
            payment_method: "VISA".to_string(),
        }
    }
}

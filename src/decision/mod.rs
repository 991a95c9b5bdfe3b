use crate::domain::attempt::AttemptId;
use crate::domain::decision::{DecisionResult, PaymentAttributes, RankingAlgorithm, RoutingApproach};
use crate::error::SimError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod client;
pub mod score;

#[async_trait::async_trait]
pub trait DecisionGateway: Send + Sync {
    /// Never fails: transport and decode problems come back as a result with no connector.
    async fn decide(
        &self,
        attempt_id: &AttemptId,
        eligible: &[String],
        ranking: RankingAlgorithm,
        attributes: &PaymentAttributes,
    ) -> DecisionResult;
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
    pub payment_id: String,
    pub amount: f64,
    pub currency: String,
    pub customer_id: String,
    pub payment_type: String,
    pub payment_method_type: String,
    pub payment_method: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecideGatewayRequest {
    pub merchant_id: String,
    pub eligible_gateway_list: Vec<String>,
    pub ranking_algorithm: RankingAlgorithm,
    pub elimination_enabled: bool,
    pub payment_info: PaymentInfo,
}

impl DecideGatewayRequest {
    pub fn new(
        merchant_id: &str,
        attempt_id: &AttemptId,
        eligible: &[String],
        ranking: RankingAlgorithm,
        elimination_enabled: bool,
        attributes: &PaymentAttributes,
    ) -> Self {
        Self {
            merchant_id: merchant_id.to_string(),
            eligible_gateway_list: eligible.to_vec(),
            ranking_algorithm: ranking,
            elimination_enabled,
            payment_info: PaymentInfo {
                payment_id: attempt_id.to_string(),
                amount: attributes.amount,
                currency: attributes.currency.clone(),
                customer_id: attributes.customer_id.clone(),
                payment_type: attributes.payment_type.clone(),
                payment_method_type: attributes.payment_method_type.clone(),
                payment_method: attributes.payment_method.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct DecideGatewayResponse {
    #[serde(default)]
    decided_gateway: Option<String>,
    #[serde(default)]
    gateway_priority_map: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    routing_approach: Option<String>,
}

pub fn parse_decision(body: &str) -> Result<DecisionResult, SimError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    if !value.is_object() {
        return Err(SimError::Decode(
            "decide-gateway response is not a JSON object".to_string(),
        ));
    }
    let resp: DecideGatewayResponse = serde_json::from_value(value)?;

    let mut priority_map = BTreeMap::new();
    for (connector, score) in resp.gateway_priority_map.unwrap_or_default() {
        if !score.is_finite() {
            return Err(SimError::Decode(format!(
                "non-finite priority score for {}",
                connector
            )));
        }
        priority_map.insert(connector, score.clamp(0.0, 1.0));
    }

    Ok(DecisionResult {
        decided_connector: resp.decided_gateway.filter(|g| !g.trim().is_empty()),
        priority_map,
        routing_approach: resp
            .routing_approach
            .map(RoutingApproach::new)
            .unwrap_or_else(RoutingApproach::unknown),
    })
}

use crate::domain::attempt::{AttemptId, NormalizedStatus};
use crate::error::SimError;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreAck {
    pub status_code: u16,
    pub body: String,
}

#[async_trait::async_trait]
pub trait ScoreReporter: Send + Sync {
    async fn report(
        &self,
        connector: &str,
        status: NormalizedStatus,
        attempt_id: &AttemptId,
    ) -> Result<ScoreAck, SimError>;
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScoreRequest {
    pub merchant_id: String,
    pub gateway: String,
    pub gateway_reference_id: Option<String>,
    pub status: NormalizedStatus,
    pub payment_id: String,
    pub enforce_dynamic_routing_failure: Option<bool>,
}

impl UpdateScoreRequest {
    pub fn new(merchant_id: &str, connector: &str, status: NormalizedStatus, attempt_id: &AttemptId) -> Self {
        Self {
            merchant_id: merchant_id.to_string(),
            gateway: connector.to_string(),
            gateway_reference_id: None,
            status,
            payment_id: attempt_id.to_string(),
            enforce_dynamic_routing_failure: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_update_carries_explicit_nulls() {
        let req = UpdateScoreRequest::new(
            "m1",
            "stripe_test",
            NormalizedStatus::Charged,
            &AttemptId::from_index(7),
        );
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["merchantId"], "m1");
        assert_eq!(v["gateway"], "stripe_test");
        assert_eq!(v["status"], "CHARGED");
        assert_eq!(v["paymentId"], "PAY_SIM_00007");
        assert!(v["gatewayReferenceId"].is_null());
        assert!(v.as_object().unwrap().contains_key("enforceDynamicRoutingFailure"));
    }
}

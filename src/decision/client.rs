use crate::decision::score::{ScoreAck, ScoreReporter, UpdateScoreRequest};
use crate::decision::{parse_decision, DecideGatewayRequest, DecisionGateway};
use crate::domain::attempt::{AttemptId, NormalizedStatus};
use crate::domain::decision::{DecisionResult, PaymentAttributes, RankingAlgorithm};
use crate::error::SimError;
use std::time::Duration;

pub struct DecisionEngineClient {
    pub base_url: String,
    pub merchant_id: String,
    pub elimination_enabled: bool,
    pub timeout: Duration,
    pub client: reqwest::Client,
}

impl DecisionEngineClient {
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn try_decide(&self, body: &DecideGatewayRequest) -> Result<DecisionResult, SimError> {
        let resp = self
            .client
            .post(self.url("decide-gateway"))
            .header("x-merchantid", &self.merchant_id)
            .json(body)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(SimError::Transport(format!(
                "HTTP_{}: {}",
                status.as_u16(),
                text.chars().take(200).collect::<String>()
            )));
        }

        parse_decision(&text)
    }
}

#[async_trait::async_trait]
impl DecisionGateway for DecisionEngineClient {
    async fn decide(
        &self,
        attempt_id: &AttemptId,
        eligible: &[String],
        ranking: RankingAlgorithm,
        attributes: &PaymentAttributes,
    ) -> DecisionResult {
        let body = DecideGatewayRequest::new(
            &self.merchant_id,
            attempt_id,
            eligible,
            ranking,
            self.elimination_enabled,
            attributes,
        );

        match self.try_decide(&body).await {
            Ok(decision) => decision,
            Err(e) => {
                tracing::warn!("decide-gateway failed for {}: {}", attempt_id, e);
                DecisionResult::none()
            }
        }
    }
}

#[async_trait::async_trait]
impl ScoreReporter for DecisionEngineClient {
    async fn report(
        &self,
        connector: &str,
        status: NormalizedStatus,
        attempt_id: &AttemptId,
    ) -> Result<ScoreAck, SimError> {
        let body = UpdateScoreRequest::new(&self.merchant_id, connector, status, attempt_id);
        let resp = self
            .client
            .post(self.url("update-gateway-score"))
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await?;

        let status_code = resp.status();
        let text = resp.text().await.unwrap_or_default().trim().to_string();
        if !status_code.is_success() {
            return Err(SimError::Transport(format!(
                "HTTP_{}: {}",
                status_code.as_u16(),
                text.chars().take(200).collect::<String>()
            )));
        }

        Ok(ScoreAck {
            status_code: status_code.as_u16(),
            body: text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_client() -> DecisionEngineClient {
        DecisionEngineClient {
            base_url: "http://127.0.0.1:1/".to_string(),
            merchant_id: "m1".to_string(),
            elimination_enabled: true,
            timeout: Duration::from_secs(2),
            client: reqwest::Client::new(),
        }
    }

    #[test]
    fn joins_paths_without_double_slash() {
        assert_eq!(unreachable_client().url("decide-gateway"), "http://127.0.0.1:1/decide-gateway");
    }

    #[tokio::test]
    async fn transport_failure_yields_no_decision() {
        let client = unreachable_client();
        let d = client
            .decide(
                &AttemptId::from_index(1),
                &["stripe_test".to_string()],
                RankingAlgorithm::SrBasedRouting,
                &PaymentAttributes::default(),
            )
            .await;
        assert!(d.decided_connector.is_none());
        assert!(d.priority_map.is_empty());
    }

    #[tokio::test]
    async fn score_report_failure_is_an_error_not_a_panic() {
        let client = unreachable_client();
        let out = client
            .report("stripe_test", NormalizedStatus::Failure, &AttemptId::from_index(1))
            .await;
        assert!(matches!(out, Err(SimError::Transport(_))));
    }
}

use crate::domain::attempt::{AttemptId, CardLabel};
use crate::domain::payment::{PaymentRequest, RawPaymentResponse};
use crate::payments::simulated::fallback_response;
use crate::payments::PaymentExecutor;
use std::time::Duration;

pub struct HyperswitchExecutor {
    pub base_url: String,
    pub api_key: String,
    pub profile_id: String,
    pub timeout: Duration,
    pub client: reqwest::Client,
}

#[async_trait::async_trait]
impl PaymentExecutor for HyperswitchExecutor {
    async fn execute(
        &self,
        attempt_id: &AttemptId,
        connector: &str,
        account_id: &str,
        instrument: CardLabel,
    ) -> RawPaymentResponse {
        let url = format!("{}/payments", self.base_url.trim_end_matches('/'));
        let body = PaymentRequest::fixture(instrument, connector, account_id, &self.profile_id);

        let resp = self
            .client
            .post(url)
            .header("Accept", "application/json")
            .header("api-key", &self.api_key)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await;

        match resp {
            Ok(r) if r.status().is_success() => match r.json::<RawPaymentResponse>().await {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::warn!("{}: undecodable payment response, simulating: {}", attempt_id, e);
                    fallback_response(instrument)
                }
            },
            Ok(r) => {
                let status = r.status();
                let body = r.text().await.unwrap_or_default();
                RawPaymentResponse {
                    payment_id: None,
                    status: "failed".to_string(),
                    connector: Some(connector.to_string()),
                    error_code: Some(format!("HTTP_{}", status.as_u16())),
                    error_message: Some(body.chars().take(200).collect()),
                    simulated: false,
                }
            }
            Err(e) if e.is_timeout() => {
                tracing::warn!("{}: payment request timed out, simulating", attempt_id);
                fallback_response(instrument)
            }
            Err(e) => {
                tracing::warn!("{}: payment request failed, simulating: {}", attempt_id, e);
                fallback_response(instrument)
            }
        }
    }
}

use crate::directory::{ConnectorRecord, ConnectorSource};
use crate::error::SimError;
use std::time::Duration;

pub struct ProfileConnectorLookup {
    pub base_url: String,
    pub merchant_id: String,
    pub api_key: String,
    pub timeout: Duration,
    pub client: reqwest::Client,
}

#[async_trait::async_trait]
impl ConnectorSource for ProfileConnectorLookup {
    async fn fetch(&self) -> Result<Vec<ConnectorRecord>, SimError> {
        let url = format!(
            "{}/api/account/{}/profile/connectors",
            self.base_url.trim_end_matches('/'),
            self.merchant_id
        );

        let resp = self
            .client
            .get(url)
            .header("api-key", &self.api_key)
            .header("Accept", "*/*")
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SimError::Transport(format!(
                "HTTP_{}: {}",
                status.as_u16(),
                body.chars().take(200).collect::<String>()
            )));
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str::<Vec<ConnectorRecord>>(&body)?)
    }
}

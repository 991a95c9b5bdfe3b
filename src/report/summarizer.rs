use crate::domain::attempt::AttemptResult;
use anyhow::{anyhow, Result};
use serde_json::json;
use std::time::Duration;

#[async_trait::async_trait]
pub trait RunSummarizer: Send + Sync {
    async fn summarize(&self, results: &[AttemptResult]) -> Result<String>;
}

pub struct LlmSummarizer {
    pub url: String,
    pub timeout: Duration,
    pub client: reqwest::Client,
}

pub fn build_prompt(results: &[AttemptResult]) -> Result<String> {
    let logs = serde_json::to_string_pretty(results)?;
    Ok(format!(
        "You are an analyst reviewing a payment routing simulation.\n\
         Each entry has the payment id, card type, selected connector, status, error message \
         and the routing approach reported by the decision service.\n\
         Produce a summary report with:\n\
         - Total payments\n\
         - Number of successes and failures\n\
         - Success percentage per connector\n\
         - Most common failure reasons\n\
         - Ratio of exploitation vs exploration\n\
         - Suggestions to improve routing or connector reliability\n\
         Respond in markdown.\n\n\
         Logs:\n{}\n",
        logs
    ))
}

#[async_trait::async_trait]
impl RunSummarizer for LlmSummarizer {
    async fn summarize(&self, results: &[AttemptResult]) -> Result<String> {
        let body = json!({
            "contents": [
                { "parts": [ { "text": build_prompt(results)? } ] }
            ]
        });

        let resp = self
            .client
            .post(&self.url)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(anyhow!(
                "summarizer returned HTTP {}: {}",
                status.as_u16(),
                text.chars().take(200).collect::<String>()
            ));
        }

        let v: serde_json::Value = resp.json().await?;
        extract_text(&v).ok_or_else(|| anyhow!("summarizer response has no candidate text"))
    }
}

fn extract_text(v: &serde_json::Value) -> Option<String> {
    v.get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
        .map(ToString::to_string)
}

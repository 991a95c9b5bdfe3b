use crate::domain::decision::RankingAlgorithm;
use crate::error::SimError;
use crate::outcomes::card_pool::{DEFAULT_POOL_SIZE, MAX_POOL_SIZE};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Markdown,
    Json,
}

impl ReportFormat {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimConfig {
    pub total_attempts: i64,
    pub baseline_success_percent: i64,
    pub pool_size: i64,
    pub initial_delay_ms: u64,
    pub inter_attempt_delay_ms: u64,
    pub seed: Option<u64>,
    pub http_timeout_ms: u64,
    pub ranking_algorithm: RankingAlgorithm,
    pub elimination_enabled: bool,
    pub report_format: ReportFormat,
    pub decision_base_url: String,
    pub decision_merchant_id: String,
    pub payments_base_url: String,
    pub payments_api_key: String,
    pub payments_profile_id: String,
    pub payments_merchant_id: String,
    pub static_connectors: Vec<(String, String)>,
    pub connector_success_rates: Vec<(String, i64)>,
    pub connector_lookup_url: Option<String>,
    pub summarizer_url: Option<String>,
    invalid: Vec<String>,
}

struct EnvReader<F> {
    lookup: F,
    invalid: Vec<String>,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn present(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn string(&self, key: &str, default: &str) -> String {
        (self.lookup)(key).unwrap_or_else(|| default.to_string())
    }

    fn with<T>(&mut self, key: &str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
        let raw = self.present(key)?;
        match parse(&raw) {
            Some(v) => Some(v),
            None => {
                self.invalid.push(format!("{}={:?}", key, raw));
                None
            }
        }
    }

    fn number<T: std::str::FromStr>(&mut self, key: &str, default: T) -> T {
        self.with(key, |s| s.parse::<T>().ok()).unwrap_or(default)
    }
}

impl SimConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut env = EnvReader {
            lookup,
            invalid: Vec::new(),
        };

        let total_attempts = env.number("SIM_TOTAL_PAYMENTS", 200_i64);
        let baseline_success_percent = env.number("SIM_SUCCESS_PERCENT", 60_i64);
        let pool_size = env.number("SIM_POOL_SIZE", DEFAULT_POOL_SIZE as i64);
        let initial_delay_ms = env.number("SIM_INITIAL_DELAY_MS", 0_u64);
        let inter_attempt_delay_ms = env.number("SIM_INTER_PAYMENT_SLEEP_MS", 0_u64);
        let seed = env.with("SIM_SEED", |s| s.parse::<u64>().ok());
        let http_timeout_ms = env.number("SIM_HTTP_TIMEOUT_MS", 10_000_u64);
        let ranking_algorithm = env
            .with("SIM_RANKING_ALGORITHM", RankingAlgorithm::parse)
            .unwrap_or(RankingAlgorithm::SrBasedRouting);
        let elimination_enabled = env
            .with("SIM_ELIMINATION_ENABLED", |s| match s.to_lowercase().as_str() {
                "true" | "1" | "yes" => Some(true),
                "false" | "0" | "no" => Some(false),
                _ => None,
            })
            .unwrap_or(true);
        let report_format = env
            .with("SIM_REPORT_FORMAT", ReportFormat::parse)
            .unwrap_or(ReportFormat::Text);
        let connector_success_rates = env
            .with("SIM_CONNECTOR_SUCCESS_RATES", parse_success_rates)
            .unwrap_or_default();

        Self {
            total_attempts,
            baseline_success_percent,
            pool_size,
            initial_delay_ms,
            inter_attempt_delay_ms,
            seed,
            http_timeout_ms,
            ranking_algorithm,
            elimination_enabled,
            report_format,
            decision_base_url: env.string("DECISION_ENGINE_URL", "http://localhost:8080"),
            decision_merchant_id: env.string("DECISION_MERCHANT_ID", "hyperswitchTest"),
            payments_base_url: env.string("PAYMENTS_BASE_URL", "https://sandbox.hyperswitch.io"),
            payments_api_key: env.string("PAYMENTS_API_KEY", ""),
            payments_profile_id: env.string("PAYMENTS_PROFILE_ID", ""),
            payments_merchant_id: env.string("PAYMENTS_MERCHANT_ID", ""),
            static_connectors: parse_connector_pairs(&env.string("SIM_CONNECTORS", "")),
            connector_success_rates,
            connector_lookup_url: env.present("CONNECTOR_LOOKUP_URL"),
            summarizer_url: env.present("SUMMARIZER_URL"),
            invalid: env.invalid,
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if !self.invalid.is_empty() {
            return Err(SimError::InvalidConfiguration(format!(
                "unparsable values: {}",
                self.invalid.join(", ")
            )));
        }
        if self.total_attempts <= 0 {
            return Err(SimError::InvalidConfiguration(format!(
                "SIM_TOTAL_PAYMENTS must be > 0, got {}",
                self.total_attempts
            )));
        }
        if !(0..=100).contains(&self.baseline_success_percent) {
            return Err(SimError::InvalidConfiguration(format!(
                "SIM_SUCCESS_PERCENT must be within [0,100], got {}",
                self.baseline_success_percent
            )));
        }
        if !(1..=MAX_POOL_SIZE as i64).contains(&self.pool_size) {
            return Err(SimError::InvalidConfiguration(format!(
                "SIM_POOL_SIZE must be within [1,{}], got {}",
                MAX_POOL_SIZE, self.pool_size
            )));
        }
        if let Some((name, pct)) = self
            .connector_success_rates
            .iter()
            .find(|(_, pct)| !(0..=100).contains(pct))
        {
            return Err(SimError::InvalidConfiguration(format!(
                "SIM_CONNECTOR_SUCCESS_RATES for {} must be within [0,100], got {}",
                name, pct
            )));
        }
        if self.http_timeout_ms == 0 {
            return Err(SimError::InvalidConfiguration(
                "SIM_HTTP_TIMEOUT_MS must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }
}

pub fn parse_connector_pairs(raw: &str) -> Vec<(String, String)> {
    raw.split(',')
        .filter_map(|entry| {
            let (name, account) = entry.split_once('=')?;
            let (name, account) = (name.trim(), account.trim());
            if name.is_empty() || account.is_empty() {
                None
            } else {
                Some((name.to_string(), account.to_string()))
            }
        })
        .collect()
}

fn parse_success_rates(raw: &str) -> Option<Vec<(String, i64)>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (name, pct) = entry.split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), pct.trim().parse::<i64>().ok()?))
        })
        .collect()
}

use crate::domain::attempt::{AttemptResult, NormalizedStatus, PhaseKind, SkippedAttempt};
use crate::domain::decision::Mode;
use crate::report::summarizer::RunSummarizer;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

pub mod render;
pub mod summarizer;

const TOP_ERRORS: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConnectorStats {
    pub attempts: u64,
    pub successes: u64,
    pub failures: u64,
    pub success_pct: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PhaseStats {
    pub attempts: u64,
    pub successes: u64,
    pub exploitation: u64,
    pub exploration: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorCount {
    pub message: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub total_attempts: u64,
    pub successes: u64,
    pub failures: u64,
    pub skipped: u64,
    pub simulated: u64,
    pub exploitation: u64,
    pub exploration: u64,
    pub by_status: BTreeMap<NormalizedStatus, u64>,
    pub per_connector: BTreeMap<String, ConnectorStats>,
    pub per_phase: BTreeMap<PhaseKind, PhaseStats>,
    pub top_errors: Vec<ErrorCount>,
    pub narrative: Option<String>,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

pub fn percent(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        0
    } else {
        ((part as f64 / whole as f64) * 100.0).round() as u32
    }
}

pub fn summarize(results: &[AttemptResult]) -> Report {
    let mut successes = 0_u64;
    let mut simulated = 0_u64;
    let mut exploitation = 0_u64;
    let mut by_status: BTreeMap<NormalizedStatus, u64> = BTreeMap::new();
    let mut per_connector: BTreeMap<String, ConnectorStats> = BTreeMap::new();
    let mut per_phase: BTreeMap<PhaseKind, PhaseStats> = BTreeMap::new();
    let mut error_counts: HashMap<&str, u64> = HashMap::new();

    for r in results {
        let ok = r.normalized_status.is_success();
        *by_status.entry(r.normalized_status).or_insert(0) += 1;

        let conn = per_connector.entry(r.connector.clone()).or_default();
        conn.attempts += 1;
        let phase = per_phase.entry(r.phase).or_default();
        phase.attempts += 1;

        if ok {
            successes += 1;
            conn.successes += 1;
            phase.successes += 1;
        } else {
            conn.failures += 1;
        }

        match r.mode {
            Mode::Exploitation => {
                exploitation += 1;
                phase.exploitation += 1;
            }
            Mode::Exploration => phase.exploration += 1,
        }

        if r.is_simulated() {
            simulated += 1;
        }

        if let Some(msg) = r.error_message.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
            *error_counts.entry(msg).or_insert(0) += 1;
        }
    }

    for stats in per_connector.values_mut() {
        stats.success_pct = percent(stats.successes, stats.attempts);
    }

    let mut top_errors: Vec<ErrorCount> = error_counts
        .into_iter()
        .map(|(message, count)| ErrorCount {
            message: message.to_string(),
            count,
        })
        .collect();
    top_errors.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.message.cmp(&b.message)));
    top_errors.truncate(TOP_ERRORS);

    let total = results.len() as u64;
    Report {
        total_attempts: total,
        successes,
        failures: total - successes,
        skipped: 0,
        simulated,
        exploitation,
        exploration: total - exploitation,
        by_status,
        per_connector,
        per_phase,
        top_errors,
        narrative: None,
        generated_at: chrono::Utc::now(),
    }
}

#[derive(Debug, Default)]
pub struct ResultAggregator {
    results: Vec<AttemptResult>,
    skipped: Vec<SkippedAttempt>,
}

impl ResultAggregator {
    pub fn record(&mut self, result: AttemptResult) {
        self.results.push(result);
    }

    pub fn record_skip(&mut self, skip: SkippedAttempt) {
        self.skipped.push(skip);
    }

    pub fn results(&self) -> &[AttemptResult] {
        &self.results
    }

    pub fn skipped(&self) -> &[SkippedAttempt] {
        &self.skipped
    }

    pub fn summarize(&self) -> Report {
        let mut report = summarize(&self.results);
        report.skipped = self.skipped.len() as u64;
        report
    }

    /// Numeric report plus an optional narrative; a failing summarizer only loses the narrative.
    pub async fn summarize_with(&self, summarizer: Option<&dyn RunSummarizer>) -> Report {
        let mut report = self.summarize();
        let Some(summarizer) = summarizer else {
            return report;
        };

        match summarizer.summarize(&self.results).await {
            Ok(text) => report.narrative = Some(text),
            Err(e) => tracing::warn!("summarizer failed, numeric report only: {}", e),
        }
        report
    }
}

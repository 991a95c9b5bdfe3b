use routing_feedback_sim::config::SimConfig;
use routing_feedback_sim::decision::score::{ScoreAck, ScoreReporter};
use routing_feedback_sim::decision::DecisionGateway;
use routing_feedback_sim::directory::ConnectorDirectory;
use routing_feedback_sim::domain::attempt::{
    AttemptId, CardLabel, NormalizedStatus, PhaseKind, SkipReason,
};
use routing_feedback_sim::domain::decision::{
    DecisionResult, Mode, PaymentAttributes, RankingAlgorithm, RoutingApproach,
};
use routing_feedback_sim::domain::payment::RawPaymentResponse;
use routing_feedback_sim::error::SimError;
use routing_feedback_sim::payments::simulated::{fallback_response, SIMULATED_CONNECTOR};
use routing_feedback_sim::payments::PaymentExecutor;
use routing_feedback_sim::service::orchestrator::{RunState, SimulationOrchestrator};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Script = Box<dyn Fn(u32) -> (Option<&'static str>, &'static str) + Send + Sync>;

struct ScriptedDecision {
    script: Script,
    calls: Mutex<Vec<String>>,
    cancel_after: Mutex<Option<(usize, Arc<AtomicBool>)>>,
}

impl ScriptedDecision {
    fn new(script: impl Fn(u32) -> (Option<&'static str>, &'static str) + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            script: Box::new(script),
            calls: Mutex::new(Vec::new()),
            cancel_after: Mutex::new(None),
        })
    }

    fn always(connector: &'static str, approach: &'static str) -> Arc<Self> {
        Self::new(move |_| (Some(connector), approach))
    }

    fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

fn index_of(attempt_id: &AttemptId) -> u32 {
    attempt_id.as_str().trim_start_matches("PAY_SIM_").parse().unwrap()
}

#[async_trait::async_trait]
impl DecisionGateway for ScriptedDecision {
    async fn decide(
        &self,
        attempt_id: &AttemptId,
        eligible: &[String],
        _ranking: RankingAlgorithm,
        _attributes: &PaymentAttributes,
    ) -> DecisionResult {
        let seen = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(attempt_id.to_string());
            calls.len()
        };
        if let Some((limit, flag)) = self.cancel_after.lock().unwrap().as_ref() {
            if seen >= *limit {
                flag.store(true, Ordering::SeqCst);
            }
        }

        let (connector, approach) = (self.script)(index_of(attempt_id));
        let mut priority_map = BTreeMap::new();
        for name in eligible {
            priority_map.insert(name.clone(), 0.5);
        }
        DecisionResult {
            decided_connector: connector.map(str::to_string),
            priority_map,
            routing_approach: RoutingApproach::new(approach),
        }
    }
}

#[derive(Default)]
struct CardEchoExecutor {
    offline: bool,
    calls: Mutex<Vec<(u32, CardLabel)>>,
}

#[async_trait::async_trait]
impl PaymentExecutor for CardEchoExecutor {
    async fn execute(
        &self,
        attempt_id: &AttemptId,
        connector: &str,
        _account_id: &str,
        instrument: CardLabel,
    ) -> RawPaymentResponse {
        self.calls.lock().unwrap().push((index_of(attempt_id), instrument));
        if self.offline {
            return fallback_response(instrument);
        }
        let (status, error_message) = match instrument {
            CardLabel::Success => ("succeeded", None),
            CardLabel::Fail => ("failed", Some("Your card was declined.".to_string())),
        };
        RawPaymentResponse {
            payment_id: Some(format!("pay_{}", attempt_id)),
            status: status.to_string(),
            connector: Some(connector.to_string()),
            error_code: None,
            error_message,
            simulated: false,
        }
    }
}

#[derive(Default)]
struct RecordingReporter {
    reports: Mutex<Vec<(String, NormalizedStatus, String)>>,
}

#[async_trait::async_trait]
impl ScoreReporter for RecordingReporter {
    async fn report(
        &self,
        connector: &str,
        status: NormalizedStatus,
        attempt_id: &AttemptId,
    ) -> Result<ScoreAck, SimError> {
        self.reports
            .lock()
            .unwrap()
            .push((connector.to_string(), status, attempt_id.to_string()));
        Ok(ScoreAck {
            status_code: 200,
            body: "{}".to_string(),
        })
    }
}

fn config(total: i64, percent: i64) -> SimConfig {
    let mut cfg = SimConfig::from_lookup(|_| None);
    cfg.total_attempts = total;
    cfg.baseline_success_percent = percent;
    cfg.seed = Some(42);
    cfg
}

fn directory() -> ConnectorDirectory {
    ConnectorDirectory::from_static(vec![
        ("stripe_test".to_string(), "mca_stripe".to_string()),
        ("adyen_test".to_string(), "mca_adyen".to_string()),
    ])
}

fn orchestrator(
    cfg: &SimConfig,
    directory: ConnectorDirectory,
    decision: Arc<ScriptedDecision>,
    executor: Arc<CardEchoExecutor>,
    reporter: Arc<RecordingReporter>,
) -> SimulationOrchestrator {
    SimulationOrchestrator::new(cfg, directory, decision, executor, reporter).unwrap()
}

#[tokio::test]
async fn exploitation_approach_is_classified_end_to_end() {
    let decision = ScriptedDecision::always("stripe_test", "SR_SELECTION_V3_ROUTING");
    let executor = Arc::new(CardEchoExecutor::default());
    let reporter = Arc::new(RecordingReporter::default());
    let mut orch = orchestrator(&config(8, 60), directory(), decision, executor, reporter);

    let run = orch.run().await.unwrap();
    let results = run.aggregator.results();
    assert_eq!(results.len(), 8);
    assert!(results.iter().all(|r| r.mode == Mode::Exploitation));
    assert!(results.iter().all(|r| r.connector == "stripe_test"));

    let report = run.aggregator.summarize();
    assert_eq!(report.exploitation, 8);
    assert_eq!(report.exploration, 0);
    assert_eq!(orch.state(), RunState::Completed);
}

#[tokio::test]
async fn other_approaches_count_as_exploration() {
    let decision = ScriptedDecision::new(|i| {
        if i % 2 == 0 {
            (Some("adyen_test"), "SR_V3_HEDGING")
        } else {
            (Some("stripe_test"), "SR_SELECTION_V3_ROUTING")
        }
    });
    let mut orch = orchestrator(
        &config(10, 60),
        directory(),
        decision,
        Arc::new(CardEchoExecutor::default()),
        Arc::new(RecordingReporter::default()),
    );

    let report = orch.run().await.unwrap().aggregator.summarize();
    assert_eq!(report.exploitation, 5);
    assert_eq!(report.exploration, 5);
    assert_eq!(report.per_connector["adyen_test"].attempts, 5);
}

#[tokio::test]
async fn missing_decision_skips_payment_and_score_update() {
    let decision = ScriptedDecision::new(|i| {
        if i % 2 == 0 {
            (None, "UNKNOWN")
        } else {
            (Some("stripe_test"), "SR_SELECTION_V3_ROUTING")
        }
    });
    let executor = Arc::new(CardEchoExecutor::default());
    let reporter = Arc::new(RecordingReporter::default());
    let mut orch = orchestrator(
        &config(6, 60),
        directory(),
        decision.clone(),
        executor.clone(),
        reporter.clone(),
    );

    let run = orch.run().await.unwrap();
    assert_eq!(run.attempts_processed, 6);
    assert_eq!(decision.calls(), 6);
    assert_eq!(run.aggregator.results().len(), 3);
    assert_eq!(run.aggregator.skipped().len(), 3);
    assert!(run
        .aggregator
        .skipped()
        .iter()
        .all(|s| s.reason == SkipReason::NoDecision));
    assert_eq!(executor.calls.lock().unwrap().len(), 3);
    assert_eq!(reporter.reports.lock().unwrap().len(), 3);

    let report = run.aggregator.summarize();
    assert_eq!(report.skipped, 3);
    assert_eq!(report.total_attempts, 3);
}

#[tokio::test]
async fn reported_status_matches_recorded_status() {
    let reporter = Arc::new(RecordingReporter::default());
    let mut orch = orchestrator(
        &config(40, 50),
        directory(),
        ScriptedDecision::always("stripe_test", "SR_SELECTION_V3_ROUTING"),
        Arc::new(CardEchoExecutor::default()),
        reporter.clone(),
    );

    let run = orch.run().await.unwrap();
    let reports = reporter.reports.lock().unwrap();
    assert_eq!(reports.len(), run.aggregator.results().len());
    for (result, (connector, status, attempt_id)) in run.aggregator.results().iter().zip(reports.iter()) {
        assert_eq!(&result.connector, connector);
        assert_eq!(result.normalized_status, *status);
        assert_eq!(result.attempt_id.as_str(), attempt_id);
    }
}

#[tokio::test]
async fn forced_failure_window_only_draws_failing_cards() {
    let executor = Arc::new(CardEchoExecutor::default());
    let mut orch = orchestrator(
        &config(200, 60),
        directory(),
        ScriptedDecision::always("stripe_test", "SR_SELECTION_V3_ROUTING"),
        executor.clone(),
        Arc::new(RecordingReporter::default()),
    );

    let run = orch.run().await.unwrap();
    let calls = executor.calls.lock().unwrap();
    assert_eq!(calls.len(), 200);

    let forced: Vec<_> = calls.iter().filter(|(i, _)| (101..=150).contains(i)).collect();
    assert_eq!(forced.len(), 50);
    assert!(forced.iter().all(|(_, card)| *card == CardLabel::Fail));

    let baseline_successes = calls
        .iter()
        .filter(|(i, card)| *i <= 100 && *card == CardLabel::Success)
        .count();
    assert!((30..=90).contains(&baseline_successes), "{}", baseline_successes);

    let report = run.aggregator.summarize();
    assert_eq!(report.per_phase[&PhaseKind::Baseline].attempts, 100);
    assert_eq!(report.per_phase[&PhaseKind::ForcedFailure].attempts, 50);
    assert_eq!(report.per_phase[&PhaseKind::ForcedFailure].successes, 0);
    assert_eq!(report.per_phase[&PhaseKind::Recovery].attempts, 50);
}

#[tokio::test]
async fn same_seed_draws_same_cards() {
    let mut sequences = Vec::new();
    for _ in 0..2 {
        let executor = Arc::new(CardEchoExecutor::default());
        let mut orch = orchestrator(
            &config(30, 60),
            directory(),
            ScriptedDecision::always("stripe_test", "SR_SELECTION_V3_ROUTING"),
            executor.clone(),
            Arc::new(RecordingReporter::default()),
        );
        orch.run().await.unwrap();
        let cards: Vec<CardLabel> = executor.calls.lock().unwrap().iter().map(|(_, c)| *c).collect();
        sequences.push(cards);
    }
    assert_eq!(sequences[0], sequences[1]);
}

#[tokio::test]
async fn connector_without_account_is_skipped() {
    let executor = Arc::new(CardEchoExecutor::default());
    let reporter = Arc::new(RecordingReporter::default());
    let mut orch = orchestrator(
        &config(3, 60),
        directory(),
        ScriptedDecision::always("ghost_pay", "SR_SELECTION_V3_ROUTING"),
        executor.clone(),
        reporter.clone(),
    );

    let run = orch.run().await.unwrap();
    assert!(run.aggregator.results().is_empty());
    assert_eq!(run.aggregator.skipped().len(), 3);
    assert_eq!(
        run.aggregator.skipped()[0].reason,
        SkipReason::UnknownConnector("ghost_pay".to_string())
    );
    assert!(executor.calls.lock().unwrap().is_empty());
    assert!(reporter.reports.lock().unwrap().is_empty());
}

#[tokio::test]
async fn empty_directory_aborts_before_any_attempt() {
    let decision = ScriptedDecision::always("stripe_test", "SR_SELECTION_V3_ROUTING");
    let mut orch = orchestrator(
        &config(5, 60),
        ConnectorDirectory::from_static(Vec::new()),
        decision.clone(),
        Arc::new(CardEchoExecutor::default()),
        Arc::new(RecordingReporter::default()),
    );

    let err = orch.run().await.unwrap_err();
    assert!(matches!(err, SimError::DirectoryUnavailable(_)));
    assert_eq!(decision.calls(), 0);
    assert_eq!(orch.state(), RunState::Completed);
}

#[tokio::test]
async fn second_run_is_rejected() {
    let mut orch = orchestrator(
        &config(2, 60),
        directory(),
        ScriptedDecision::always("stripe_test", "SR_SELECTION_V3_ROUTING"),
        Arc::new(CardEchoExecutor::default()),
        Arc::new(RecordingReporter::default()),
    );

    orch.run().await.unwrap();
    let err = orch.run().await.unwrap_err();
    assert!(matches!(err, SimError::InvalidConfiguration(_)));
}

#[tokio::test]
async fn cancellation_stops_between_attempts() {
    let decision = ScriptedDecision::always("stripe_test", "SR_SELECTION_V3_ROUTING");
    let mut orch = orchestrator(
        &config(20, 60),
        directory(),
        decision.clone(),
        Arc::new(CardEchoExecutor::default()),
        Arc::new(RecordingReporter::default()),
    );
    *decision.cancel_after.lock().unwrap() = Some((4, orch.cancel_handle()));

    let run = orch.run().await.unwrap();
    assert!(run.cancelled);
    assert_eq!(run.attempts_processed, 4);
    assert_eq!(run.aggregator.results().len(), 4);
}

#[tokio::test]
async fn offline_executor_records_simulated_connector() {
    let reporter = Arc::new(RecordingReporter::default());
    let executor = Arc::new(CardEchoExecutor {
        offline: true,
        ..Default::default()
    });
    let mut orch = orchestrator(
        &config(10, 60),
        directory(),
        ScriptedDecision::always("adyen_test", "SR_V3_HEDGING"),
        executor,
        reporter.clone(),
    );

    let run = orch.run().await.unwrap();
    let results = run.aggregator.results();
    assert!(results.iter().all(|r| r.processed_by == SIMULATED_CONNECTOR));
    assert!(results.iter().all(|r| r.connector == "adyen_test"));
    assert!(results
        .iter()
        .all(|r| r.normalized_status.is_success() == (r.card_label == CardLabel::Success)));

    // feedback still goes to the decided connector
    assert!(reporter
        .reports
        .lock()
        .unwrap()
        .iter()
        .all(|(c, _, _)| c == "adyen_test"));
    assert_eq!(run.aggregator.summarize().simulated, 10);
}

#[test]
fn invalid_configuration_is_rejected_up_front() {
    let err = SimulationOrchestrator::new(
        &config(0, 60),
        directory(),
        ScriptedDecision::always("stripe_test", "SR_SELECTION_V3_ROUTING"),
        Arc::new(CardEchoExecutor::default()),
        Arc::new(RecordingReporter::default()),
    )
    .err()
    .unwrap();
    assert!(matches!(err, SimError::InvalidConfiguration(_)));

    let err = SimulationOrchestrator::new(
        &config(10, 101),
        directory(),
        ScriptedDecision::always("stripe_test", "SR_SELECTION_V3_ROUTING"),
        Arc::new(CardEchoExecutor::default()),
        Arc::new(RecordingReporter::default()),
    )
    .err()
    .unwrap();
    assert!(matches!(err, SimError::InvalidConfiguration(_)));
}

#[tokio::test(start_paused = true)]
async fn delays_run_before_and_between_attempts_only() {
    let mut cfg = config(5, 60);
    cfg.initial_delay_ms = 500;
    cfg.inter_attempt_delay_ms = 100;
    let mut orch = orchestrator(
        &cfg,
        directory(),
        ScriptedDecision::always("stripe_test", "SR_SELECTION_V3_ROUTING"),
        Arc::new(CardEchoExecutor::default()),
        Arc::new(RecordingReporter::default()),
    );

    let started = tokio::time::Instant::now();
    let run = orch.run().await.unwrap();
    assert_eq!(run.attempts_processed, 5);
    assert_eq!(started.elapsed(), Duration::from_millis(500 + 4 * 100));
}

#[tokio::test]
async fn connector_success_rate_applies_outside_forced_window() {
    let mut cfg = config(40, 100);
    cfg.connector_success_rates = vec![("adyen_test".to_string(), 0)];
    let decision = ScriptedDecision::new(|i| {
        if i % 2 == 0 {
            (Some("adyen_test"), "SR_V3_HEDGING")
        } else {
            (Some("stripe_test"), "SR_SELECTION_V3_ROUTING")
        }
    });
    let executor = Arc::new(CardEchoExecutor::default());
    let mut orch = orchestrator(
        &cfg,
        directory(),
        decision,
        executor.clone(),
        Arc::new(RecordingReporter::default()),
    );

    let report = orch.run().await.unwrap().aggregator.summarize();
    for (i, card) in executor.calls.lock().unwrap().iter() {
        let expected = if (21..=30).contains(i) || i % 2 == 0 {
            CardLabel::Fail
        } else {
            CardLabel::Success
        };
        assert_eq!(*card, expected, "attempt {}", i);
    }
    assert_eq!(report.per_connector["adyen_test"].successes, 0);
    assert_eq!(report.per_connector["stripe_test"].successes, 15);
}

#[test]
fn out_of_range_connector_rate_is_rejected_up_front() {
    let mut cfg = config(10, 60);
    cfg.connector_success_rates = vec![("stripe_test".to_string(), 101)];
    let err = SimulationOrchestrator::new(
        &cfg,
        directory(),
        ScriptedDecision::always("stripe_test", "SR_SELECTION_V3_ROUTING"),
        Arc::new(CardEchoExecutor::default()),
        Arc::new(RecordingReporter::default()),
    )
    .err()
    .unwrap();
    assert!(matches!(err, SimError::InvalidConfiguration(_)));
}

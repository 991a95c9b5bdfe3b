use crate::config::SimConfig;
use crate::decision::score::ScoreReporter;
use crate::decision::DecisionGateway;
use crate::directory::{ConnectorDirectory, ConnectorMap};
use crate::domain::attempt::{
    AttemptId, AttemptResult, CardLabel, PhaseKind, SkipReason, SkippedAttempt,
};
use crate::domain::decision::{PaymentAttributes, RankingAlgorithm};
use crate::error::SimError;
use crate::outcomes::card_pool::OutcomePool;
use crate::outcomes::phase_plan::{Phase, PhasePlan};
use crate::payments::simulated::SIMULATED_CONNECTOR;
use crate::payments::{normalize_status, PaymentExecutor};
use crate::report::ResultAggregator;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Completed,
}

#[derive(Debug)]
pub struct SimulationRun {
    pub aggregator: ResultAggregator,
    pub attempts_processed: u32,
    pub cancelled: bool,
}

enum AttemptOutcome {
    Recorded(AttemptResult),
    Skipped(SkippedAttempt),
}

pub struct SimulationOrchestrator {
    plan: PhasePlan,
    pools: BTreeMap<u8, OutcomePool>,
    connector_pools: BTreeMap<String, OutcomePool>,
    ranking: RankingAlgorithm,
    attributes: PaymentAttributes,
    seed: Option<u64>,
    initial_delay: Duration,
    inter_attempt_delay: Duration,
    directory: ConnectorDirectory,
    decision: Arc<dyn DecisionGateway>,
    executor: Arc<dyn PaymentExecutor>,
    reporter: Arc<dyn ScoreReporter>,
    cancel: Arc<AtomicBool>,
    state: RunState,
}

impl SimulationOrchestrator {
    pub fn new(
        cfg: &SimConfig,
        directory: ConnectorDirectory,
        decision: Arc<dyn DecisionGateway>,
        executor: Arc<dyn PaymentExecutor>,
        reporter: Arc<dyn ScoreReporter>,
    ) -> Result<Self, SimError> {
        cfg.validate()?;
        let plan = PhasePlan::plan(cfg.total_attempts, cfg.baseline_success_percent)?;

        let mut pools = BTreeMap::new();
        for phase in plan.phases() {
            if !pools.contains_key(&phase.success_percent) {
                let pool = OutcomePool::with_size(phase.success_percent as i64, cfg.pool_size as usize)?;
                pools.insert(phase.success_percent, pool);
            }
        }

        let mut connector_pools = BTreeMap::new();
        for (connector, percent) in &cfg.connector_success_rates {
            let pool = OutcomePool::with_size(*percent, cfg.pool_size as usize)?;
            connector_pools.insert(connector.clone(), pool);
        }

        Ok(Self {
            plan,
            pools,
            connector_pools,
            ranking: cfg.ranking_algorithm,
            attributes: PaymentAttributes::default(),
            seed: cfg.seed,
            initial_delay: Duration::from_millis(cfg.initial_delay_ms),
            inter_attempt_delay: Duration::from_millis(cfg.inter_attempt_delay_ms),
            directory,
            decision,
            executor,
            reporter,
            cancel: Arc::new(AtomicBool::new(false)),
            state: RunState::Idle,
        })
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn plan(&self) -> &PhasePlan {
        &self.plan
    }

    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    pub async fn run(&mut self) -> Result<SimulationRun, SimError> {
        if self.state != RunState::Idle {
            return Err(SimError::InvalidConfiguration(
                "simulation already ran; build a new orchestrator".to_string(),
            ));
        }

        let connectors = match self.directory.resolve().await {
            Ok(c) => c,
            Err(e) => {
                self.state = RunState::Completed;
                tracing::error!("aborting simulation: {}", e);
                return Err(e);
            }
        };

        self.state = RunState::Running;
        self.log_plan(&connectors);

        if !self.initial_delay.is_zero() {
            tokio::time::sleep(self.initial_delay).await;
        }

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let eligible = connectors.names();
        let mut aggregator = ResultAggregator::default();
        let mut processed = 0_u32;
        let mut cancelled = false;

        for index in 1..=self.plan.total_attempts() {
            if self.cancel.load(Ordering::SeqCst) {
                tracing::warn!("cancellation requested, stopping before attempt {}", index);
                cancelled = true;
                break;
            }

            let Some(phase) = self.plan.phase_of(index).copied() else {
                continue;
            };

            match self
                .run_attempt(index, &phase, &mut rng, &connectors, &eligible)
                .await
            {
                AttemptOutcome::Recorded(result) => aggregator.record(result),
                AttemptOutcome::Skipped(skip) => aggregator.record_skip(skip),
            }
            processed += 1;

            if !self.inter_attempt_delay.is_zero() && index < self.plan.total_attempts() {
                tokio::time::sleep(self.inter_attempt_delay).await;
            }
        }

        self.state = RunState::Completed;
        tracing::info!(
            "simulation finished: {} processed, {} recorded, {} skipped",
            processed,
            aggregator.results().len(),
            aggregator.skipped().len()
        );

        Ok(SimulationRun {
            aggregator,
            attempts_processed: processed,
            cancelled,
        })
    }

    async fn run_attempt(
        &self,
        index: u32,
        phase: &Phase,
        rng: &mut StdRng,
        connectors: &ConnectorMap,
        eligible: &[String],
    ) -> AttemptOutcome {
        let attempt_id = AttemptId::from_index(index);
        let mut card = self
            .pools
            .get(&phase.success_percent)
            .map(|pool| pool.draw(rng))
            .unwrap_or(CardLabel::Fail);

        let decision = self
            .decision
            .decide(&attempt_id, eligible, self.ranking, &self.attributes)
            .await;

        if !decision.priority_map.is_empty() {
            let scores: Vec<String> = decision
                .priority_map
                .iter()
                .map(|(c, s)| format!("{}={}%", c, (s * 100.0) as u32))
                .collect();
            tracing::debug!("{} priority scores: {}", attempt_id, scores.join(", "));
        }

        let Some(connector) = decision.decided_connector.clone() else {
            tracing::warn!("[{}] {} no connector decided, skipping", index, attempt_id);
            return AttemptOutcome::Skipped(SkippedAttempt {
                attempt_id,
                phase: phase.kind,
                reason: SkipReason::NoDecision,
            });
        };

        let Some(account_id) = connectors.account_id(&connector) else {
            tracing::warn!(
                "[{}] {} decided connector {} has no account id, skipping",
                index,
                attempt_id,
                connector
            );
            return AttemptOutcome::Skipped(SkippedAttempt {
                attempt_id,
                phase: phase.kind,
                reason: SkipReason::UnknownConnector(connector),
            });
        };

        // the forced-failure window overrides per-connector rates
        if phase.kind != PhaseKind::ForcedFailure {
            if let Some(pool) = self.connector_pools.get(&connector) {
                card = pool.draw(rng);
                tracing::debug!(
                    "{} redrawn from {} pool at {}%: {}",
                    attempt_id,
                    connector,
                    pool.success_percent(),
                    card.as_str()
                );
            }
        }

        let raw = self
            .executor
            .execute(&attempt_id, &connector, account_id, card)
            .await;
        let status = normalize_status(&raw.status);

        if let Err(e) = self.reporter.report(&connector, status, &attempt_id).await {
            tracing::warn!("{} score update for {} failed: {}", attempt_id, connector, e);
        }

        let processed_by = if raw.simulated {
            SIMULATED_CONNECTOR.to_string()
        } else {
            raw.connector
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| connector.clone())
        };
        let mode = decision.mode();

        tracing::info!(
            "[{}] {} card={} connector={} approach={} mode={:?} status={} error={}",
            index,
            attempt_id,
            card.as_str(),
            processed_by,
            decision.routing_approach,
            mode,
            status,
            raw.error_message.as_deref().unwrap_or("none")
        );

        AttemptOutcome::Recorded(AttemptResult {
            attempt_id,
            phase: phase.kind,
            card_label: card,
            connector,
            processed_by,
            normalized_status: status,
            error_message: raw.error_message,
            routing_approach: decision.routing_approach,
            mode,
        })
    }

    fn log_plan(&self, connectors: &ConnectorMap) {
        tracing::info!(
            "simulating {} payments across {} connectors ({:?})",
            self.plan.total_attempts(),
            connectors.len(),
            connectors.names()
        );
        for phase in self.plan.phases() {
            tracing::info!(
                "phase {:<14} attempts {}..={} ({} payments) at {}% success",
                phase.kind.as_str(),
                phase.after + 1,
                phase.through,
                phase.len(),
                phase.success_percent
            );
        }
        for (connector, pool) in &self.connector_pools {
            tracing::info!(
                "connector {} runs at {}% success outside the forced-failure window",
                connector,
                pool.success_percent()
            );
        }
    }
}

use routing_feedback_sim::config::SimConfig;
use routing_feedback_sim::decision::client::DecisionEngineClient;
use routing_feedback_sim::directory::remote::ProfileConnectorLookup;
use routing_feedback_sim::directory::{ConnectorDirectory, ConnectorSource};
use routing_feedback_sim::payments::hyperswitch::HyperswitchExecutor;
use routing_feedback_sim::report::render::render;
use routing_feedback_sim::report::summarizer::{LlmSummarizer, RunSummarizer};
use routing_feedback_sim::service::orchestrator::SimulationOrchestrator;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = SimConfig::from_env();
    let client = reqwest::Client::new();

    let decision_client = Arc::new(DecisionEngineClient {
        base_url: cfg.decision_base_url.clone(),
        merchant_id: cfg.decision_merchant_id.clone(),
        elimination_enabled: cfg.elimination_enabled,
        timeout: cfg.http_timeout(),
        client: client.clone(),
    });

    let executor = Arc::new(HyperswitchExecutor {
        base_url: cfg.payments_base_url.clone(),
        api_key: cfg.payments_api_key.clone(),
        profile_id: cfg.payments_profile_id.clone(),
        timeout: cfg.http_timeout(),
        client: client.clone(),
    });

    let remote: Option<Box<dyn ConnectorSource>> = cfg.connector_lookup_url.as_ref().map(|url| {
        Box::new(ProfileConnectorLookup {
            base_url: url.clone(),
            merchant_id: cfg.payments_merchant_id.clone(),
            api_key: cfg.payments_api_key.clone(),
            timeout: cfg.http_timeout(),
            client: client.clone(),
        }) as Box<dyn ConnectorSource>
    });

    let directory = ConnectorDirectory {
        static_connectors: cfg.static_connectors.clone(),
        profile_id: cfg.payments_profile_id.clone(),
        remote,
    };

    let mut orchestrator = SimulationOrchestrator::new(
        &cfg,
        directory,
        decision_client.clone(),
        executor,
        decision_client,
    )?;

    let cancel = orchestrator.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, finishing the current attempt");
            cancel.store(true, Ordering::SeqCst);
        }
    });

    let run = orchestrator.run().await?;

    let summarizer = cfg.summarizer_url.as_ref().map(|url| LlmSummarizer {
        url: url.clone(),
        timeout: cfg.http_timeout(),
        client: client.clone(),
    });
    let report = run
        .aggregator
        .summarize_with(summarizer.as_ref().map(|s| s as &dyn RunSummarizer))
        .await;

    println!("{}", render(&report, cfg.report_format)?);
    if run.cancelled {
        tracing::warn!(
            "run cancelled after {} of {} attempts",
            run.attempts_processed,
            orchestrator.plan().total_attempts()
        );
    }
    Ok(())
}

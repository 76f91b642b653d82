use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use rusqlite::Connection;
use tracing::{info, warn};

use skynet_agent::anthropic::AnthropicProvider;
use skynet_agent::openai::OpenAiProvider;
use skynet_agent::prompt::PromptBuilder;
use skynet_agent::provider::LlmProvider;
use skynet_agent::router::{ProviderRouter, ProviderSlot};
use skynet_agent::runtime::AgentRuntime;
use skynet_backup::BackupService;
use skynet_core::config::SkynetConfig;
use skynet_fileproc::audio::AsrEngine;
use skynet_fileproc::service::FileProcessor;
use skynet_graph::GraphClient;
use skynet_ingestion::IngestionPipeline;
use skynet_knowledge::KnowledgeService;
use skynet_memory::manager::MemoryManager;
use skynet_ner::NerClient;
use skynet_scheduler::{Schedule, SchedulerEngine, SchedulerHandle};
use skynet_vector::VectorStore;

mod app;
mod auth;
mod http;
mod jobs;
mod llm_adapters;

use llm_adapters::{AgentCompletion, AgentExtractor, AgentVision, NullPdfRenderer};

/// The 6 jobs §4.9 expects to exist from the first boot onward. Re-running
/// main() is idempotent: `seed_jobs` only inserts actions missing from the
/// `jobs` table.
const SEEDED_JOBS: &[(&str, &str)] = &[
    ("morning_summary", "Morning summary"),
    ("noon_checkin", "Noon check-in"),
    ("evening_summary", "Evening summary"),
    ("reminder_check", "Reminder check"),
    ("smart_alerts", "Smart alerts"),
    ("daily_backup", "Daily backup"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skynet_gateway=info,tower_http=debug".into()),
        )
        .init();

    let config_path = std::env::var("SKYNET_CONFIG").ok();
    let config = SkynetConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        warn!("Config load failed ({}), using defaults", e);
        SkynetConfig::default()
    });

    let bind = config.gateway.bind.clone();
    let port = config.gateway.port;

    let graph = Arc::new(GraphClient::connect(&config.graph).await?);
    let vector = Arc::new(VectorStore::connect(&config.vector).await?);
    let knowledge = Arc::new(KnowledgeService::new(graph.clone(), vector.clone()));

    let memory = MemoryManager::new(open_sqlite(&config.memory.path)?);
    // `BackupService` takes its own Arc<MemoryManager> so its dump reads
    // don't contend with the main connection's lock; both are separate
    // sqlite connections onto the same on-disk file.
    let backup_memory = Arc::new(MemoryManager::new(open_sqlite(&config.memory.path)?));

    let scheduler_db_path = sibling_db_path(&config.memory.path, "scheduler.db");
    let scheduler_handle = SchedulerHandle::new(open_sqlite(&scheduler_db_path)?)?;
    let (fired_tx, fired_rx) = tokio::sync::mpsc::channel(64);
    let scheduler_engine = SchedulerEngine::new(open_sqlite(&scheduler_db_path)?, Some(fired_tx))?;
    seed_jobs(&scheduler_handle, &config)?;

    let provider = build_provider(&config)?;
    let prompt = PromptBuilder::load(None, None);
    let agent = Arc::new(AgentRuntime::new(provider, prompt, config.agent.model.clone()));

    let ner_client = Arc::new(NerClient::new(&config.ner));
    let ner_extractor: Arc<dyn skynet_ner::Extractor> = Arc::new(AgentExtractor::new(agent.clone()));
    let llm_completion: Arc<dyn skynet_ingestion::Completion> = Arc::new(AgentCompletion::new(agent.clone()));
    let ingestion = Arc::new(IngestionPipeline::new(
        knowledge.clone(),
        vector.clone(),
        ner_client,
        ner_extractor,
        llm_completion,
        config.ingestion.clone(),
    ));

    let vision: Arc<dyn skynet_fileproc::vision::VisionPort> = Arc::new(AgentVision::new(agent.clone()));
    let pdf_renderer: Arc<dyn skynet_fileproc::pdf::PdfRenderer> = Arc::new(NullPdfRenderer);
    let asr = Arc::new(AsrEngine::new(config.fileproc.whisper_model_path.clone()));
    let fileproc = Arc::new(FileProcessor::new(
        vision,
        pdf_renderer,
        asr,
        ingestion.clone(),
        knowledge.clone(),
        vector.clone(),
    ));

    let backup = Arc::new(BackupService::new(graph.clone(), vector.clone(), backup_memory, &config.backup));

    let state = Arc::new(app::AppState::new(
        config,
        agent,
        memory,
        knowledge,
        graph,
        vector,
        ingestion,
        fileproc,
        backup,
        scheduler_handle,
    ));

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(scheduler_engine.run(shutdown_rx));
    tokio::spawn(jobs::run_dispatch_loop(state.clone(), fired_rx));

    let router = app::build_router(state.clone());
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    info!("skynet gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let result = axum::serve(listener, router).await;
    let _ = shutdown_tx.send(true);
    result?;

    Ok(())
}

/// Picks the configured provider (`skynet_core::config::ProvidersConfig`).
/// Both configured → routed through `ProviderRouter` with Anthropic first.
/// Neither configured is a startup failure (exit code 1, §6): there is no
/// useful default.
fn build_provider(config: &SkynetConfig) -> anyhow::Result<Box<dyn LlmProvider>> {
    let anthropic = config
        .providers
        .anthropic
        .as_ref()
        .map(|c| Box::new(AnthropicProvider::new(c.api_key.clone(), Some(c.base_url.clone()))) as Box<dyn LlmProvider>);
    let openai = config
        .providers
        .openai
        .as_ref()
        .map(|c| Box::new(OpenAiProvider::new(c.api_key.clone(), Some(c.base_url.clone()))) as Box<dyn LlmProvider>);

    match (anthropic, openai) {
        (Some(a), Some(o)) => Ok(Box::new(ProviderRouter::new(vec![ProviderSlot::new(a, 1), ProviderSlot::new(o, 1)]))),
        (Some(a), None) => Ok(a),
        (None, Some(o)) => Ok(o),
        (None, None) => Err(anyhow::anyhow!("no LLM provider configured: set providers.anthropic or providers.openai")),
    }
}

fn seed_jobs(handle: &SchedulerHandle, config: &SkynetConfig) -> anyhow::Result<()> {
    let existing: std::collections::HashSet<String> =
        handle.list_jobs()?.into_iter().map(|j| j.action).collect();

    let sc = &config.scheduler;
    let to_utc = |h: u32| skynet_scheduler::schedule::local_hour_to_utc(h, sc.tz_offset_hours);
    let schedules: &[(&str, Schedule)] = &[
        ("morning_summary", Schedule::Daily { hour: to_utc(sc.morning_summary_hour) as u8, minute: 0 }),
        ("noon_checkin", Schedule::Daily { hour: to_utc(sc.noon_checkin_hour) as u8, minute: 0 }),
        ("evening_summary", Schedule::Daily { hour: to_utc(sc.evening_summary_hour) as u8, minute: 0 }),
        ("reminder_check", Schedule::Interval { every_secs: sc.reminder_check_interval_min as u64 * 60 }),
        ("smart_alerts", Schedule::Interval { every_secs: sc.smart_alerts_interval_hours as u64 * 3600 }),
        ("daily_backup", Schedule::Daily { hour: to_utc(sc.daily_backup_hour) as u8, minute: 0 }),
    ];

    for (action, label) in SEEDED_JOBS {
        if existing.contains(*action) {
            continue;
        }
        let schedule = schedules.iter().find(|(a, _)| a == action).map(|(_, s)| s.clone()).unwrap();
        handle.add_job(label, schedule, action)?;
        info!(action, "seeded scheduled job");
    }
    Ok(())
}

fn open_sqlite(path: &str) -> anyhow::Result<Connection> {
    if let Some(parent) = Path::new(path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(Connection::open(path)?)
}

fn sibling_db_path(path: &str, filename: &str) -> String {
    let p = Path::new(path);
    match p.parent() {
        Some(parent) => parent.join(filename).to_string_lossy().into_owned(),
        None => filename.to_string(),
    }
}

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use dashmap::DashMap;
use tokio_util::sync::CancellationToken;

use skynet_agent::runtime::AgentRuntime;
use skynet_backup::BackupService;
use skynet_core::config::SkynetConfig;
use skynet_fileproc::service::FileProcessor;
use skynet_graph::GraphClient;
use skynet_ingestion::IngestionPipeline;
use skynet_knowledge::KnowledgeService;
use skynet_memory::manager::MemoryManager;
use skynet_scheduler::SchedulerHandle;
use skynet_vector::VectorStore;

/// Central shared state — passed as `Arc<AppState>` to all Axum handlers
/// and implements `MessageContext` for the chat pipeline.
pub struct AppState {
    pub config: SkynetConfig,
    pub event_seq: AtomicU64,
    pub agent: Arc<AgentRuntime>,
    pub memory: MemoryManager,
    pub knowledge: Arc<KnowledgeService>,
    pub graph: Arc<GraphClient>,
    pub vector: Arc<VectorStore>,
    pub ingestion: Arc<IngestionPipeline>,
    pub fileproc: Arc<FileProcessor>,
    pub backup: Arc<BackupService>,
    pub scheduler: SchedulerHandle,
    /// In-memory per-session proactive notification queue (§6 streaming
    /// contract), keyed by session id.
    pub notifications: DashMap<String, Vec<String>>,
    /// Cancellation tokens for in-flight long-running operations (streaming
    /// chat turns, file ingestion), keyed by an operation id so a client can
    /// request early cancellation.
    pub active_operations: DashMap<String, CancellationToken>,
}

#[allow(clippy::too_many_arguments)]
impl AppState {
    pub fn new(
        config: SkynetConfig,
        agent: Arc<AgentRuntime>,
        memory: MemoryManager,
        knowledge: Arc<KnowledgeService>,
        graph: Arc<GraphClient>,
        vector: Arc<VectorStore>,
        ingestion: Arc<IngestionPipeline>,
        fileproc: Arc<FileProcessor>,
        backup: Arc<BackupService>,
        scheduler: SchedulerHandle,
    ) -> Self {
        Self {
            config,
            event_seq: AtomicU64::new(0),
            agent,
            memory,
            knowledge,
            graph,
            vector,
            ingestion,
            fileproc,
            backup,
            scheduler,
            notifications: DashMap::new(),
            active_operations: DashMap::new(),
        }
    }

    pub fn next_seq(&self) -> u64 {
        self.event_seq.fetch_add(1, Ordering::Relaxed)
    }
}

impl skynet_agent::pipeline::MessageContext for AppState {
    fn agent(&self) -> &AgentRuntime {
        &self.agent
    }

    fn memory(&self) -> &MemoryManager {
        &self.memory
    }

    fn knowledge(&self) -> &KnowledgeService {
        &self.knowledge
    }
}

/// Builds the full §6 REST surface. Every handler module owns one facet
/// of the surface; `http::error::ApiError` centralises the
/// `SkynetError` → HTTP mapping so handlers just return `ApiResult<T>`.
pub fn build_router(state: Arc<AppState>) -> Router {
    use crate::http::*;

    let chat_routes = Router::new()
        .route("/", post(chat::chat_handler))
        .route("/stream", post(chat::chat_stream_handler))
        .route("/summary", get(chat::chat_summary_handler));

    let ingest_routes = Router::new()
        .route("/text", post(ingest::ingest_text_handler))
        .route("/file", post(ingest::ingest_file_handler))
        .route("/url", post(ingest::ingest_url_handler))
        .route("/file/{hash}", get(ingest::download_file_handler));

    let search_routes = Router::new().route("/", post(search::search_handler));

    let financial_routes = Router::new()
        .route("/report", get(financial::report_handler))
        .route("/debts", get(financial::debts_handler))
        .route("/debts/payment", post(financial::debt_payment_handler))
        .route("/alerts", get(financial::alerts_handler));

    let reminder_routes = Router::new()
        .route("/", get(reminders::list_handler))
        .route("/action", post(reminders::action_handler))
        .route("/update", post(reminders::update_handler))
        .route("/delete", post(reminders::delete_handler))
        .route("/delete-all", post(reminders::delete_all_handler))
        .route("/merge-duplicates", post(reminders::merge_duplicates_handler));

    let task_routes = Router::new()
        .route("/", get(tasks::list_handler))
        .route("/update", post(tasks::update_handler));

    let project_routes = Router::new()
        .route("/", get(projects::list_handler))
        .route("/update", post(projects::update_handler))
        .route("/merge", post(projects::merge_handler))
        .route("/{name}", get(projects::get_handler))
        .route("/{name}", delete(projects::delete_handler));

    let knowledge_routes = Router::new()
        .route("/", get(knowledge::list_handler))
        .route("/update", post(knowledge::update_handler));

    let inventory_routes = Router::new()
        .route("/", get(inventory::list_handler))
        .route("/summary", get(inventory::summary_handler))
        .route("/item", post(inventory::upsert_item_handler))
        .route("/item/location", post(inventory::update_location_handler))
        .route("/item/quantity", post(inventory::update_quantity_handler))
        .route("/by-file/{hash}", get(inventory::by_file_handler))
        .route("/by-barcode/{code}", get(inventory::by_barcode_handler))
        .route("/unused", get(inventory::unused_handler))
        .route("/report", get(inventory::report_handler))
        .route("/duplicates", get(inventory::duplicates_handler))
        .route("/search-similar", post(inventory::search_similar_handler));

    let productivity_routes = Router::new()
        .route("/sprints", get(productivity::list_sprints_handler))
        .route("/sprints", post(productivity::upsert_sprint_handler))
        .route("/sprints/burndown", get(productivity::burndown_handler))
        .route("/sprints/velocity", get(productivity::velocity_handler))
        .route("/focus/start", post(productivity::focus_start_handler))
        .route("/focus/complete", post(productivity::focus_complete_handler))
        .route("/focus/stats", get(productivity::focus_stats_handler))
        .route("/timeblock/suggest", get(productivity::timeblock_suggest_handler))
        .route("/timeblock/apply", post(productivity::timeblock_apply_handler));

    let proactive_routes = Router::new()
        .route("/morning-summary", post(proactive::morning_summary_handler))
        .route("/noon-checkin", post(proactive::noon_checkin_handler))
        .route("/evening-summary", post(proactive::evening_summary_handler))
        .route("/due-reminders", get(proactive::due_reminders_handler))
        .route("/advance-reminder", post(proactive::advance_reminder_handler))
        .route("/stalled-projects", get(proactive::stalled_projects_handler))
        .route("/old-debts", get(proactive::old_debts_handler))
        .route("/reschedule-persistent", post(proactive::reschedule_persistent_handler));

    let backup_routes = Router::new()
        .route("/create", post(backup::create_handler))
        .route("/list", get(backup::list_handler))
        .route("/restore/{timestamp}", post(backup::restore_handler));

    let graphviz_routes = Router::new()
        .route("/export", get(graphviz::export_handler))
        .route("/schema", get(graphviz::schema_handler))
        .route("/stats", get(graphviz::stats_handler))
        .route("/image", get(graphviz::image_handler));

    Router::new()
        .route("/", get(ui::ui_handler))
        .route("/health", get(health::health_handler))
        .route("/notifications", get(notifications::notifications_handler))
        .nest("/chat", chat_routes)
        .nest("/ingest", ingest_routes)
        .nest("/search", search_routes)
        .nest("/financial", financial_routes)
        .nest("/reminders", reminder_routes)
        .nest("/tasks", task_routes)
        .nest("/projects", project_routes)
        .nest("/knowledge", knowledge_routes)
        .nest("/inventory", inventory_routes)
        .nest("/productivity", productivity_routes)
        .nest("/proactive", proactive_routes)
        .nest("/backup", backup_routes)
        .nest("/graph", graphviz_routes)
        .route_layer(axum::middleware::from_fn_with_state(state.clone(), crate::auth::require_auth))
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 18789;
pub const DEFAULT_BIND: &str = "127.0.0.1";

/// Top-level config (skynet.toml + SKYNET_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkynetConfig {
    pub gateway: GatewayConfig,
    pub agent: AgentConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub vector: VectorConfig,
    #[serde(default)]
    pub ner: NerConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub thresholds: ThresholdsConfig,
    #[serde(default)]
    pub prayer: PrayerConfig,
    #[serde(default)]
    pub backup: BackupConfig,
    #[serde(default)]
    pub ingestion: IngestionConfig,
    #[serde(default)]
    pub fileproc: FileprocConfig,
}

impl Default for SkynetConfig {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig {
                port: DEFAULT_PORT,
                bind: DEFAULT_BIND.to_string(),
                auth: AuthConfig {
                    mode: AuthMode::Token,
                    token: Some("change-me".to_string()),
                },
            },
            agent: AgentConfig {
                model: "claude-sonnet-4-6".to_string(),
            },
            providers: ProvidersConfig::default(),
            memory: MemoryConfig::default(),
            graph: GraphConfig::default(),
            vector: VectorConfig::default(),
            ner: NerConfig::default(),
            scheduler: SchedulerConfig::default(),
            thresholds: ThresholdsConfig::default(),
            prayer: PrayerConfig::default(),
            backup: BackupConfig::default(),
            ingestion: IngestionConfig::default(),
            fileproc: FileprocConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub mode: AuthMode,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AuthMode {
    Token,
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_model")]
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProvidersConfig {
    pub anthropic: Option<AnthropicConfig>,
    pub openai: Option<OpenAiProviderConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiProviderConfig {
    pub api_key: String,
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicConfig {
    pub api_key: String,
    #[serde(default = "default_anthropic_base_url")]
    pub base_url: String,
}

/// Three-layer memory store (§4.8). Backed by SQLite — see `skynet-memory`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
    /// Working-memory compression threshold (default 15, §4.8).
    #[serde(default = "default_compress_threshold")]
    pub compress_threshold: usize,
    /// Run a daily summary every N messages (§4.1 post-processing, default 10).
    #[serde(default = "default_summary_interval")]
    pub summary_every_messages: u32,
    /// Refresh core memory every M messages (§4.1 post-processing, default 20).
    #[serde(default = "default_core_refresh_interval")]
    pub core_refresh_every_messages: u32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            compress_threshold: default_compress_threshold(),
            summary_every_messages: default_summary_interval(),
            core_refresh_every_messages: default_core_refresh_interval(),
        }
    }
}

/// Graph store connection (§2, Graph Store). Grounded on neo4rs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    #[serde(default = "default_graph_uri")]
    pub uri: String,
    #[serde(default = "default_graph_user")]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_graph_max_hops")]
    pub max_hops: u32,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: default_graph_uri(),
            user: default_graph_user(),
            password: String::new(),
            max_hops: default_graph_max_hops(),
        }
    }
}

/// Vector store connection (§2, Vector Store). Grounded on qdrant-client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorConfig {
    #[serde(default = "default_vector_url")]
    pub url: String,
    #[serde(default = "default_vector_collection")]
    pub collection: String,
    #[serde(default = "default_embed_dim")]
    pub embed_dim: u64,
    /// Embedding-model HTTP endpoint (POST {input} -> {embedding: [f32; embed_dim]}).
    /// The model runtime itself is an external collaborator (§1 Out of scope).
    #[serde(default = "default_embed_url")]
    pub embed_url: String,
}

impl Default for VectorConfig {
    fn default() -> Self {
        Self {
            url: default_vector_url(),
            collection: default_vector_collection(),
            embed_dim: default_embed_dim(),
            embed_url: default_embed_url(),
        }
    }
}

/// Arabic NER (§9.1 of SPEC_FULL — an LLM-backed extraction call).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NerConfig {
    #[serde(default = "default_ner_confidence_floor")]
    pub confidence_floor: f64,
}

impl Default for NerConfig {
    fn default() -> Self {
        Self {
            confidence_floor: default_ner_confidence_floor(),
        }
    }
}

/// Proactive scheduler job hours/intervals (§4.9). Hours are local time;
/// converted to UTC via `(local_hour - tz_offset_hours) mod 24`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_tz_offset_hours")]
    pub tz_offset_hours: i32,
    #[serde(default = "default_morning_hour")]
    pub morning_summary_hour: u32,
    #[serde(default = "default_noon_hour")]
    pub noon_checkin_hour: u32,
    #[serde(default = "default_evening_hour")]
    pub evening_summary_hour: u32,
    #[serde(default = "default_reminder_check_interval_min")]
    pub reminder_check_interval_min: i64,
    #[serde(default = "default_smart_alerts_interval_hours")]
    pub smart_alerts_interval_hours: i64,
    #[serde(default = "default_backup_hour")]
    pub daily_backup_hour: u32,
    /// Days of project/task inactivity before a project is "stalled".
    #[serde(default = "default_stalled_days")]
    pub stalled_project_days: i64,
    /// Days before an open debt is flagged as "old".
    #[serde(default = "default_old_debt_days")]
    pub old_debt_days: i64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tz_offset_hours: default_tz_offset_hours(),
            morning_summary_hour: default_morning_hour(),
            noon_checkin_hour: default_noon_hour(),
            evening_summary_hour: default_evening_hour(),
            reminder_check_interval_min: default_reminder_check_interval_min(),
            smart_alerts_interval_hours: default_smart_alerts_interval_hours(),
            daily_backup_hour: default_backup_hour(),
            stalled_project_days: default_stalled_days(),
            old_debt_days: default_old_debt_days(),
        }
    }
}

/// Retrieval/resolution thresholds (§6 env vars).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdsConfig {
    #[serde(default = "default_self_rag_threshold")]
    pub self_rag_threshold: f64,
    #[serde(default = "default_person_threshold")]
    pub entity_resolution_person_threshold: f64,
    #[serde(default = "default_entity_threshold")]
    pub entity_resolution_default_threshold: f64,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            self_rag_threshold: default_self_rag_threshold(),
            entity_resolution_person_threshold: default_person_threshold(),
            entity_resolution_default_threshold: default_entity_threshold(),
        }
    }
}

/// Prayer-time settings, consumed only by the reminder prayer-relative due
/// date feature (§3, Reminder.prayer).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PrayerConfig {
    pub city: Option<String>,
    pub country: Option<String>,
    pub method: Option<String>,
    #[serde(default)]
    pub offset_minutes: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupConfig {
    #[serde(default = "default_backup_dir")]
    pub dir: String,
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            dir: default_backup_dir(),
            retention_days: default_retention_days(),
        }
    }
}

/// Ingestion pipeline chunking (§4.2: translate → chunk → enrich → embed +
/// extract → upsert). Storage chunks are small and overlapping for
/// retrieval precision; extraction chunks are larger since the extractor
/// benefits from more surrounding context per call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionConfig {
    /// Token window size for storage/embedding chunks (default ~1500).
    #[serde(default = "default_chunk_tokens")]
    pub chunk_tokens: usize,
    /// Overlap between consecutive storage chunks (default ~150).
    #[serde(default = "default_chunk_overlap_tokens")]
    pub chunk_overlap_tokens: usize,
    /// Token window size for fact-extraction chunks (default ~3000).
    #[serde(default = "default_extraction_chunk_tokens")]
    pub extraction_chunk_tokens: usize,
    /// Max number of storage-chunk embed+upsert tasks run concurrently.
    #[serde(default = "default_ingestion_concurrency")]
    pub concurrency: usize,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            chunk_tokens: default_chunk_tokens(),
            chunk_overlap_tokens: default_chunk_overlap_tokens(),
            extraction_chunk_tokens: default_extraction_chunk_tokens(),
            concurrency: default_ingestion_concurrency(),
        }
    }
}

/// File-processing pipeline (§4.3: vision, PDF text/OCR fallback, ASR,
/// barcode). The ASR engine (`skynet-fileproc::audio::AsrEngine`) lazily
/// loads a `whisper-rs` GGML model from this path on first voice-note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileprocConfig {
    #[serde(default = "default_whisper_model_path")]
    pub whisper_model_path: String,
    #[serde(default = "default_max_vision_pages")]
    pub max_vision_pages: usize,
    #[serde(default = "default_vision_render_dpi")]
    pub vision_render_dpi: u32,
}

impl Default for FileprocConfig {
    fn default() -> Self {
        Self {
            whisper_model_path: default_whisper_model_path(),
            max_vision_pages: default_max_vision_pages(),
            vision_render_dpi: default_vision_render_dpi(),
        }
    }
}

fn default_whisper_model_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.skynet/models/ggml-base.bin", home)
}
fn default_max_vision_pages() -> usize {
    5
}
fn default_vision_render_dpi() -> u32 {
    200
}

fn default_chunk_tokens() -> usize {
    1500
}
fn default_chunk_overlap_tokens() -> usize {
    150
}
fn default_extraction_chunk_tokens() -> usize {
    3000
}
fn default_ingestion_concurrency() -> usize {
    4
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_model() -> String {
    "claude-sonnet-4-6".to_string()
}
fn default_anthropic_base_url() -> String {
    "https://api.anthropic.com".to_string()
}
fn default_openai_base_url() -> String {
    "https://api.openai.com".to_string()
}
fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.skynet/skynet.db", home)
}
fn default_compress_threshold() -> usize {
    15
}
fn default_summary_interval() -> u32 {
    10
}
fn default_core_refresh_interval() -> u32 {
    20
}
fn default_graph_uri() -> String {
    "bolt://127.0.0.1:7687".to_string()
}
fn default_graph_user() -> String {
    "neo4j".to_string()
}
fn default_graph_max_hops() -> u32 {
    3
}
fn default_vector_url() -> String {
    "http://127.0.0.1:6334".to_string()
}
fn default_vector_collection() -> String {
    "skynet_entities".to_string()
}
fn default_embed_dim() -> u64 {
    1024
}
fn default_embed_url() -> String {
    "http://127.0.0.1:8081/embed".to_string()
}
fn default_ner_confidence_floor() -> f64 {
    0.7
}
fn default_tz_offset_hours() -> i32 {
    3 // Asia/Riyadh
}
fn default_morning_hour() -> u32 {
    7
}
fn default_noon_hour() -> u32 {
    13
}
fn default_evening_hour() -> u32 {
    21
}
fn default_reminder_check_interval_min() -> i64 {
    30
}
fn default_smart_alerts_interval_hours() -> i64 {
    6
}
fn default_backup_hour() -> u32 {
    3
}
fn default_stalled_days() -> i64 {
    14
}
fn default_old_debt_days() -> i64 {
    60
}
fn default_self_rag_threshold() -> f64 {
    0.3
}
fn default_person_threshold() -> f64 {
    0.85
}
fn default_entity_threshold() -> f64 {
    0.80
}
fn default_backup_dir() -> String {
    "data/backups".to_string()
}
fn default_retention_days() -> i64 {
    30
}

impl SkynetConfig {
    /// Load config from a TOML file with SKYNET_* env var overrides.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: SkynetConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("SKYNET_").split("_"))
            .extract()
            .map_err(|e| crate::error::SkynetError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.skynet/skynet.toml", home)
}

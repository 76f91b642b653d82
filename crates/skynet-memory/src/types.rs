use serde::{Deserialize, Serialize};

/// What kind of Core-memory entry this is (§4.8). Priority order for prompt
/// injection: instruction > preference > fact > context (higher = first).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryCategory {
    Instruction,
    Preference,
    Fact,
    Context,
}

impl std::fmt::Display for MemoryCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Instruction => write!(f, "instruction"),
            Self::Preference => write!(f, "preference"),
            Self::Fact => write!(f, "fact"),
            Self::Context => write!(f, "context"),
        }
    }
}

impl std::str::FromStr for MemoryCategory {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "instruction" => Ok(Self::Instruction),
            "preference" => Ok(Self::Preference),
            "fact" => Ok(Self::Fact),
            "context" => Ok(Self::Context),
            other => Err(format!("unknown memory category: {other}")),
        }
    }
}

/// How a Core-memory entry was acquired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemorySource {
    /// User explicitly stated this ("I'm vegetarian").
    UserSaid,
    /// AI inferred from conversation context.
    Inferred,
}

impl std::fmt::Display for MemorySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UserSaid => write!(f, "user_said"),
            Self::Inferred => write!(f, "inferred"),
        }
    }
}

impl std::str::FromStr for MemorySource {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user_said" => Ok(Self::UserSaid),
            "inferred" => Ok(Self::Inferred),
            other => Err(format!("unknown memory source: {other}")),
        }
    }
}

/// Single entry in the permanent Core layer — "permanent hash of user
/// preferences/patterns" (§4.8). Keyed by `session_id`; multi-tenant user
/// identity is out of scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreMemory {
    pub id: i64,
    pub session_key: String,
    pub category: MemoryCategory,
    pub key: String,
    pub value: String,
    /// 0.0–1.0 confidence score. Higher confidence wins on upsert.
    pub confidence: f64,
    pub source: MemorySource,
    pub created_at: String,
    pub updated_at: String,
}

/// Single turn in the Working-memory FIFO (§4.8).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingTurn {
    pub role: String,
    pub content: String,
    pub ts: chrono::DateTime<chrono::Utc>,
}

/// Durable conversation log backing working-memory replay after a restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub id: i64,
    pub session_key: String,
    pub role: String,
    pub content: String,
    pub model_used: Option<String>,
    pub tokens_in: u32,
    pub tokens_out: u32,
    pub created_at: String,
}

/// Rendered Core-memory context ready for prompt injection.
/// Capped at ~1500 tokens. Priority: instruction > preference > fact > context.
#[derive(Debug, Clone)]
pub struct UserContext {
    pub session_key: String,
    pub rendered: String,
    pub memory_count: usize,
    pub built_at: chrono::DateTime<chrono::Utc>,
}

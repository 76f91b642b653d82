use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque session identifier supplied by the client (§4.1 contract:
/// `chat(message, session_id)`). No user/tenant concept is layered on top —
/// multi-tenant isolation is out of scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey(pub String);

impl SessionKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Shared domain vocabulary (§3). Kept in the base crate since tools,
/// ingestion, and the graph service all need to agree on these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
    Cancelled,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
            TaskStatus::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(Self::Todo),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown task status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyLevel {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Phase,
    Topic,
}

/// Normalised from any LLM-produced variant ("i owe", "they owe me", …) at
/// the ingestion boundary — never left ambiguous past that point (§3, §8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtDirection {
    IOwe,
    OwedToMe,
}

impl DebtDirection {
    /// Best-effort normalisation of free-form LLM output. Defaults to
    /// `IOwe` only when nothing matches `owed`/`لي` — callers should treat an
    /// ambiguous source phrase as a validation error before reaching here.
    pub fn normalize(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        if lower.contains("owed_to_me")
            || lower.contains("owed to me")
            || lower.contains("they owe")
            || lower.contains("لي")
        {
            DebtDirection::OwedToMe
        } else {
            DebtDirection::IOwe
        }
    }
}

impl fmt::Display for DebtDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DebtDirection::IOwe => "i_owe",
            DebtDirection::OwedToMe => "owed_to_me",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtStatus {
    Open,
    Partial,
    Paid,
}

impl fmt::Display for DebtStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DebtStatus::Open => "open",
            DebtStatus::Partial => "partial",
            DebtStatus::Paid => "paid",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderType {
    OneTime,
    Recurring,
    Persistent,
    EventBased,
    Financial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl std::str::FromStr for Recurrence {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            other => Err(format!("unknown recurrence: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderStatus {
    Pending,
    Snoozed,
    Done,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListType {
    Shopping,
    Ideas,
    Checklist,
    Reference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SprintStatus {
    Active,
    Completed,
}

/// §4.4 property-hiding list: stripped from any LLM-facing context formatter.
pub const INTERNAL_PROPS: &[&str] = &["name_aliases", "created_at", "updated_at", "file_hash", "source"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debt_direction_normalizes_arabic_and_english_variants() {
        assert_eq!(DebtDirection::normalize("owed_to_me"), DebtDirection::OwedToMe);
        assert_eq!(DebtDirection::normalize("they owe me 50"), DebtDirection::OwedToMe);
        assert_eq!(DebtDirection::normalize("فلان مديون لي"), DebtDirection::OwedToMe);
        assert_eq!(DebtDirection::normalize("i_owe"), DebtDirection::IOwe);
    }

    #[test]
    fn task_status_roundtrips_through_display_and_fromstr() {
        for s in [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done, TaskStatus::Cancelled] {
            let rendered = s.to_string();
            let parsed: TaskStatus = rendered.parse().unwrap();
            assert_eq!(parsed, s);
        }
    }
}

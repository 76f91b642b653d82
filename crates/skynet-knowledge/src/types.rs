use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use skynet_core::types::{
    DebtDirection, DebtStatus, EnergyLevel, ListType, Recurrence, ReminderStatus, ReminderType,
    SectionKind, SprintStatus, TaskStatus,
};

/// Facts extracted from ingestion (§4.2 step 4) or NER, routed to the right
/// upsert by `label` in `upsert_from_facts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedFact {
    pub label: String,
    pub name: String,
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub relationships: Vec<ExtractedRelationship>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedRelationship {
    pub rel_type: String,
    pub target_label: String,
    pub target_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub name_ar: Option<String>,
    pub name_aliases: Vec<String>,
    pub company: Option<String>,
    pub date_of_birth: Option<String>,
    pub date_of_birth_hijri: Option<bool>,
    pub id_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    pub name_aliases: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub status: TaskStatus,
    pub priority: i32,
    pub description: Option<String>,
    pub section_count: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub project: String,
    pub kind: SectionKind,
    pub order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    pub status: TaskStatus,
    pub project: Option<String>,
    pub sprint: Option<String>,
    pub estimated_duration: Option<i32>,
    pub energy_level: Option<EnergyLevel>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sprint {
    pub name: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub project: Option<String>,
    pub goal: String,
    pub status: SprintStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusSession {
    pub id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_min: i32,
    pub task: Option<String>,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub amount: f64,
    pub currency: String,
    pub category: String,
    pub vendor: Option<String>,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debt {
    pub id: String,
    pub person: String,
    pub amount: f64,
    pub currency: String,
    pub direction: DebtDirection,
    pub status: DebtStatus,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtPayment {
    pub id: String,
    pub debt_id: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub title: String,
    pub due_date: DateTime<Utc>,
    pub reminder_type: ReminderType,
    pub recurrence: Option<Recurrence>,
    pub status: ReminderStatus,
    pub priority: i32,
    pub description: Option<String>,
    pub persistent: bool,
    pub prayer: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Knowledge {
    pub title: String,
    pub content: String,
    pub topic: Option<String>,
    pub category: Option<String>,
    pub reference_numbers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicOrTag {
    pub name: String,
    pub name_aliases: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub quantity: i32,
    pub location: Option<String>,
    pub category: String,
    pub brand: Option<String>,
    pub condition: Option<String>,
    pub barcode: Option<String>,
    pub barcode_type: Option<String>,
    pub last_used_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct List {
    pub name: String,
    pub list_type: ListType,
    pub project: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListEntry {
    pub id: String,
    pub list: String,
    pub text: String,
    pub checked: bool,
    pub order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileNode {
    pub sha256: String,
    pub filename: String,
    pub mime: String,
    pub size: i64,
    pub ingested_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Idea {
    pub name: String,
    pub content: String,
}

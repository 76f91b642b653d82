//! Reminder entity and delivery types (§3, §4.9) — shared between the graph
//! service, the tool layer, and the scheduler's notification path.

use crate::types::{Recurrence, ReminderStatus, ReminderType};
use serde::{Deserialize, Serialize};

/// A Reminder node's full field set (§3). `due_date` is never empty; a
/// recurring reminder's `due_date` is always in the future after
/// `advance_recurring_reminder`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub title: String,
    pub due_date: chrono::DateTime<chrono::Utc>,
    pub reminder_type: ReminderType,
    pub recurrence: Option<Recurrence>,
    pub status: ReminderStatus,
    pub priority: i32,
    pub description: Option<String>,
    pub persistent: bool,
    /// Prayer-relative due date ("after maghrib"), resolved against
    /// `PrayerConfig` at creation time — stored verbatim for display.
    pub prayer: Option<String>,
}

/// Stored as a JSON blob keyed by job ID in the scheduler's `jobs.action`
/// column. Read by the notification router when the scheduled fire time
/// arrives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderAction {
    /// Session to deliver the notification to.
    pub session_key: String,
    /// Reminder ID in the graph, so the router can re-fetch current state
    /// (title may have changed via `update_reminder` since the job was set).
    pub reminder_id: String,
    /// Text to deliver.
    pub message: String,
}

/// Parsed and ready-to-send reminder notification, handed from the
/// scheduler's due-reminder pass to the REST proactive-notification path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderDelivery {
    pub job_id: String,
    pub session_key: String,
    pub message: String,
}

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use skynet_core::types::Recurrence;

use crate::error::{KnowledgeError, Result};
use crate::service::KnowledgeService;

impl KnowledgeService {
    /// Cascades to the project's tasks, sections, lists, and list entries
    /// (§4.4).
    pub async fn delete_project(&self, name: &str) -> Result<()> {
        let cypher = "MATCH (p:Project {name: $name}) \
                       OPTIONAL MATCH (p)<-[:BELONGS_TO]-(t:Task) \
                       OPTIONAL MATCH (p)-[:HAS_SECTION]->(s:Section) \
                       OPTIONAL MATCH (p)<-[:BELONGS_TO]-(l:List) \
                       OPTIONAL MATCH (l)-[:HAS_ENTRY]->(le:ListEntry) \
                       DETACH DELETE t, s, l, le, p";
        let mut params = HashMap::new();
        params.insert("name".to_string(), json!(name));
        self.graph.execute(cypher, params).await
            .map_err(KnowledgeError::from)
    }

    /// Re-links `HAS_SECTION` and `BELONGS_TO` edges from `source` to
    /// `target`, then deletes `source` (§4.4).
    pub async fn merge_projects(&self, source: &str, target: &str) -> Result<()> {
        self.resolver.merge_entities("Project", source, target).await?;
        Ok(())
    }

    /// Partial update of a reminder's mutable fields (§4.1 `update_reminder`
    /// tool). Only the fields supplied are touched; `merge_node` leaves the
    /// rest untouched.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_reminder(
        &self,
        id: &str,
        title: Option<&str>,
        due_date: Option<DateTime<Utc>>,
        status: Option<&str>,
        priority: Option<i32>,
        description: Option<&str>,
    ) -> Result<()> {
        let mut props: HashMap<String, Value> = HashMap::new();
        if let Some(t) = title {
            props.insert("title".to_string(), json!(t));
        }
        if let Some(d) = due_date {
            props.insert("due_date".to_string(), json!(d.to_rfc3339()));
        }
        if let Some(s) = status {
            props.insert("status".to_string(), json!(s));
        }
        if let Some(p) = priority {
            props.insert("priority".to_string(), json!(p));
        }
        if let Some(desc) = description {
            props.insert("description".to_string(), json!(desc));
        }
        if props.is_empty() {
            return Ok(());
        }
        self.graph.merge_node("Reminder", "id", id, &props).await.map_err(KnowledgeError::from)
    }

    /// Deletes a reminder outright (§4.1 `delete_reminder` tool).
    pub async fn delete_reminder(&self, id: &str) -> Result<()> {
        self.graph.delete_node("Reminder", "id", id, true).await.map_err(KnowledgeError::from)
    }

    /// Moves `due_date` forward by one recurrence period until it lands in
    /// the future (`relativedelta`-style advancement, §4.4).
    pub async fn advance_recurring_reminder(&self, title: &str, recurrence: Recurrence) -> Result<DateTime<Utc>> {
        let row = self
            .graph
            .find_by_property_ci("Reminder", "title", title)
            .await?
            .ok_or_else(|| KnowledgeError::NotFound(format!("reminder {title}")))?;

        let node = row.get("n").and_then(Value::as_object).cloned().unwrap_or_default();
        let mut due: DateTime<Utc> = node
            .get("due_date")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|d| d.with_timezone(&Utc))
            .ok_or_else(|| KnowledgeError::Validation("reminder has no due_date".to_string()))?;

        let now = Utc::now();
        while due <= now {
            due = advance_by(due, recurrence);
        }

        let mut props: HashMap<String, Value> = HashMap::new();
        props.insert("due_date".to_string(), json!(due.to_rfc3339()));
        self.graph.merge_node("Reminder", "title", title, &props).await?;
        Ok(due)
    }
}

fn advance_by(date: DateTime<Utc>, recurrence: Recurrence) -> DateTime<Utc> {
    match recurrence {
        Recurrence::Daily => date + chrono::Duration::days(1),
        Recurrence::Weekly => date + chrono::Duration::weeks(1),
        Recurrence::Monthly => add_months(date, 1),
        Recurrence::Yearly => add_months(date, 12),
    }
}

fn add_months(date: DateTime<Utc>, months: i32) -> DateTime<Utc> {
    use chrono::Datelike;
    let total = date.year() * 12 + (date.month() as i32 - 1) + months;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    date.with_day(1)
        .unwrap()
        .with_year(year)
        .unwrap()
        .with_month(month)
        .unwrap()
        .with_day(day)
        .unwrap()
}

fn days_in_month(year: i32, month: u32) -> u32 {
    use chrono::NaiveDate;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next.unwrap()
        .signed_duration_since(NaiveDate::from_ymd_opt(year, month, 1).unwrap())
        .num_days() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone};

    #[test]
    fn advance_monthly_keeps_day_when_valid() {
        let start = Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap();
        let advanced = advance_by(start, Recurrence::Monthly);
        assert_eq!(advanced.month(), 2);
        assert_eq!(advanced.day(), 15);
    }

    #[test]
    fn advance_monthly_clamps_day_for_shorter_month() {
        let start = Utc.with_ymd_and_hms(2026, 1, 31, 9, 0, 0).unwrap();
        let advanced = advance_by(start, Recurrence::Monthly);
        assert_eq!(advanced.month(), 2);
        assert_eq!(advanced.day(), 28);
    }

    #[test]
    fn advance_yearly_rolls_over_december() {
        let start = Utc.with_ymd_and_hms(2026, 12, 1, 9, 0, 0).unwrap();
        let advanced = advance_by(start, Recurrence::Yearly);
        assert_eq!(advanced.year(), 2027);
        assert_eq!(advanced.month(), 12);
    }
}

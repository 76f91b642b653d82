use std::collections::HashMap;

use serde_json::{json, Value};

use crate::error::Result;
use crate::retrieval::MultiHopRetrieval;
use crate::service::KnowledgeService;

impl KnowledgeService {
    /// `query_person_context` — multi-hop retrieval rooted on the person's
    /// canonical name (§4.7).
    pub async fn query_person_context(&self, name: &str) -> Result<Vec<String>> {
        let canonical = self.resolver.resolve(name, "Person").await?;
        MultiHopRetrieval::new(self.graph.clone())
            .query_entity_context("Person", "name", &canonical)
            .await
    }

    pub async fn query_project_details(&self, name: &str) -> Result<Option<Value>> {
        let cypher = "MATCH (p:Project {name: $name}) \
                       OPTIONAL MATCH (p)-[:HAS_SECTION]->(s:Section) \
                       OPTIONAL MATCH (t:Task)-[:BELONGS_TO]->(p) \
                       RETURN p AS project, collect(DISTINCT s.name) AS sections, collect(DISTINCT t.name) AS tasks";
        let mut params = HashMap::new();
        params.insert("name".to_string(), json!(name));
        let rows = self.graph.query_rows(cypher, params, &["project", "sections", "tasks"]).await?;
        Ok(rows.into_iter().next().map(|row| json!(row)))
    }

    pub async fn query_projects_overview(&self) -> Result<Vec<Value>> {
        let cypher = "MATCH (p:Project) RETURN p.name AS name, p.status AS status, p.priority AS priority \
                       ORDER BY p.priority DESC";
        let rows = self.graph.query_rows(cypher, HashMap::new(), &["name", "status", "priority"]).await?;
        Ok(rows.into_iter().map(|row| json!(row)).collect())
    }

    pub async fn query_knowledge(&self, query: Option<&str>, topic: Option<&str>) -> Result<Vec<Value>> {
        let mut filters = vec!["1 = 1".to_string()];
        let mut params = HashMap::new();
        if let Some(q) = query {
            filters.push("(toLower(k.title) CONTAINS toLower($q) OR toLower(k.content) CONTAINS toLower($q))".to_string());
            params.insert("q".to_string(), json!(q));
        }
        if let Some(t) = topic {
            filters.push("k.topic = $topic".to_string());
            params.insert("topic".to_string(), json!(t));
        }
        let cypher = format!(
            "MATCH (k:Knowledge) WHERE {} RETURN k.title AS title, k.category AS category, k.topic AS topic \
             ORDER BY k.updated_at DESC LIMIT 20",
            filters.join(" AND ")
        );
        let rows = self.graph.query_rows(&cypher, params, &["title", "category", "topic"]).await?;
        Ok(rows.into_iter().map(|row| json!(row)).collect())
    }

    pub async fn query_tasks(&self, project: Option<&str>, status: Option<&str>) -> Result<Vec<Value>> {
        let mut filters = vec!["1 = 1".to_string()];
        let mut params = HashMap::new();
        if let Some(p) = project {
            filters.push("(t)-[:BELONGS_TO]->(:Project {name: $project})".to_string());
            params.insert("project".to_string(), json!(p));
        }
        if let Some(s) = status {
            filters.push("t.status = $status".to_string());
            params.insert("status".to_string(), json!(s));
        }
        let cypher = format!(
            "MATCH (t:Task) WHERE {} RETURN t.name AS name, t.status AS status LIMIT 50",
            filters.join(" AND ")
        );
        let rows = self.graph.query_rows(&cypher, params, &["name", "status"]).await?;
        Ok(rows.into_iter().map(|row| json!(row)).collect())
    }

    pub async fn query_inventory(&self, category: Option<&str>) -> Result<Vec<Value>> {
        let (cypher, mut params): (&str, HashMap<String, Value>) = match category {
            Some(_) => (
                "MATCH (i:Item) WHERE i.category = $category RETURN i.name AS name, i.quantity AS quantity, i.location AS location",
                HashMap::new(),
            ),
            None => (
                "MATCH (i:Item) RETURN i.name AS name, i.quantity AS quantity, i.location AS location",
                HashMap::new(),
            ),
        };
        if let Some(c) = category {
            params.insert("category".to_string(), json!(c.to_lowercase()));
        }
        let rows = self.graph.query_rows(cypher, params, &["name", "quantity", "location"]).await?;
        Ok(rows.into_iter().map(|row| json!(row)).collect())
    }

    pub async fn query_inventory_unused(&self, older_than_days: i64) -> Result<Vec<Value>> {
        let cutoff = chrono::Utc::now() - chrono::Duration::days(older_than_days);
        let cypher = "MATCH (i:Item) WHERE i.last_used_at IS NULL OR i.last_used_at < $cutoff \
                       RETURN i.name AS name, i.last_used_at AS last_used_at";
        let mut params = HashMap::new();
        params.insert("cutoff".to_string(), json!(cutoff.to_rfc3339()));
        let rows = self.graph.query_rows(cypher, params, &["name", "last_used_at"]).await?;
        Ok(rows.into_iter().map(|row| json!(row)).collect())
    }

    pub async fn query_daily_plan(&self, date: chrono::NaiveDate) -> Result<Value> {
        let start = date.and_hms_opt(0, 0, 0).unwrap().and_utc();
        let end = start + chrono::Duration::days(1);
        let cypher = "MATCH (r:Reminder) WHERE r.due_date >= $start AND r.due_date < $end AND r.status = 'pending' \
                       RETURN r.title AS title, r.due_date AS due_date ORDER BY r.due_date";
        let mut params = HashMap::new();
        params.insert("start".to_string(), json!(start.to_rfc3339()));
        params.insert("end".to_string(), json!(end.to_rfc3339()));
        let reminders = self.graph.query_rows(cypher, params, &["title", "due_date"]).await?;
        Ok(json!({ "date": date.to_string(), "reminders": reminders }))
    }

    pub async fn query_financial_report(&self, since: chrono::DateTime<chrono::Utc>) -> Result<Value> {
        let cypher = "MATCH (e:Expense) WHERE e.date >= $since \
                       RETURN e.category AS category, sum(e.amount) AS total ORDER BY total DESC";
        let mut params = HashMap::new();
        params.insert("since".to_string(), json!(since.to_rfc3339()));
        let by_category = self.graph.query_rows(cypher, params, &["category", "total"]).await?;
        Ok(json!({ "since": since.to_rfc3339(), "by_category": by_category }))
    }

    pub async fn query_debts(&self, status: Option<&str>) -> Result<Vec<Value>> {
        let (cypher, mut params): (String, HashMap<String, Value>) = match status {
            Some(_) => (
                "MATCH (d:Debt) WHERE d.status = $status RETURN d.id AS id, d.person AS person, d.amount AS amount, d.direction AS direction".to_string(),
                HashMap::new(),
            ),
            None => (
                "MATCH (d:Debt) RETURN d.id AS id, d.person AS person, d.amount AS amount, d.direction AS direction".to_string(),
                HashMap::new(),
            ),
        };
        if let Some(s) = status {
            params.insert("status".to_string(), json!(s));
        }
        let rows = self.graph.query_rows(&cypher, params, &["id", "person", "amount", "direction"]).await?;
        Ok(rows.into_iter().map(|row| json!(row)).collect())
    }

    pub async fn query_reminders(&self, status: Option<&str>, query: Option<&str>) -> Result<Vec<Value>> {
        let mut filters = vec!["1 = 1".to_string()];
        let mut params = HashMap::new();
        if let Some(s) = status {
            filters.push("r.status = $status".to_string());
            params.insert("status".to_string(), json!(s));
        }
        if let Some(q) = query {
            filters.push("toLower(r.title) CONTAINS toLower($q)".to_string());
            params.insert("q".to_string(), json!(q));
        }
        let cypher = format!(
            "MATCH (r:Reminder) WHERE {} RETURN r.id AS id, r.title AS title, r.due_date AS due_date, r.status AS status \
             ORDER BY r.due_date",
            filters.join(" AND ")
        );
        let rows = self.graph.query_rows(&cypher, params, &["id", "title", "due_date", "status"]).await?;
        Ok(rows.into_iter().map(|row| json!(row)).collect())
    }

    pub async fn query_sprint_active(&self, project: Option<&str>) -> Result<Vec<Value>> {
        let (cypher, mut params): (String, HashMap<String, Value>) = match project {
            Some(_) => (
                "MATCH (s:Sprint {status: 'active'})-[:BELONGS_TO]->(p:Project {name: $project}) \
                 RETURN s.name AS name, s.goal AS goal, s.end_date AS end_date".to_string(),
                HashMap::new(),
            ),
            None => (
                "MATCH (s:Sprint {status: 'active'}) RETURN s.name AS name, s.goal AS goal, s.end_date AS end_date".to_string(),
                HashMap::new(),
            ),
        };
        if let Some(p) = project {
            params.insert("project".to_string(), json!(p));
        }
        let rows = self.graph.query_rows(&cypher, params, &["name", "goal", "end_date"]).await?;
        Ok(rows.into_iter().map(|row| json!(row)).collect())
    }

    pub async fn query_lists(&self, list_type: Option<&str>) -> Result<Vec<Value>> {
        let mut params = HashMap::new();
        let cypher = if let Some(t) = list_type {
            params.insert("type".to_string(), json!(t));
            "MATCH (l:List {type: $type}) RETURN l.name AS name, l.type AS type"
        } else {
            "MATCH (l:List) RETURN l.name AS name, l.type AS type"
        };
        let rows = self.graph.query_rows(cypher, params, &["name", "type"]).await?;
        Ok(rows.into_iter().map(|row| json!(row)).collect())
    }

    pub async fn query_list_entries(&self, list: &str) -> Result<Vec<Value>> {
        let cypher = "MATCH (l:List {name: $list})-[:HAS_ENTRY]->(e:ListEntry) \
                       RETURN e.id AS id, e.text AS text, e.checked AS checked, e.order AS order \
                       ORDER BY e.order";
        let mut params = HashMap::new();
        params.insert("list".to_string(), json!(list));
        let rows = self.graph.query_rows(cypher, params, &["id", "text", "checked", "order"]).await?;
        Ok(rows.into_iter().map(|row| json!(row)).collect())
    }

    pub async fn query_focus_stats(&self, since: chrono::DateTime<chrono::Utc>) -> Result<Value> {
        let cypher = "MATCH (f:FocusSession) WHERE f.start_time >= $since AND f.completed = true \
                       RETURN count(f) AS sessions, sum(f.duration_min) AS total_minutes";
        let mut params = HashMap::new();
        params.insert("since".to_string(), json!(since.to_rfc3339()));
        let rows = self.graph.query_rows(cypher, params, &["sessions", "total_minutes"]).await?;
        Ok(rows.into_iter().next().map(|row| json!(row)).unwrap_or_else(|| json!({"sessions": 0, "total_minutes": 0})))
    }
}

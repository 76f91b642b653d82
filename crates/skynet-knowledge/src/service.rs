use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};
use tracing::debug;

use skynet_core::types::{DebtDirection, DebtStatus, INTERNAL_PROPS};
use skynet_graph::GraphClient;
use skynet_vector::VectorStore;

use crate::category::categorize;
use crate::error::{KnowledgeError, Result};
use crate::resolution::EntityResolver;
use crate::tags::TagService;
use crate::types::ExtractedFact;

const AUTO_EXTRACT_SAFE_TYPES: &[&str] = &["Person", "Company", "Knowledge", "Location"];

/// Entry point for the Graph Service's domain query/upsert/lifecycle
/// surface (§4.4). Composes the low-level Cypher client (`skynet-graph`),
/// the vector store, and entity resolution / tag canonicalisation.
pub struct KnowledgeService {
    pub(crate) graph: Arc<GraphClient>,
    pub(crate) vector: Arc<VectorStore>,
    pub(crate) resolver: EntityResolver,
    pub(crate) tags: TagService,
}

impl KnowledgeService {
    pub fn new(graph: Arc<GraphClient>, vector: Arc<VectorStore>) -> Self {
        Self {
            resolver: EntityResolver::new(graph.clone(), vector.clone()),
            tags: TagService::new(graph.clone(), vector.clone()),
            graph,
            vector,
        }
    }

    fn strip_internal(mut props: serde_json::Map<String, Value>) -> HashMap<String, Value> {
        for key in INTERNAL_PROPS {
            props.remove(*key);
        }
        props.into_iter().collect()
    }

    pub async fn upsert_person(
        &self,
        name: &str,
        name_ar: Option<&str>,
        company: Option<&str>,
        date_of_birth: Option<&str>,
        id_number: Option<&str>,
    ) -> Result<String> {
        let canonical = self.resolver.resolve(name, "Person").await?;
        let hijri = date_of_birth
            .and_then(|d| d.get(0..4))
            .and_then(|y| y.parse::<i32>().ok())
            .map(|y| y < 1900)
            .unwrap_or(false);

        let mut props: HashMap<String, Value> = HashMap::new();
        if let Some(ar) = name_ar {
            props.insert("name_ar".to_string(), json!(ar));
        }
        if let Some(dob) = date_of_birth {
            props.insert("date_of_birth".to_string(), json!(dob));
            props.insert("date_of_birth_hijri".to_string(), json!(hijri));
        }
        if let Some(id) = id_number {
            props.insert("id_number".to_string(), json!(id));
        }
        self.graph.merge_node("Person", "name", &canonical, &props).await?;

        if let Some(company_name) = company {
            let company_canonical = self.resolver.resolve(company_name, "Company").await?;
            self.graph.merge_node("Company", "name", &company_canonical, &HashMap::new()).await?;
            self.link(&canonical, "Person", "WORKS_AT", &company_canonical, "Company").await?;
        }
        Ok(canonical)
    }

    pub async fn upsert_company(&self, name: &str) -> Result<String> {
        let canonical = self.resolver.resolve(name, "Company").await?;
        self.graph.merge_node("Company", "name", &canonical, &HashMap::new()).await?;
        Ok(canonical)
    }

    pub async fn upsert_project(&self, name: &str, status: &str, priority: i32, description: Option<&str>) -> Result<String> {
        let mut props: HashMap<String, Value> = HashMap::new();
        props.insert("status".to_string(), json!(status));
        props.insert("priority".to_string(), json!(priority));
        if let Some(desc) = description {
            props.insert("description".to_string(), json!(desc));
        }
        props.insert("section_count".to_string(), json!(0));
        self.graph.merge_node("Project", "name", name, &props).await?;
        Ok(name.to_string())
    }

    pub async fn upsert_topic_or_tag(&self, label: &str, name: &str) -> Result<String> {
        if label.eq_ignore_ascii_case("tag") {
            return Ok(self.tags.upsert_tag(name).await?);
        }
        self.graph.merge_node("Topic", "name", name, &HashMap::new()).await?;
        Ok(name.to_string())
    }

    /// Auto-categorises via keyword heuristic when `category` is absent, and
    /// auto-tags with the resulting category (§3 Knowledge, §4.6).
    pub async fn upsert_knowledge(&self, title: &str, content: &str, topic: Option<&str>, category: Option<&str>) -> Result<String> {
        let category = category.map(str::to_string).unwrap_or_else(|| categorize(title, content));
        let mut props: HashMap<String, Value> = HashMap::new();
        props.insert("content".to_string(), json!(content));
        props.insert("category".to_string(), json!(category));
        if let Some(t) = topic {
            props.insert("topic".to_string(), json!(t));
        }
        self.graph.merge_node("Knowledge", "title", title, &props).await?;
        self.tags.tag_entity("Knowledge", title, &category).await?;
        Ok(title.to_string())
    }

    /// Stores a free-form note: a `Knowledge` node plus its embedding in the
    /// default vector collection, so it surfaces from both `search_knowledge`
    /// and plain semantic search over document chunks (§4.1 `store_note`).
    pub async fn store_note(&self, title: &str, content: &str, topic: Option<&str>) -> Result<String> {
        let title_id = self.upsert_knowledge(title, content, topic, None).await?;

        let embedding = self.vector.embed(content).await?;
        let payload = skynet_vector::types::VectorPayload {
            source_type: "note".to_string(),
            entity_type: Some("Knowledge".to_string()),
            topic: topic.map(str::to_string),
            file_hash: None,
            session_id: None,
            extra: HashMap::new(),
        };
        let point_id = uuid::Uuid::new_v4().to_string();
        self.vector
            .upsert(self.vector.collection(), &point_id, embedding, &payload)
            .await?;
        Ok(title_id)
    }

    /// Semantic (vector) search over stored notes/chunks merged with a
    /// substring match over `Knowledge` node titles/content (§4.1
    /// `search_knowledge`).
    pub async fn search_knowledge(&self, query: &str, topic: Option<&str>, limit: u64) -> Result<Value> {
        let embedding = self.vector.embed(query).await?;
        let hits = self
            .vector
            .search(self.vector.collection(), embedding, limit, &HashMap::new())
            .await?;
        let vector_hits: Vec<Value> = hits
            .into_iter()
            .map(|h| {
                json!({
                    "id": h.id,
                    "score": h.score,
                    "source_type": h.payload.source_type,
                    "topic": h.payload.topic,
                })
            })
            .collect();
        let graph_hits = self.query_knowledge(Some(query), topic).await?;
        Ok(json!({ "vector_hits": vector_hits, "graph_hits": graph_hits }))
    }

    pub async fn upsert_expense(&self, id: &str, amount: f64, currency: &str, category: &str, vendor: Option<&str>) -> Result<String> {
        let mut props: HashMap<String, Value> = HashMap::new();
        props.insert("amount".to_string(), json!(amount));
        props.insert("currency".to_string(), json!(currency));
        props.insert("category".to_string(), json!(category.to_lowercase()));
        props.insert("date".to_string(), json!(Utc::now().to_rfc3339()));
        if let Some(v) = vendor {
            props.insert("vendor".to_string(), json!(v));
        }
        self.graph.merge_node("Expense", "id", id, &props).await?;
        Ok(id.to_string())
    }

    /// Direction is always normalised from whatever variant the caller (or
    /// the LLM) supplied (§3 invariant).
    pub async fn upsert_debt(&self, id: &str, person: &str, amount: f64, currency: &str, direction_raw: &str, reason: Option<&str>) -> Result<String> {
        let direction = DebtDirection::normalize(direction_raw);
        let canonical_person = self.resolver.resolve(person, "Person").await?;
        let mut props: HashMap<String, Value> = HashMap::new();
        props.insert("person".to_string(), json!(canonical_person));
        props.insert("amount".to_string(), json!(amount));
        props.insert("currency".to_string(), json!(currency));
        props.insert("direction".to_string(), json!(direction.to_string()));
        props.insert("status".to_string(), json!(DebtStatus::Open.to_string()));
        props.insert("created_at".to_string(), json!(Utc::now().to_rfc3339()));
        if let Some(r) = reason {
            props.insert("reason".to_string(), json!(r));
        }
        self.graph.merge_node("Debt", "id", id, &props).await?;
        self.link(id, "Debt", "OWES", &canonical_person, "Person").await?;
        Ok(id.to_string())
    }

    /// Records a payment and reduces the debt's remaining amount; the
    /// status transitions to paid once it reaches zero (§3 DebtPayment).
    pub async fn record_debt_payment(&self, payment_id: &str, debt_id: &str, amount: f64) -> Result<()> {
        let mut props: HashMap<String, Value> = HashMap::new();
        props.insert("debt_id".to_string(), json!(debt_id));
        props.insert("amount".to_string(), json!(amount));
        props.insert("date".to_string(), json!(Utc::now().to_rfc3339()));
        self.graph.merge_node("DebtPayment", "id", payment_id, &props).await?;

        let row = self
            .graph
            .find_by_property_ci("Debt", "id", debt_id)
            .await?
            .ok_or_else(|| KnowledgeError::NotFound(format!("debt {debt_id}")))?;
        let node = row.get("n").and_then(|v| v.as_object()).cloned().unwrap_or_default();
        let remaining = node.get("amount").and_then(Value::as_f64).unwrap_or(0.0) - amount;
        let status = if remaining <= 0.0 {
            DebtStatus::Paid
        } else if remaining < node.get("amount").and_then(Value::as_f64).unwrap_or(0.0) {
            DebtStatus::Partial
        } else {
            DebtStatus::Open
        };

        let mut update: HashMap<String, Value> = HashMap::new();
        update.insert("amount".to_string(), json!(remaining.max(0.0)));
        update.insert("status".to_string(), json!(status.to_string()));
        self.graph.merge_node("Debt", "id", debt_id, &update).await?;
        Ok(())
    }

    pub async fn upsert_reminder(
        &self,
        id: &str,
        title: &str,
        due_date: chrono::DateTime<Utc>,
        reminder_type: &str,
        recurrence: Option<&str>,
        priority: i32,
        description: Option<&str>,
    ) -> Result<String> {
        let mut props: HashMap<String, Value> = HashMap::new();
        props.insert("title".to_string(), json!(title));
        props.insert("due_date".to_string(), json!(due_date.to_rfc3339()));
        props.insert("reminder_type".to_string(), json!(reminder_type));
        props.insert("status".to_string(), json!("pending"));
        props.insert("priority".to_string(), json!(priority));
        props.insert("persistent".to_string(), json!(reminder_type == "persistent"));
        if let Some(r) = recurrence {
            props.insert("recurrence".to_string(), json!(r));
        }
        if let Some(d) = description {
            props.insert("description".to_string(), json!(d));
        }
        self.graph.merge_node("Reminder", "id", id, &props).await?;
        Ok(id.to_string())
    }

    pub async fn upsert_item(&self, name: &str, quantity: i32, location: Option<&str>, category: &str, brand: Option<&str>) -> Result<String> {
        let mut props: HashMap<String, Value> = HashMap::new();
        props.insert("quantity".to_string(), json!(quantity));
        props.insert("category".to_string(), json!(category.to_lowercase()));
        if let Some(l) = location {
            props.insert("location".to_string(), json!(l));
        }
        if let Some(b) = brand {
            props.insert("brand".to_string(), json!(b));
        }
        self.graph.merge_node("Item", "name", name, &props).await?;
        Ok(name.to_string())
    }

    pub async fn upsert_sprint(&self, name: &str, start_date: chrono::DateTime<Utc>, end_date: chrono::DateTime<Utc>, project: Option<&str>, goal: &str) -> Result<String> {
        let mut props: HashMap<String, Value> = HashMap::new();
        props.insert("start_date".to_string(), json!(start_date.to_rfc3339()));
        props.insert("end_date".to_string(), json!(end_date.to_rfc3339()));
        props.insert("goal".to_string(), json!(goal));
        props.insert("status".to_string(), json!("active"));
        self.graph.merge_node("Sprint", "name", name, &props).await?;
        if let Some(p) = project {
            self.link(name, "Sprint", "BELONGS_TO", p, "Project").await?;
        }
        Ok(name.to_string())
    }

    pub async fn upsert_focus_session(&self, id: &str, start_time: chrono::DateTime<Utc>, duration_min: i32, task: Option<&str>) -> Result<String> {
        let mut props: HashMap<String, Value> = HashMap::new();
        props.insert("start_time".to_string(), json!(start_time.to_rfc3339()));
        props.insert("duration_min".to_string(), json!(duration_min));
        props.insert("completed".to_string(), json!(false));
        self.graph.merge_node("FocusSession", "id", id, &props).await?;
        if let Some(t) = task {
            self.link(id, "FocusSession", "INVOLVES", t, "Task").await?;
        }
        Ok(id.to_string())
    }

    pub async fn upsert_task(&self, name: &str, status: &str, project: Option<&str>, sprint: Option<&str>) -> Result<String> {
        let mut props: HashMap<String, Value> = HashMap::new();
        props.insert("status".to_string(), json!(status));
        self.graph.merge_node("Task", "name", name, &props).await?;
        if let Some(p) = project {
            self.link(name, "Task", "BELONGS_TO", p, "Project").await?;
        }
        if let Some(s) = sprint {
            self.link(name, "Task", "BELONGS_TO", s, "Sprint").await?;
        }
        Ok(name.to_string())
    }

    pub async fn upsert_list(&self, name: &str, list_type: &str, project: Option<&str>) -> Result<String> {
        let mut props: HashMap<String, Value> = HashMap::new();
        props.insert("type".to_string(), json!(list_type));
        self.graph.merge_node("List", "name", name, &props).await?;
        if let Some(p) = project {
            self.link(name, "List", "BELONGS_TO", p, "Project").await?;
        }
        Ok(name.to_string())
    }

    /// `ListEntry` is tool-only (§3 invariant: the extractor MUST suppress
    /// section and list-entry nodes).
    pub async fn upsert_list_entry(&self, id: &str, list: &str, text: &str, order: i32) -> Result<String> {
        let mut props: HashMap<String, Value> = HashMap::new();
        props.insert("text".to_string(), json!(text));
        props.insert("checked".to_string(), json!(false));
        props.insert("order".to_string(), json!(order));
        self.graph.merge_node("ListEntry", "id", id, &props).await?;
        self.link(list, "List", "HAS_ENTRY", id, "ListEntry").await?;
        Ok(id.to_string())
    }

    /// Flips a `ListEntry.checked` flag (§3 ListEntry is tool-only).
    pub async fn set_list_entry_checked(&self, id: &str, checked: bool) -> Result<()> {
        let mut props: HashMap<String, Value> = HashMap::new();
        props.insert("checked".to_string(), json!(checked));
        self.graph.merge_node("ListEntry", "id", id, &props).await.map_err(KnowledgeError::from)
    }

    pub async fn delete_list_entry(&self, id: &str) -> Result<()> {
        self.graph.delete_node("ListEntry", "id", id, true).await.map_err(KnowledgeError::from)
    }

    async fn link(&self, from: &str, from_label: &str, rel: &str, to: &str, to_label: &str) -> Result<()> {
        let cypher = format!(
            "MATCH (a:{from_label} {{name: $from}}), (b:{to_label} {{name: $to}}) MERGE (a)-[:{rel}]->(b)"
        );
        let mut params = HashMap::new();
        params.insert("from".to_string(), json!(from));
        params.insert("to".to_string(), json!(to));
        self.graph.execute(&cypher, params).await?;
        Ok(())
    }

    /// Generic routing entry point for ingestion-extracted facts (§4.2 step
    /// 5). Entity resolution is applied for the label types name collisions
    /// actually occur for; other labels are merged on their raw name.
    /// Optionally links each upserted entity to `(File{file_hash})` via
    /// `EXTRACTED_FROM` — `ensure_file_stub` MUST already have run.
    pub async fn upsert_from_facts(&self, facts: &[ExtractedFact], file_hash: Option<&str>) -> Result<Vec<String>> {
        let mut canonical_names = Vec::with_capacity(facts.len());
        for fact in facts {
            if matches!(fact.label.as_str(), "Section" | "ListEntry") {
                debug!(label = %fact.label, "extractor-suppressed entity type skipped");
                continue;
            }

            let canonical = if AUTO_EXTRACT_SAFE_TYPES.contains(&fact.label.as_str()) && fact.label != "Knowledge" {
                self.resolver.resolve(&fact.name, &fact.label).await?
            } else {
                fact.name.clone()
            };

            let props = Self::strip_internal(fact.properties.clone());
            self.graph.merge_node(&fact.label, "name", &canonical, &props).await?;

            for rel in &fact.relationships {
                self.link(&canonical, &fact.label, &rel.rel_type, &rel.target_name, &rel.target_label).await?;
            }

            if let Some(hash) = file_hash {
                let cypher = format!(
                    "MATCH (e:{label} {{name: $name}}), (f:File {{sha256: $hash}}) \
                     MERGE (e)-[:EXTRACTED_FROM]->(f)",
                    label = fact.label
                );
                let mut params = HashMap::new();
                params.insert("name".to_string(), json!(canonical));
                params.insert("hash".to_string(), json!(hash));
                self.graph.execute(&cypher, params).await?;
            }

            canonical_names.push(canonical);
        }
        Ok(canonical_names)
    }
}

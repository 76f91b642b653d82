use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info};

use skynet_graph::GraphClient;
use skynet_vector::{entity_name_namespace, VectorPayload, VectorStore};

use crate::error::Result;

const PERSON_THRESHOLD: f32 = 0.85;
const DEFAULT_THRESHOLD: f32 = 0.80;

fn threshold_for(label: &str) -> f32 {
    if label.eq_ignore_ascii_case("person") {
        PERSON_THRESHOLD
    } else {
        DEFAULT_THRESHOLD
    }
}

/// Collapses near-duplicate surface forms ("Mohammed / Mohamed / محمد") onto
/// one canonical node (§4.5). A per-`(label, normalised name)` lock
/// serialises concurrent resolutions of the same entity so two simultaneous
/// callers don't each create a fresh canonical node.
pub struct EntityResolver {
    graph: Arc<GraphClient>,
    vector: Arc<VectorStore>,
    locks: DashMap<(String, String), Arc<Mutex<()>>>,
}

impl EntityResolver {
    pub fn new(graph: Arc<GraphClient>, vector: Arc<VectorStore>) -> Self {
        Self {
            graph,
            vector,
            locks: DashMap::new(),
        }
    }

    fn lock_for(&self, label: &str, normalized: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry((label.to_string(), normalized.to_string()))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// `resolve_entity_name(name, label)` — returns the canonical name for
    /// `name` under `label`, creating a new canonical node if no existing
    /// one matches closely enough.
    pub async fn resolve(&self, name: &str, label: &str) -> Result<String> {
        let normalized = normalize_name(name);
        let lock = self.lock_for(label, &normalized);
        let _guard = lock.lock().await;

        let namespace = entity_name_namespace(label);
        self.vector.ensure_namespace(&namespace).await?;

        let embedding = self.vector.embed(name).await?;
        let threshold = threshold_for(label);

        let hits = self.vector.search(&namespace, embedding.clone(), 3, &HashMap::new()).await?;
        if let Some(best) = hits.first() {
            if best.score >= threshold {
                debug!(name, canonical = best.id, score = best.score, "resolved via vector search");
                self.add_alias(label, &best.id, name).await?;
                return Ok(best.id.clone());
            }
        }

        if let Some(canonical) = self.graph_contains_fallback(label, &normalized).await? {
            debug!(name, canonical, "resolved via graph CONTAINS fallback");
            self.add_alias(label, &canonical, name).await?;
            return Ok(canonical);
        }

        info!(name, label, "no match found; registering as new canonical entity");
        let payload = VectorPayload {
            source_type: "entity_name".to_string(),
            entity_type: Some(label.to_string()),
            ..Default::default()
        };
        self.vector.upsert(&namespace, name, embedding, &payload).await?;
        Ok(name.to_string())
    }

    async fn graph_contains_fallback(&self, label: &str, normalized: &str) -> Result<Option<String>> {
        let cypher = format!(
            "MATCH (n:{label}) \
             WHERE toLower(n.name) CONTAINS $needle \
                OR any(alias IN coalesce(n.name_aliases, []) WHERE toLower(alias) CONTAINS $needle) \
             RETURN n.name AS name LIMIT 1"
        );
        let mut params = HashMap::new();
        params.insert("needle".to_string(), Value::String(normalized.to_string()));
        let rows = self.graph.query_rows(&cypher, params, &["name"]).await?;
        Ok(rows.into_iter().next().and_then(|r| r.get("name").and_then(|v| v.as_str().map(str::to_string))))
    }

    async fn add_alias(&self, label: &str, canonical: &str, incoming: &str) -> Result<()> {
        if incoming == canonical {
            return Ok(());
        }
        let cypher = format!(
            "MATCH (n:{label} {{name: $name}}) \
             SET n.name_aliases = CASE \
                 WHEN $alias IN coalesce(n.name_aliases, []) THEN n.name_aliases \
                 ELSE coalesce(n.name_aliases, []) + $alias \
             END"
        );
        let mut params = HashMap::new();
        params.insert("name".to_string(), Value::String(canonical.to_string()));
        params.insert("alias".to_string(), Value::String(incoming.to_string()));
        self.graph.execute(&cypher, params).await?;
        Ok(())
    }

    /// Merges `source` into `target` (e.g. via `merge_projects`): relinks all
    /// inbound/outbound edges, unions `name_aliases`, deletes `source`.
    /// Relies on `apoc.refactor.mergeNodes`, the standard way to move edges
    /// between nodes without knowing relationship types ahead of time.
    pub async fn merge_entities(&self, label: &str, source: &str, target: &str) -> Result<()> {
        let cypher = format!(
            "MATCH (src:{label} {{name: $source}}), (tgt:{label} {{name: $target}}) \
             WITH src, tgt, coalesce(src.name_aliases, []) + [src.name] + coalesce(tgt.name_aliases, []) AS aliases \
             CALL apoc.refactor.mergeNodes([tgt, src], {{properties: 'discard', mergeRels: true}}) \
             YIELD node \
             SET node.name = $target, node.name_aliases = [a IN aliases WHERE a <> $target]"
        );
        let mut params = HashMap::new();
        params.insert("source".to_string(), Value::String(source.to_string()));
        params.insert("target".to_string(), Value::String(target.to_string()));
        self.graph.execute(&cypher, params).await?;
        Ok(())
    }
}

/// Display helper (§4.5): `"<name_ar> (<name>)"` when an Arabic surface form
/// is present, else the plain name.
pub fn display_name(name: &str, name_ar: Option<&str>) -> String {
    match name_ar {
        Some(ar) if !ar.trim().is_empty() => format!("{ar} ({name})"),
        _ => name.to_string(),
    }
}

fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() || *c == ' ')
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_prefers_arabic_form() {
        assert_eq!(display_name("Mohammed", Some("محمد")), "محمد (Mohammed)");
        assert_eq!(display_name("Mohammed", None), "Mohammed");
        assert_eq!(display_name("Mohammed", Some("")), "Mohammed");
    }

    #[test]
    fn threshold_is_stricter_for_person() {
        assert_eq!(threshold_for("Person"), 0.85);
        assert_eq!(threshold_for("person"), 0.85);
        assert_eq!(threshold_for("Company"), 0.80);
    }

    #[test]
    fn normalize_name_collapses_whitespace_and_case() {
        assert_eq!(normalize_name("  Mohammed   Ali "), "mohammed ali");
    }
}

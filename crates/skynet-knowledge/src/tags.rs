use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use skynet_graph::GraphClient;
use skynet_vector::{entity_name_namespace, VectorPayload, VectorStore};

use crate::error::Result;

const TAG_DEDUP_THRESHOLD: f32 = 0.85;
const TAG_LABEL: &str = "Tag";

/// English → Arabic tag canonicalisation (§4.6 `_TAG_ALIASES`).
const TAG_ALIASES: &[(&str, &str)] = &[
    ("work", "عمل"),
    ("finance", "مالية"),
    ("health", "صحة"),
    ("education", "تعليم"),
    ("personal", "شخصي"),
    ("family", "عائلة"),
    ("shopping", "تسوق"),
    ("travel", "سفر"),
];

fn canonicalize_tag(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    TAG_ALIASES
        .iter()
        .find(|(en, _)| *en == lower)
        .map(|(_, ar)| (*ar).to_string())
        .unwrap_or_else(|| raw.trim().to_string())
}

pub struct TagService {
    graph: Arc<GraphClient>,
    vector: Arc<VectorStore>,
}

impl TagService {
    pub fn new(graph: Arc<GraphClient>, vector: Arc<VectorStore>) -> Self {
        Self { graph, vector }
    }

    /// `upsert_tag` — canonicalise via the alias table, then vector-dedup
    /// against existing tags at 0.85 before creating a new node.
    pub async fn upsert_tag(&self, raw: &str) -> Result<String> {
        let canonical_input = canonicalize_tag(raw);
        let namespace = entity_name_namespace(TAG_LABEL);
        self.vector.ensure_namespace(&namespace).await?;

        let embedding = self.vector.embed(&canonical_input).await?;
        let hits = self.vector.search(&namespace, embedding.clone(), 1, &HashMap::new()).await?;

        if let Some(best) = hits.first() {
            if best.score >= TAG_DEDUP_THRESHOLD {
                return Ok(best.id.clone());
            }
        }

        let mut props: HashMap<String, Value> = HashMap::new();
        props.insert("name_aliases".to_string(), Value::Array(vec![]));
        self.graph.merge_node(TAG_LABEL, "name", &canonical_input, &props).await?;

        let payload = VectorPayload {
            source_type: "entity_name".to_string(),
            entity_type: Some(TAG_LABEL.to_string()),
            ..Default::default()
        };
        self.vector.upsert(&namespace, &canonical_input, embedding, &payload).await?;

        Ok(canonical_input)
    }

    /// `tag_entity` — create a `TAGGED_WITH` edge from `(label, name)` to the
    /// canonical tag node.
    pub async fn tag_entity(&self, label: &str, name: &str, tag: &str) -> Result<()> {
        let canonical = self.upsert_tag(tag).await?;
        let cypher = format!(
            "MATCH (e:{label} {{name: $name}}), (t:{TAG_LABEL} {{name: $tag}}) \
             MERGE (e)-[:TAGGED_WITH]->(t)"
        );
        let mut params = HashMap::new();
        params.insert("name".to_string(), Value::String(name.to_string()));
        params.insert("tag".to_string(), Value::String(canonical));
        self.graph.execute(&cypher, params).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalize_tag_maps_known_english_aliases() {
        assert_eq!(canonicalize_tag("Work"), "عمل");
        assert_eq!(canonicalize_tag("finance"), "مالية");
    }

    #[test]
    fn canonicalize_tag_passes_through_unknown_tags() {
        assert_eq!(canonicalize_tag("hobby"), "hobby");
        assert_eq!(canonicalize_tag("رياضة"), "رياضة");
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use skynet_graph::GraphClient;

use crate::error::Result;
use crate::resolution::display_name;

const MAX_LINES: usize = 30;

/// Relationship types hop 3 is restricted to (§4.7).
const HOP3_RELS: &str = "BELONGS_TO|INVOLVES|WORKS_AT|RELATED_TO|TAGGED_WITH|STORED_IN|SIMILAR_TO";

pub struct ContextNode {
    pub name: String,
    pub name_ar: Option<String>,
}

pub struct MultiHopRetrieval {
    graph: Arc<GraphClient>,
}

impl MultiHopRetrieval {
    pub fn new(graph: Arc<GraphClient>) -> Self {
        Self { graph }
    }

    /// `query_entity_context(label, key, value, max_hops=3)`: hops 1-2 are
    /// unrestricted, hop 3 is restricted to the relationship types in
    /// `HOP3_RELS`. Deduplicated, display-formatted, capped at 30 lines.
    pub async fn query_entity_context(&self, label: &str, key: &str, value: &str) -> Result<Vec<String>> {
        let mut params = HashMap::new();
        params.insert("value".to_string(), Value::String(value.to_string()));

        let hop12 = format!(
            "MATCH (n:{label} {{{key}: $value}})-[*1..2]-(m) \
             RETURN DISTINCT m.name AS name, m.name_ar AS name_ar"
        );
        let hop3 = format!(
            "MATCH (n:{label} {{{key}: $value}})-[*2]-(x)-[:{HOP3_RELS}]-(m) \
             RETURN DISTINCT m.name AS name, m.name_ar AS name_ar"
        );

        let mut rows = self.graph.query_rows(&hop12, params.clone(), &["name", "name_ar"]).await?;
        rows.extend(self.graph.query_rows(&hop3, params, &["name", "name_ar"]).await?);

        let mut seen = std::collections::HashSet::new();
        let mut lines = Vec::new();
        for row in rows {
            let Some(name) = row.get("name").and_then(|v| v.as_str()) else {
                continue;
            };
            if !seen.insert(name.to_string()) {
                continue;
            }
            let name_ar = row.get("name_ar").and_then(|v| v.as_str());
            lines.push(display_name(name, name_ar));
            if lines.len() >= MAX_LINES {
                break;
            }
        }
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hop3_relation_list_matches_spec() {
        assert_eq!(
            HOP3_RELS,
            "BELONGS_TO|INVOLVES|WORKS_AT|RELATED_TO|TAGGED_WITH|STORED_IN|SIMILAR_TO"
        );
    }
}

use std::collections::HashMap;

use serde_json::{json, Value};

use skynet_graph::{GraphClient, PropertyMap};

use crate::error::Result;
use crate::types::{EdgeDump, GraphDump, NodeDump};

/// Every domain label's natural unique key, mirroring the `key_field`
/// argument each `KnowledgeService` upsert already passes to
/// `GraphClient::merge_node` (§4.4). Anything not listed falls back to
/// `name`, which covers Person/Company/Topic/Project/Item/Sprint/Task/List
/// and any NER-discovered entity label.
const LABEL_KEY_FIELDS: &[(&str, &str)] = &[
    ("File", "sha256"),
    ("Knowledge", "title"),
    ("Expense", "id"),
    ("Debt", "id"),
    ("DebtPayment", "id"),
    ("Reminder", "id"),
    ("FocusSession", "id"),
    ("ListEntry", "id"),
    ("Section", "name"),
];
const DEFAULT_KEY_FIELD: &str = "name";

fn key_field_for(label: &str) -> &'static str {
    LABEL_KEY_FIELDS
        .iter()
        .find(|(l, _)| *l == label)
        .map(|(_, f)| *f)
        .unwrap_or(DEFAULT_KEY_FIELD)
}

/// `MATCH (n)` + `MATCH ()-[r]->()` export to JSON (§4.10). Nodes keep their
/// full label set but restore only uses the first (this schema never
/// multi-labels a node); edges resolve their endpoints by natural key so the
/// dump is restorable into an empty graph.
pub async fn export_graph(graph: &GraphClient) -> Result<GraphDump> {
    let node_rows = graph
        .query_rows(
            "MATCH (n) RETURN labels(n) AS labels, properties(n) AS props",
            HashMap::new(),
            &["labels", "props"],
        )
        .await?;
    let nodes = node_rows
        .into_iter()
        .filter_map(|row| {
            let labels = row
                .get("labels")?
                .as_array()?
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect::<Vec<_>>();
            let properties = row.get("props")?.as_object()?.clone();
            Some(NodeDump { labels, properties })
        })
        .collect();

    let edge_rows = graph
        .query_rows(
            "MATCH (a)-[r]->(b) RETURN type(r) AS rel_type, labels(a) AS start_labels, \
             properties(a) AS start_props, labels(b) AS end_labels, properties(b) AS end_props, \
             properties(r) AS rel_props",
            HashMap::new(),
            &["rel_type", "start_labels", "start_props", "end_labels", "end_props", "rel_props"],
        )
        .await?;
    let edges = edge_rows
        .into_iter()
        .filter_map(|row| {
            let rel_type = row.get("rel_type")?.as_str()?.to_string();
            let start_label = row.get("start_labels")?.as_array()?.first()?.as_str()?.to_string();
            let end_label = row.get("end_labels")?.as_array()?.first()?.as_str()?.to_string();
            let start_props = row.get("start_props")?.as_object()?;
            let end_props = row.get("end_props")?.as_object()?;
            let start_key = start_props.get(key_field_for(&start_label))?.as_str()?.to_string();
            let end_key = end_props.get(key_field_for(&end_label))?.as_str()?.to_string();
            let properties = row.get("rel_props")?.as_object()?.clone();
            Some(EdgeDump {
                rel_type,
                start_label,
                start_key,
                end_label,
                end_key,
                properties,
            })
        })
        .collect();

    Ok(GraphDump { nodes, edges })
}

/// Re-applies a dump with `MERGE`, idempotent on the natural keys above
/// (§4.10 "Restore").
pub async fn import_graph(graph: &GraphClient, dump: &GraphDump) -> Result<()> {
    for node in &dump.nodes {
        let Some(label) = node.labels.first() else { continue };
        let key_field = key_field_for(label);
        let Some(key_value) = node.properties.get(key_field).and_then(|v| v.as_str()) else {
            continue;
        };
        let props: PropertyMap = node.properties.clone().into_iter().collect();
        graph.merge_node(label, key_field, key_value, &props).await?;
    }

    for edge in &dump.edges {
        let start_field = key_field_for(&edge.start_label);
        let end_field = key_field_for(&edge.end_label);
        let cypher = format!(
            "MATCH (a:{start_label} {{{start_field}: $start_key}}), (b:{end_label} {{{end_field}: $end_key}}) \
             MERGE (a)-[r:{rel_type}]->(b) SET r += $props",
            start_label = edge.start_label,
            end_label = edge.end_label,
            rel_type = edge.rel_type,
        );
        let mut params: PropertyMap = HashMap::new();
        params.insert("start_key".to_string(), json!(edge.start_key));
        params.insert("end_key".to_string(), json!(edge.end_key));
        params.insert("props".to_string(), Value::Object(edge.properties.clone()));
        graph.execute(&cypher, params).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listed_labels_use_their_natural_key() {
        assert_eq!(key_field_for("File"), "sha256");
        assert_eq!(key_field_for("Expense"), "id");
    }

    #[test]
    fn unlisted_labels_default_to_name() {
        assert_eq!(key_field_for("Person"), "name");
        assert_eq!(key_field_for("Company"), "name");
    }
}

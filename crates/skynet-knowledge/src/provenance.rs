use std::collections::HashMap;

use chrono::Utc;
use serde_json::{json, Value};

use crate::error::Result;
use crate::service::KnowledgeService;

const VECTOR_COLLECTION_FIELD: &str = "file_hash";

impl KnowledgeService {
    /// Creates the `File` stub node. MUST run before any `EXTRACTED_FROM`
    /// edge is created — those edges use MATCH, not MERGE, on the File node
    /// (§4.2 step 5).
    pub async fn ensure_file_stub(&self, sha256: &str, filename: &str, mime: &str, size: i64) -> Result<()> {
        let mut props: HashMap<String, Value> = HashMap::new();
        props.insert("filename".to_string(), json!(filename));
        props.insert("mime".to_string(), json!(mime));
        props.insert("size".to_string(), json!(size));
        props.insert("ingested_at".to_string(), json!(Utc::now().to_rfc3339()));
        self.graph.merge_node("File", "sha256", sha256, &props).await?;
        Ok(())
    }

    /// `(new:File)-[:SUPERSEDES]->(old:File)` (re-upload semantics, step f).
    pub async fn supersede_file(&self, old_hash: &str, new_hash: &str) -> Result<()> {
        let cypher = "MATCH (old:File {sha256: $old}), (new:File {sha256: $new}) MERGE (new)-[:SUPERSEDES]->(old)";
        let mut params = HashMap::new();
        params.insert("old".to_string(), json!(old_hash));
        params.insert("new".to_string(), json!(new_hash));
        self.graph.execute(cypher, params).await?;
        Ok(())
    }

    /// Deletes vector points and orphaned entities for a superseded file
    /// (re-upload semantics, steps c-d). An entity survives if it has any
    /// `EXTRACTED_FROM` edge other than the one to `old_hash`.
    pub async fn cleanup_file_entities(&self, old_hash: &str, vector_collection: &str) -> Result<Vec<String>> {
        self.vector.delete_by_field(vector_collection, VECTOR_COLLECTION_FIELD, old_hash).await?;

        let cypher = "MATCH (old:File {sha256: $hash})<-[:EXTRACTED_FROM]-(e) \
                       WHERE size([(e)-[:EXTRACTED_FROM]->(f) WHERE f.sha256 <> $hash | f]) = 0 \
                       WITH e, e.name AS name DETACH DELETE e RETURN name";
        let mut params = HashMap::new();
        params.insert("hash".to_string(), json!(old_hash));
        let rows = self.graph.query_rows(cypher, params, &["name"]).await?;
        Ok(rows.into_iter().filter_map(|r| r.get("name").and_then(|v| v.as_str().map(str::to_string))).collect())
    }

    /// Snapshot `{entity_name -> section_name}` for all entities linked to
    /// `hash` via `IN_SECTION`, taken before orphan cleanup (step b).
    pub async fn get_file_section_map(&self, hash: &str) -> Result<HashMap<String, String>> {
        let cypher = "MATCH (f:File {sha256: $hash})<-[:EXTRACTED_FROM]-(e)-[:IN_SECTION]->(s:Section) \
                       RETURN e.name AS entity_name, s.name AS section_name";
        let mut params = HashMap::new();
        params.insert("hash".to_string(), json!(hash));
        let rows = self.graph.query_rows(cypher, params, &["entity_name", "section_name"]).await?;
        Ok(rows
            .into_iter()
            .filter_map(|r| {
                let entity = r.get("entity_name")?.as_str()?.to_string();
                let section = r.get("section_name")?.as_str()?.to_string();
                Some((entity, section))
            })
            .collect())
    }

    /// Restores `IN_SECTION` edges for the newly-extracted entities by
    /// matching each against the snapshot by normalised name (step g).
    pub async fn restore_section_links(&self, snapshot: &HashMap<String, String>, new_entity_names: &[String]) -> Result<()> {
        for name in new_entity_names {
            let normalized = name.trim().to_lowercase();
            let Some(section) = snapshot
                .iter()
                .find(|(entity, _)| entity.trim().to_lowercase() == normalized)
                .map(|(_, section)| section.clone())
            else {
                continue;
            };
            let cypher = "MATCH (e {name: $entity}), (s:Section {name: $section}) MERGE (e)-[:IN_SECTION]->(s)";
            let mut params = HashMap::new();
            params.insert("entity".to_string(), json!(name));
            params.insert("section".to_string(), json!(section));
            self.graph.execute(cypher, params).await?;
        }
        Ok(())
    }

    /// Links an already-upserted entity to a `File` by a caller-chosen
    /// relationship type (e.g. `FROM_PHOTO` for an inventory Item created
    /// from a classified photo, §4.3 "Auto-item").
    pub async fn link_entity_to_file(&self, label: &str, name: &str, rel: &str, file_hash: &str) -> Result<()> {
        let cypher = format!(
            "MATCH (e:{label} {{name: $name}}), (f:File {{sha256: $hash}}) MERGE (e)-[:{rel}]->(f)"
        );
        let mut params = HashMap::new();
        params.insert("name".to_string(), json!(name));
        params.insert("hash".to_string(), json!(file_hash));
        self.graph.execute(&cypher, params).await?;
        Ok(())
    }

    pub async fn find_file_by_filename(&self, filename: &str) -> Result<Option<Value>> {
        let cypher = "MATCH (f:File {filename: $filename}) RETURN f ORDER BY f.ingested_at DESC LIMIT 1";
        let mut params = HashMap::new();
        params.insert("filename".to_string(), json!(filename));
        let rows = self.graph.query_rows(cypher, params, &["f"]).await?;
        Ok(rows.into_iter().next().and_then(|r| r.get("f").cloned()))
    }

    pub async fn find_file_by_hash(&self, sha256: &str) -> Result<Option<Value>> {
        let cypher = "MATCH (f:File {sha256: $hash}) RETURN f LIMIT 1";
        let mut params = HashMap::new();
        params.insert("hash".to_string(), json!(sha256));
        let rows = self.graph.query_rows(cypher, params, &["f"]).await?;
        Ok(rows.into_iter().next().and_then(|r| r.get("f").cloned()))
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn vector_collection_field_matches_payload_invariant() {
        assert_eq!(super::VECTOR_COLLECTION_FIELD, "file_hash");
    }
}

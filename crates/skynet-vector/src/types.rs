use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Payload fields carried by every vector point (§3 invariants). `file_hash`
/// is the only handle used for per-file cleanup.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VectorPayload {
    pub source_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Free-form tags, kept out-of-band from the typed fields above.
    #[serde(default)]
    pub extra: HashMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct SearchHit {
    pub id: String,
    pub score: f32,
    pub payload: VectorPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollPoint {
    pub id: String,
    pub vector: Vec<f32>,
    pub payload: VectorPayload,
}

/// A named vector namespace distinct from the default document-chunk
/// collection — used by entity resolution (§4.5) to search only
/// `entity_name:{label}` vectors without the chunk corpus polluting results.
pub fn entity_name_namespace(label: &str) -> String {
    format!("entity_name:{label}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_name_namespace_is_label_scoped() {
        assert_eq!(entity_name_namespace("Person"), "entity_name:Person");
        assert_ne!(entity_name_namespace("Person"), entity_name_namespace("Company"));
    }

    #[test]
    fn payload_round_trips_through_json() {
        let payload = VectorPayload {
            source_type: "chunk".to_string(),
            entity_type: Some("Person".to_string()),
            topic: None,
            file_hash: Some("abc123".to_string()),
            session_id: None,
            extra: HashMap::new(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["source_type"], "chunk");
        assert!(json.get("topic").is_none());
        let back: VectorPayload = serde_json::from_value(json).unwrap();
        assert_eq!(back.file_hash, Some("abc123".to_string()));
    }
}

use std::collections::HashMap;

use qdrant_client::qdrant::{
    vectors_config::Config as VectorsConfigOneOf, CreateCollection, Distance, FieldCondition,
    Filter, Match, PointStruct, ScrollPoints, SearchPoints, VectorParams, VectorsConfig,
};
use qdrant_client::{Payload, Qdrant};
use serde_json::json;
use tracing::{info, warn};

use skynet_core::config::VectorConfig;

use crate::error::{Result, VectorError};
use crate::types::{ScrollPoint, SearchHit, VectorPayload};

/// Embed + approximate-NN vector store (§2, Vector Store). Qdrant handles
/// the NN index; embedding is delegated to an external HTTP endpoint since
/// the embedding model runtime itself is out of scope (§1).
pub struct VectorStore {
    client: Qdrant,
    http: reqwest::Client,
    embed_url: String,
    collection: String,
    embed_dim: u64,
}

impl VectorStore {
    pub async fn connect(config: &VectorConfig) -> Result<Self> {
        let client = Qdrant::from_url(&config.url).build()?;
        let store = Self {
            client,
            http: reqwest::Client::new(),
            embed_url: config.embed_url.clone(),
            collection: config.collection.clone(),
            embed_dim: config.embed_dim,
        };
        store.ensure_collection(&store.collection).await?;
        Ok(store)
    }

    async fn ensure_collection(&self, name: &str) -> Result<()> {
        let existing = self.client.list_collections().await?;
        if existing.collections.iter().any(|c| c.name == name) {
            return Ok(());
        }
        info!(collection = name, "creating qdrant collection");
        self.client
            .create_collection(CreateCollection {
                collection_name: name.to_string(),
                vectors_config: Some(VectorsConfig {
                    config: Some(VectorsConfigOneOf::Params(VectorParams {
                        size: self.embed_dim,
                        distance: Distance::Cosine.into(),
                        ..Default::default()
                    })),
                }),
                ..Default::default()
            })
            .await?;
        Ok(())
    }

    /// Also ensures the per-label entity-name namespace collection exists
    /// (§4.5's `entity_name:{label}` vector namespace).
    pub async fn ensure_namespace(&self, namespace: &str) -> Result<()> {
        self.ensure_collection(namespace).await
    }

    /// All collection names currently present (the default chunk collection
    /// plus any `entity_name:{label}` namespaces) — the Backup Service (§4.10)
    /// needs this to know what to scroll.
    pub async fn list_collections(&self) -> Result<Vec<String>> {
        let existing = self.client.list_collections().await?;
        Ok(existing.collections.into_iter().map(|c| c.name).collect())
    }

    /// embed(text) -> 1024-dim vector. Calls out to the configured
    /// embedding endpoint; the endpoint contract is `{"input": text}` ->
    /// `{"embedding": [f32; N]}`.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let resp = self
            .http
            .post(&self.embed_url)
            .json(&json!({ "input": text }))
            .send()
            .await?
            .error_for_status()?;
        let body: serde_json::Value = resp.json().await?;
        let embedding = body
            .get("embedding")
            .and_then(|v| v.as_array())
            .ok_or_else(|| VectorError::EmbedMalformed("missing `embedding` array".to_string()))?;
        embedding
            .iter()
            .map(|v| {
                v.as_f64()
                    .map(|f| f as f32)
                    .ok_or_else(|| VectorError::EmbedMalformed("non-numeric embedding element".to_string()))
            })
            .collect()
    }

    pub async fn upsert(&self, collection: &str, id: &str, vector: Vec<f32>, payload: &VectorPayload) -> Result<()> {
        let payload_json = serde_json::to_value(payload)?;
        let payload: Payload = payload_json
            .try_into()
            .map_err(|e: qdrant_client::QdrantError| e)?;
        let point = PointStruct::new(id.to_string(), vector, payload);
        self.client
            .upsert_points(qdrant_client::qdrant::UpsertPoints {
                collection_name: collection.to_string(),
                points: vec![point],
                ..Default::default()
            })
            .await?;
        Ok(())
    }

    /// search(vec, k, filters) -> top-k hits by cosine similarity.
    pub async fn search(
        &self,
        collection: &str,
        vector: Vec<f32>,
        k: u64,
        filters: &HashMap<String, String>,
    ) -> Result<Vec<SearchHit>> {
        let filter = if filters.is_empty() {
            None
        } else {
            Some(Filter::all(
                filters
                    .iter()
                    .map(|(field, value)| FieldCondition {
                        key: field.clone(),
                        r#match: Some(Match {
                            match_value: Some(qdrant_client::qdrant::r#match::MatchValue::Keyword(
                                value.clone(),
                            )),
                        }),
                        ..Default::default()
                    })
                    .map(Into::into)
                    .collect::<Vec<_>>(),
            ))
        };

        let resp = self
            .client
            .search_points(SearchPoints {
                collection_name: collection.to_string(),
                vector,
                limit: k,
                filter,
                with_payload: Some(true.into()),
                ..Default::default()
            })
            .await?;

        Ok(resp
            .result
            .into_iter()
            .map(|p| SearchHit {
                id: point_id_to_string(&p.id),
                score: p.score,
                payload: payload_to_typed(p.payload),
            })
            .collect())
    }

    /// delete_by_field(field, value) — the sole per-file cleanup handle
    /// (§3: `file_hash` invariant).
    pub async fn delete_by_field(&self, collection: &str, field: &str, value: &str) -> Result<()> {
        let filter = Filter::all(vec![FieldCondition {
            key: field.to_string(),
            r#match: Some(Match {
                match_value: Some(qdrant_client::qdrant::r#match::MatchValue::Keyword(value.to_string())),
            }),
            ..Default::default()
        }
        .into()]);

        self.client
            .delete_points(qdrant_client::qdrant::DeletePoints {
                collection_name: collection.to_string(),
                points: Some(filter.into()),
                ..Default::default()
            })
            .await?;
        Ok(())
    }

    /// scroll-all — used by the Backup Service (§4.10) in batches of 100.
    pub async fn scroll_all(&self, collection: &str, batch_size: u32) -> Result<Vec<ScrollPoint>> {
        let mut out = Vec::new();
        let mut offset = None;
        loop {
            let resp = self
                .client
                .scroll(ScrollPoints {
                    collection_name: collection.to_string(),
                    limit: Some(batch_size),
                    offset: offset.clone(),
                    with_payload: Some(true.into()),
                    with_vectors: Some(true.into()),
                    ..Default::default()
                })
                .await?;

            if resp.result.is_empty() {
                break;
            }
            for point in &resp.result {
                out.push(ScrollPoint {
                    id: point_id_to_string(point.id.as_ref().unwrap()),
                    vector: point
                        .vectors
                        .as_ref()
                        .and_then(|v| v.vectors_options.clone())
                        .map(vector_options_to_vec)
                        .unwrap_or_default(),
                    payload: payload_to_typed(point.payload.clone()),
                });
            }
            offset = resp.next_page_offset;
            if offset.is_none() {
                break;
            }
        }
        Ok(out)
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }
}

fn point_id_to_string(id: &qdrant_client::qdrant::PointId) -> String {
    match &id.point_id_options {
        Some(qdrant_client::qdrant::point_id::PointIdOptions::Uuid(u)) => u.clone(),
        Some(qdrant_client::qdrant::point_id::PointIdOptions::Num(n)) => n.to_string(),
        None => String::new(),
    }
}

fn vector_options_to_vec(opts: qdrant_client::qdrant::vectors::VectorsOptions) -> Vec<f32> {
    match opts {
        qdrant_client::qdrant::vectors::VectorsOptions::Vector(v) => v.data,
        _ => {
            warn!("non-dense vector encountered during scroll; skipping");
            Vec::new()
        }
    }
}

fn payload_to_typed(payload: HashMap<String, qdrant_client::qdrant::Value>) -> VectorPayload {
    let json = qdrant_client::Payload::from(payload);
    serde_json::from_value(serde_json::Value::from(json)).unwrap_or_default()
}

//! `POST /search/` (§4.1/§4.6): semantic + graph search over stored
//! knowledge. `source` picks which half of `KnowledgeService::search_knowledge`
//! to run; `auto` (default) runs both and returns the merged result.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::error::ApiResult;
use crate::app::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchSource {
    Auto,
    Vector,
    Graph,
}

impl Default for SearchSource {
    fn default() -> Self {
        SearchSource::Auto
    }
}

#[derive(Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub source: SearchSource,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    10
}

pub async fn search_handler(State(state): State<Arc<AppState>>, Json(req): Json<SearchRequest>) -> ApiResult<Json<Value>> {
    let result = match req.source {
        SearchSource::Auto => state.knowledge.search_knowledge(&req.query, req.topic.as_deref(), req.limit).await?,
        SearchSource::Graph => json!({ "graph_hits": state.knowledge.query_knowledge(Some(&req.query), req.topic.as_deref()).await? }),
        SearchSource::Vector => {
            let embedding = state.vector.embed(&req.query).await?;
            let hits = state.vector.search(state.vector.collection(), embedding, req.limit, &HashMap::new()).await?;
            let vector_hits: Vec<Value> = hits
                .into_iter()
                .map(|h| json!({"id": h.id, "score": h.score, "source_type": h.payload.source_type, "topic": h.payload.topic}))
                .collect();
            json!({ "vector_hits": vector_hits })
        }
    };
    Ok(Json(result))
}

//! Inventory surface (§3 Item, §4.3 "Auto-item", §6). Item lookups and the
//! duplicate/similarity checks reuse the same `entity_name:Item` vector
//! namespace and threshold that `skynet-fileproc`'s auto-item photo flow
//! searches when a new item is created from a scanned photo.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use skynet_vector::types::entity_name_namespace;

use super::error::ApiResult;
use crate::app::AppState;

const SIMILARITY_THRESHOLD: f32 = 0.5;
const SIMILARITY_TOP_K: u64 = 3;

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub category: Option<String>,
}

pub async fn list_handler(State(state): State<Arc<AppState>>, Query(q): Query<ListQuery>) -> ApiResult<Json<Vec<Value>>> {
    Ok(Json(state.knowledge.query_inventory(q.category.as_deref()).await?))
}

pub async fn summary_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let rows = state
        .graph
        .query_rows(
            "MATCH (i:Item) RETURN i.category AS category, count(i) AS count, sum(i.quantity) AS total_quantity",
            HashMap::new(),
            &["category", "count", "total_quantity"],
        )
        .await?;
    Ok(Json(json!({"by_category": rows})))
}

#[derive(Deserialize)]
pub struct UpsertItemRequest {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    #[serde(default)]
    pub location: Option<String>,
    pub category: String,
    #[serde(default)]
    pub brand: Option<String>,
}

fn default_quantity() -> i32 {
    1
}

pub async fn upsert_item_handler(State(state): State<Arc<AppState>>, Json(req): Json<UpsertItemRequest>) -> ApiResult<Json<Value>> {
    let name = state
        .knowledge
        .upsert_item(&req.name, req.quantity, req.location.as_deref(), &req.category, req.brand.as_deref())
        .await?;
    Ok(Json(json!({"ok": true, "name": name})))
}

#[derive(Deserialize)]
pub struct UpdateLocationRequest {
    pub name: String,
    pub location: String,
}

pub async fn update_location_handler(State(state): State<Arc<AppState>>, Json(req): Json<UpdateLocationRequest>) -> ApiResult<Json<Value>> {
    let mut props = HashMap::new();
    props.insert("location".to_string(), json!(req.location));
    state.graph.merge_node("Item", "name", &req.name, &props).await?;
    Ok(Json(json!({"ok": true, "name": req.name})))
}

#[derive(Deserialize)]
pub struct UpdateQuantityRequest {
    pub name: String,
    pub quantity: i32,
}

pub async fn update_quantity_handler(State(state): State<Arc<AppState>>, Json(req): Json<UpdateQuantityRequest>) -> ApiResult<Json<Value>> {
    let mut props = HashMap::new();
    props.insert("quantity".to_string(), json!(req.quantity));
    state.graph.merge_node("Item", "name", &req.name, &props).await?;
    Ok(Json(json!({"ok": true, "name": req.name})))
}

pub async fn by_file_handler(State(state): State<Arc<AppState>>, Path(hash): Path<String>) -> ApiResult<Json<Vec<Value>>> {
    let mut params = HashMap::new();
    params.insert("hash".to_string(), json!(hash));
    let rows = state
        .graph
        .query_rows(
            "MATCH (i:Item)-[:FROM_PHOTO]->(:File {sha256: $hash}) \
             RETURN i.name AS name, i.quantity AS quantity, i.location AS location",
            params,
            &["name", "quantity", "location"],
        )
        .await?;
    Ok(Json(rows))
}

pub async fn by_barcode_handler(State(state): State<Arc<AppState>>, Path(code): Path<String>) -> ApiResult<Json<Vec<Value>>> {
    let mut params = HashMap::new();
    params.insert("code".to_string(), json!(code));
    let rows = state
        .graph
        .query_rows(
            "MATCH (i:Item {barcode: $code}) RETURN i.name AS name, i.quantity AS quantity, i.location AS location",
            params,
            &["name", "quantity", "location"],
        )
        .await?;
    Ok(Json(rows))
}

#[derive(Deserialize)]
pub struct UnusedQuery {
    #[serde(default = "default_unused_days")]
    pub older_than_days: i64,
}

fn default_unused_days() -> i64 {
    90
}

pub async fn unused_handler(State(state): State<Arc<AppState>>, Query(q): Query<UnusedQuery>) -> ApiResult<Json<Vec<Value>>> {
    Ok(Json(state.knowledge.query_inventory_unused(q.older_than_days).await?))
}

pub async fn report_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let items = state.knowledge.query_inventory(None).await?;
    let by_category = state
        .graph
        .query_rows(
            "MATCH (i:Item) RETURN i.category AS category, count(i) AS count",
            HashMap::new(),
            &["category", "count"],
        )
        .await?;
    Ok(Json(json!({"items": items, "by_category": by_category})))
}

/// Embeds every item's `{name} {category}` and cross-checks it against the
/// `entity_name:Item` namespace, the same search `handle_auto_item` runs
/// when scanning a new photo — surfaced here as an on-demand sweep instead
/// of only firing at ingestion time.
pub async fn duplicates_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let items = state.knowledge.query_inventory(None).await?;
    let namespace = entity_name_namespace("Item");
    let mut duplicates = Vec::new();

    for item in &items {
        let (Some(name), Some(category)) = (item.get("name").and_then(Value::as_str), item.get("category").and_then(Value::as_str)) else {
            continue;
        };
        let description = format!("{name} {category}");
        let embedding = state.vector.embed(&description).await?;
        let hits = state.vector.search(&namespace, embedding, SIMILARITY_TOP_K, &HashMap::new()).await?;
        for hit in hits {
            if hit.score >= SIMILARITY_THRESHOLD && hit.id != name {
                duplicates.push(json!({"item": name, "similar_to": hit.id, "score": hit.score}));
            }
        }
    }
    Ok(Json(json!({"duplicates": duplicates})))
}

#[derive(Deserialize)]
pub struct SearchSimilarRequest {
    pub query: String,
    #[serde(default = "default_top_k")]
    pub limit: u64,
}

fn default_top_k() -> u64 {
    SIMILARITY_TOP_K
}

pub async fn search_similar_handler(State(state): State<Arc<AppState>>, Json(req): Json<SearchSimilarRequest>) -> ApiResult<Json<Value>> {
    let namespace = entity_name_namespace("Item");
    let embedding = state.vector.embed(&req.query).await?;
    let hits = state.vector.search(&namespace, embedding, req.limit, &HashMap::new()).await?;
    let results: Vec<Value> = hits.into_iter().map(|h| json!({"name": h.id, "score": h.score})).collect();
    Ok(Json(json!({"results": results})))
}

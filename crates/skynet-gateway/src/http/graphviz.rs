//! Graph introspection surface (§4.10, §6): a raw export (same `GraphDump`
//! shape the backup service writes to disk), schema/stats summaries, and a
//! simple rendered PNG bar chart of per-label node counts.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use image::{Rgb, RgbImage};
use serde_json::{json, Value};

use skynet_backup::graph::export_graph;

use super::error::{ApiError, ApiResult};
use crate::app::AppState;

pub async fn export_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let dump = export_graph(&state.graph).await?;
    Ok(Json(json!(dump)))
}

pub async fn schema_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let labels = state
        .graph
        .query_rows("MATCH (n) RETURN DISTINCT labels(n) AS labels", HashMap::new(), &["labels"])
        .await?;
    let rel_types = state
        .graph
        .query_rows("MATCH ()-[r]->() RETURN DISTINCT type(r) AS rel_type", HashMap::new(), &["rel_type"])
        .await?;
    Ok(Json(json!({"labels": labels, "relationship_types": rel_types})))
}

async fn label_counts(state: &AppState) -> ApiResult<Vec<(String, i64)>> {
    let rows = state
        .graph
        .query_rows(
            "MATCH (n) UNWIND labels(n) AS label RETURN label, count(*) AS count ORDER BY count DESC",
            HashMap::new(),
            &["label", "count"],
        )
        .await?;
    Ok(rows
        .into_iter()
        .filter_map(|r| {
            let label = r.get("label")?.as_str()?.to_string();
            let count = r.get("count")?.as_i64()?;
            Some((label, count))
        })
        .collect())
}

pub async fn stats_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let counts = label_counts(&state).await?;
    let total: i64 = counts.iter().map(|(_, c)| c).sum();
    Ok(Json(json!({"total_nodes": total, "by_label": counts})))
}

const IMAGE_WIDTH: u32 = 640;
const IMAGE_HEIGHT: u32 = 360;
const BAR_COLOR: Rgb<u8> = Rgb([70, 130, 180]);
const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Renders a bar chart of node counts per label — no chart library in this
/// workspace, so bars are drawn directly onto an `RgbImage` pixel buffer.
pub async fn image_handler(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let counts = label_counts(&state).await?;
    let max_count = counts.iter().map(|(_, c)| *c).max().unwrap_or(1).max(1);

    let mut img = RgbImage::from_pixel(IMAGE_WIDTH, IMAGE_HEIGHT, BACKGROUND);
    let bar_count = counts.len().max(1) as u32;
    let bar_width = (IMAGE_WIDTH / bar_count).max(1);

    for (i, (_, count)) in counts.iter().enumerate() {
        let bar_height = ((*count as f64 / max_count as f64) * (IMAGE_HEIGHT as f64 - 20.0)) as u32;
        let x0 = i as u32 * bar_width;
        let y0 = IMAGE_HEIGHT.saturating_sub(bar_height);
        for x in x0..(x0 + bar_width).min(IMAGE_WIDTH).saturating_sub(2) {
            for y in y0..IMAGE_HEIGHT {
                img.put_pixel(x, y, BAR_COLOR);
            }
        }
    }

    let mut bytes: Vec<u8> = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
        .map_err(|e| ApiError::from(skynet_core::error::SkynetError::Internal(e.to_string())))?;

    Ok(([(header::CONTENT_TYPE, "image/png")], bytes))
}

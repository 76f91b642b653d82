use std::collections::HashMap;

use skynet_vector::VectorStore;

use crate::error::Result;
use crate::types::VectorDump;

/// Batch size for the Qdrant scroll cursor (§4.10).
const SCROLL_BATCH: u32 = 100;

pub async fn export_vector(vector: &VectorStore) -> Result<VectorDump> {
    let names = vector.list_collections().await?;
    let mut collections = HashMap::new();
    for name in names {
        let points = vector.scroll_all(&name, SCROLL_BATCH).await?;
        collections.insert(name, points);
    }
    Ok(VectorDump { collections })
}

pub async fn import_vector(vector: &VectorStore, dump: &VectorDump) -> Result<()> {
    for (collection, points) in &dump.collections {
        vector.ensure_namespace(collection).await?;
        for point in points {
            vector.upsert(collection, &point.id, point.vector.clone(), &point.payload).await?;
        }
    }
    Ok(())
}

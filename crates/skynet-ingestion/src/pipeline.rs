use std::sync::Arc;

use futures_util::future::join_all;
use sha2::{Digest, Sha256};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use skynet_core::config::IngestionConfig;
use skynet_knowledge::types::ExtractedFact;
use skynet_knowledge::KnowledgeService;
use skynet_ner::{Extractor as NerExtractor, NerClient};
use skynet_vector::types::VectorPayload;
use skynet_vector::VectorStore;

use crate::chunk::chunk_text;
use crate::error::{IngestionError, Result};
use crate::ports::Completion;
use crate::types::{IngestFileRequest, IngestRequest, IngestResult, IngestStatus, RawFactResponse};

const SYSTEM_TRANSLATE: &str = "Translate the given Arabic (or mixed Arabic/English) text into clear English. \
Preserve names, reference numbers, and dates verbatim. Respond with the translation only, no commentary.";

const SYSTEM_ENRICH: &str = "Read the chunk of a larger document below and write a single 1-2 sentence \
paragraph in English that situates it within the likely surrounding context (what the document is about, \
what section this chunk belongs to). Respond with the paragraph only.";

const SYSTEM_EXTRACT_FACTS: &str = "Extract structured facts (entities and relationships) from the text below. \
NER hints, if present, name entities already recognised upstream — reuse their exact surface form. Respond \
ONLY with JSON: {\"facts\": [{\"label\": \"Person|Company|Project|Knowledge|...\", \"name\": \"...\", \
\"properties\": {}, \"relationships\": [{\"rel_type\": \"...\", \"target_label\": \"...\", \"target_name\": \"...\"}]}]}.";

/// Translate → chunk → contextual-enrichment → embed + fact-extract → upsert
/// (§4.2). Steps 2-4 fan out concurrently per chunk, bounded by
/// `IngestionConfig::concurrency`.
pub struct IngestionPipeline {
    knowledge: Arc<KnowledgeService>,
    vector: Arc<VectorStore>,
    ner: Arc<NerClient>,
    ner_extractor: Arc<dyn NerExtractor>,
    llm: Arc<dyn Completion>,
    config: IngestionConfig,
}

impl IngestionPipeline {
    pub fn new(
        knowledge: Arc<KnowledgeService>,
        vector: Arc<VectorStore>,
        ner: Arc<NerClient>,
        ner_extractor: Arc<dyn NerExtractor>,
        llm: Arc<dyn Completion>,
        config: IngestionConfig,
    ) -> Self {
        Self { knowledge, vector, ner, ner_extractor, llm, config }
    }

    /// Core pipeline, steps 1-5. Does not handle re-upload bookkeeping —
    /// see `ingest_file` for the full contract including duplicate
    /// detection and supersession.
    pub async fn ingest_text(&self, req: IngestRequest) -> Result<IngestResult> {
        if req.text.trim().is_empty() {
            return Err(IngestionError::Validation("ingest_text called with empty text".to_string()));
        }

        let translated = if contains_arabic(&req.text) {
            self.llm
                .complete(SYSTEM_TRANSLATE, &req.text)
                .await
                .map_err(|e| IngestionError::Translation(e.to_string()))?
        } else {
            req.text.clone()
        };

        let storage_chunks = chunk_text(&translated, self.config.chunk_tokens, self.config.chunk_overlap_tokens);
        let extraction_chunks = chunk_text(&translated, self.config.extraction_chunk_tokens, 0);

        let hints = {
            let entities = self.ner.extract(&self.ner_extractor, &req.text).await.unwrap_or_else(|e| {
                warn!(error = %e, "NER hint extraction failed; continuing without hints");
                Vec::new()
            });
            NerClient::render_hints(&entities)
        };

        let semaphore = Arc::new(Semaphore::new(self.config.concurrency.max(1)));

        let embed_futures = storage_chunks.iter().map(|chunk| {
            let sem = semaphore.clone();
            let req = &req;
            async move {
                let _permit = sem.acquire().await.expect("semaphore not closed");
                self.enrich_and_upsert_chunk(chunk, req).await
            }
        });
        let embed_results: Vec<Result<()>> = join_all(embed_futures).await;
        let chunks_stored = embed_results.iter().filter(|r| r.is_ok()).count();
        for err in embed_results.into_iter().filter_map(Result::err) {
            warn!(error = %err, "chunk embed+upsert failed");
        }

        let extract_futures = extraction_chunks.iter().map(|chunk| {
            let sem = semaphore.clone();
            let hints = &hints;
            async move {
                let _permit = sem.acquire().await.expect("semaphore not closed");
                self.extract_chunk_facts(chunk, hints).await
            }
        });
        let extract_results: Vec<Result<Vec<ExtractedFact>>> = join_all(extract_futures).await;
        let mut facts = Vec::new();
        for result in extract_results {
            match result {
                Ok(mut f) => facts.append(&mut f),
                Err(e) => warn!(error = %e, "fact extraction failed for a chunk"),
            }
        }

        let facts_extracted = facts.len();
        let entities = self.knowledge.upsert_from_facts(&facts, req.file_hash.as_deref()).await?;

        info!(chunks_stored, facts_extracted, entities = entities.len(), "ingested text");

        Ok(IngestResult {
            status: IngestStatus::Stored,
            chunks_stored,
            facts_extracted,
            entities,
        })
    }

    async fn enrich_and_upsert_chunk(&self, chunk: &str, req: &IngestRequest) -> Result<()> {
        let paragraph = self
            .llm
            .complete(SYSTEM_ENRICH, chunk)
            .await
            .map_err(|e| IngestionError::Enrichment(e.to_string()))?;
        let enriched = format!("{paragraph}\n\n{chunk}");

        let vector_ref = self.vector.embed(&enriched).await?;

        let mut extra = std::collections::HashMap::new();
        if !req.tags.is_empty() {
            extra.insert("tags".to_string(), req.tags.join(","));
        }
        let payload = VectorPayload {
            source_type: req.source_type.clone(),
            entity_type: None,
            topic: req.topic.clone(),
            file_hash: req.file_hash.clone(),
            session_id: req.session_id.clone(),
            extra,
        };

        let id = uuid::Uuid::new_v4().to_string();
        self.vector.upsert(self.vector.collection(), &id, vector_ref, &payload).await?;
        Ok(())
    }

    async fn extract_chunk_facts(&self, chunk: &str, hints: &str) -> Result<Vec<ExtractedFact>> {
        let user = if hints.is_empty() {
            chunk.to_string()
        } else {
            format!("{hints}\n\n{chunk}")
        };
        let raw = self
            .llm
            .complete(SYSTEM_EXTRACT_FACTS, &user)
            .await
            .map_err(|e| IngestionError::Extraction(e.to_string()))?;
        let parsed: RawFactResponse = serde_json::from_str(raw.trim())
            .map_err(|e| IngestionError::Malformed(format!("could not parse fact-extraction response as JSON: {e}")))?;
        debug!(facts = parsed.facts.len(), "extracted facts from chunk");
        Ok(parsed.facts)
    }

    /// Full `ingest_file` contract including re-upload semantics (§4.2).
    pub async fn ingest_file(&self, req: IngestFileRequest) -> Result<IngestResult> {
        let hash = sha256_hex(&req.bytes);

        if self.knowledge.find_file_by_hash(&hash).await?.is_some() {
            return Ok(IngestResult {
                status: IngestStatus::Duplicate,
                chunks_stored: 0,
                facts_extracted: 0,
                entities: Vec::new(),
            });
        }

        let previous = self.knowledge.find_file_by_filename(&req.filename).await?;
        let old_hash = previous
            .as_ref()
            .and_then(|f| f.get("sha256"))
            .and_then(|v| v.as_str())
            .map(str::to_string);

        let snapshot = if let Some(old_hash) = &old_hash {
            let snapshot = self.knowledge.get_file_section_map(old_hash).await.unwrap_or_default();
            self.knowledge.cleanup_file_entities(old_hash, self.vector.collection()).await?;
            Some(snapshot)
        } else {
            None
        };

        self.knowledge.ensure_file_stub(&hash, &req.filename, &req.mime, req.bytes.len() as i64).await?;

        let mut result = self
            .ingest_text(IngestRequest {
                text: req.text,
                source_type: req.source_type,
                tags: req.tags,
                topic: req.topic,
                session_id: req.session_id,
                file_hash: Some(hash.clone()),
                filename: Some(req.filename),
            })
            .await?;

        if let (Some(old_hash), Some(snapshot)) = (old_hash, snapshot) {
            self.knowledge.supersede_file(&old_hash, &hash).await?;
            self.knowledge.restore_section_links(&snapshot, &result.entities).await?;
            result.status = IngestStatus::Superseded;
        }

        Ok(result)
    }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

fn contains_arabic(text: &str) -> bool {
    text.chars().any(|c| ('\u{0600}'..='\u{06FF}').contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_hex_is_deterministic() {
        assert_eq!(sha256_hex(b"hello"), sha256_hex(b"hello"));
        assert_ne!(sha256_hex(b"hello"), sha256_hex(b"world"));
    }

    #[test]
    fn detects_arabic_script() {
        assert!(contains_arabic("مرحبا بالعالم"));
        assert!(!contains_arabic("hello world"));
        assert!(contains_arabic("hello مرحبا"));
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use skynet_knowledge::category::categorize;
use skynet_knowledge::KnowledgeService;
use skynet_vector::types::{entity_name_namespace, VectorPayload};
use skynet_vector::VectorStore;

use skynet_ingestion::{sha256_hex, IngestFileRequest, IngestRequest, IngestResult, IngestionPipeline};

use crate::audio::{decode_wav_pcm16, AsrEngine};
use crate::classify::{media_kind, DEFAULT_IMAGE_CLASS};
use crate::decode::decode_text;
use crate::error::Result;
use crate::pdf::{self, PdfRenderer, MAX_VISION_PAGES, VISION_FALLBACK_CHAR_THRESHOLD, VISION_RENDER_DPI};
use crate::types::{FileClass, MediaKind, ProcessFileRequest, ProcessFileResult, VisionAnalysis};
use crate::url_ingest::fetch_as_text;
use crate::vision::{analysis_to_text, VisionPort};

const INVENTORY_SIMILARITY_THRESHOLD: f32 = 0.5;
const INVENTORY_SIMILARITY_TOP_K: u64 = 3;
const DEFAULT_CURRENCY: &str = "SAR";

/// Classification + branch dispatch (§4.3). Composes the vision/PDF-render/
/// ASR ports with the ingestion pipeline and knowledge service.
pub struct FileProcessor {
    vision: Arc<dyn VisionPort>,
    pdf_renderer: Arc<dyn PdfRenderer>,
    asr: Arc<AsrEngine>,
    ingestion: Arc<IngestionPipeline>,
    knowledge: Arc<KnowledgeService>,
    vector: Arc<VectorStore>,
    http: reqwest::Client,
}

impl FileProcessor {
    pub fn new(
        vision: Arc<dyn VisionPort>,
        pdf_renderer: Arc<dyn PdfRenderer>,
        asr: Arc<AsrEngine>,
        ingestion: Arc<IngestionPipeline>,
        knowledge: Arc<KnowledgeService>,
        vector: Arc<VectorStore>,
    ) -> Self {
        Self {
            vision,
            pdf_renderer,
            asr,
            ingestion,
            knowledge,
            vector,
            http: reqwest::Client::new(),
        }
    }

    pub async fn process_file(
        &self,
        req: ProcessFileRequest,
        source_type: &str,
        tags: Vec<String>,
        topic: Option<String>,
    ) -> Result<ProcessFileResult> {
        match media_kind(&req.mime, &req.filename) {
            MediaKind::Image => self.process_image(req, source_type, tags, topic).await,
            MediaKind::Pdf => self.process_pdf(req, source_type, tags, topic).await,
            MediaKind::Audio => self.process_audio(req, source_type, tags, topic).await,
            MediaKind::Text => self.process_text_file(req, source_type, tags, topic).await,
        }
    }

    async fn process_image(
        &self,
        req: ProcessFileRequest,
        source_type: &str,
        tags: Vec<String>,
        topic: Option<String>,
    ) -> Result<ProcessFileResult> {
        let class = self
            .vision
            .classify(&req.bytes, &req.mime)
            .await
            .unwrap_or(DEFAULT_IMAGE_CLASS);
        let analysis = self.vision.analyze(class, &req.bytes, &req.mime).await?;
        let text = analysis_to_text(&analysis);
        let file_hash = sha256_hex(&req.bytes);

        let barcode = crate::barcode::scan(&req.bytes).ok().flatten();

        let ingest = self
            .ingestion
            .ingest_file(IngestFileRequest {
                bytes: req.bytes,
                text,
                filename: req.filename,
                mime: req.mime,
                source_type: source_type.to_string(),
                tags,
                topic,
                session_id: req.session_id,
            })
            .await?;

        let mut similar_inventory_warning = None;
        if class == FileClass::InventoryItem {
            similar_inventory_warning = self.handle_auto_item(&analysis, barcode.as_ref(), &file_hash).await?;
        }

        let mut auto_expense_created = false;
        if class == FileClass::Invoice {
            if let Some(total) = analysis.total_amount {
                if total > 0.0 {
                    self.handle_auto_expense(&analysis, total).await?;
                    auto_expense_created = true;
                }
            }
        }

        Ok(ProcessFileResult {
            class,
            ingest,
            barcode: barcode.map(|(code, _)| code),
            similar_inventory_warning,
            auto_expense_created,
        })
    }

    /// Embeds the item's name+category, warns if a similar item is already
    /// stored (threshold 0.5, top 3), then creates the Item, links it to the
    /// source photo via `FROM_PHOTO`, and stores its vector so future scans
    /// can find it too (§4.3 "Auto-item").
    async fn handle_auto_item(
        &self,
        analysis: &VisionAnalysis,
        barcode: Option<&(String, String)>,
        file_hash: &str,
    ) -> Result<Option<String>> {
        let name = analysis
            .fields
            .get("name")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| analysis.summary.clone());
        let category = analysis.category.clone().unwrap_or_else(|| "general".to_string());

        let description = format!("{name} {category}");
        let vector = self.vector.embed(&description).await?;
        let namespace = entity_name_namespace("Item");

        let hits = self
            .vector
            .search(&namespace, vector.clone(), INVENTORY_SIMILARITY_TOP_K, &HashMap::new())
            .await?;
        let warning = hits
            .iter()
            .find(|h| h.score >= INVENTORY_SIMILARITY_THRESHOLD)
            .map(|_| format!("possible duplicate of existing inventory matching \"{name}\""));

        self.knowledge.upsert_item(&name, 1, None, &category, None).await?;
        self.knowledge.link_entity_to_file("Item", &name, "FROM_PHOTO", file_hash).await?;

        if let Some((code, kind)) = barcode {
            info!(item = %name, barcode = %code, format = %kind, "attached barcode to auto-created item");
        }

        let id = uuid::Uuid::new_v4().to_string();
        self.vector
            .upsert(
                &namespace,
                &id,
                vector,
                &VectorPayload {
                    source_type: "item".to_string(),
                    entity_type: Some("Item".to_string()),
                    topic: None,
                    file_hash: None,
                    session_id: None,
                    extra: HashMap::new(),
                },
            )
            .await?;

        Ok(warning)
    }

    /// Invoice-class images with a parsed numeric total create an Expense
    /// with the parsed vendor and a category from the same keyword heuristic
    /// used for Knowledge categorisation (§4.3 "Auto-expense").
    async fn handle_auto_expense(&self, analysis: &VisionAnalysis, total: f64) -> Result<()> {
        let category = categorize(&analysis.summary, analysis.vendor.as_deref().unwrap_or(""));
        let id = uuid::Uuid::new_v4().to_string();
        self.knowledge
            .upsert_expense(&id, total, DEFAULT_CURRENCY, &category, analysis.vendor.as_deref())
            .await?;
        Ok(())
    }

    async fn process_pdf(
        &self,
        req: ProcessFileRequest,
        source_type: &str,
        tags: Vec<String>,
        topic: Option<String>,
    ) -> Result<ProcessFileResult> {
        let mut text = pdf::extract_text(&req.bytes).unwrap_or_default();

        if text.trim().len() < VISION_FALLBACK_CHAR_THRESHOLD {
            warn!("pdf text layer too short, falling back to page-rendered vision");
            let pages = self
                .pdf_renderer
                .render_pages(&req.bytes, MAX_VISION_PAGES, VISION_RENDER_DPI)
                .await?;
            let mut rendered = String::new();
            for page in pages {
                let analysis = self.vision.analyze(FileClass::PdfDocument, &page, "image/png").await?;
                rendered.push_str(&analysis_to_text(&analysis));
                rendered.push('\n');
            }
            text = rendered;
        }

        let ingest = self
            .ingestion
            .ingest_file(IngestFileRequest {
                bytes: req.bytes,
                text,
                filename: req.filename,
                mime: req.mime,
                source_type: source_type.to_string(),
                tags,
                topic,
                session_id: req.session_id,
            })
            .await?;

        Ok(ProcessFileResult {
            class: FileClass::PdfDocument,
            ingest,
            barcode: None,
            similar_inventory_warning: None,
            auto_expense_created: false,
        })
    }

    async fn process_audio(
        &self,
        req: ProcessFileRequest,
        source_type: &str,
        tags: Vec<String>,
        topic: Option<String>,
    ) -> Result<ProcessFileResult> {
        let (samples, _rate) = decode_wav_pcm16(&req.bytes)?;
        let text = self.asr.transcribe(&samples).await?;

        let ingest = self
            .ingestion
            .ingest_file(IngestFileRequest {
                bytes: req.bytes,
                text,
                filename: req.filename,
                mime: req.mime,
                source_type: source_type.to_string(),
                tags,
                topic,
                session_id: req.session_id,
            })
            .await?;

        Ok(ProcessFileResult {
            class: FileClass::AudioRecording,
            ingest,
            barcode: None,
            similar_inventory_warning: None,
            auto_expense_created: false,
        })
    }

    async fn process_text_file(
        &self,
        req: ProcessFileRequest,
        source_type: &str,
        tags: Vec<String>,
        topic: Option<String>,
    ) -> Result<ProcessFileResult> {
        let text = decode_text(&req.bytes)?;

        let ingest = self
            .ingestion
            .ingest_file(IngestFileRequest {
                bytes: req.bytes,
                text,
                filename: req.filename,
                mime: req.mime,
                source_type: source_type.to_string(),
                tags,
                topic,
                session_id: req.session_id,
            })
            .await?;

        Ok(ProcessFileResult {
            class: FileClass::Note,
            ingest,
            barcode: None,
            similar_inventory_warning: None,
            auto_expense_created: false,
        })
    }

    /// URL ingestion (§4.3): GitHub repo/blob/tree or generic HTTP(S).
    pub async fn ingest_url(&self, url: &str, source_type: &str, tags: Vec<String>, topic: Option<String>) -> Result<IngestResult> {
        let text = fetch_as_text(&self.http, url).await?;
        Ok(self
            .ingestion
            .ingest_text(IngestRequest {
                text,
                source_type: source_type.to_string(),
                tags,
                topic,
                session_id: None,
                file_hash: None,
                filename: None,
            })
            .await?)
    }
}

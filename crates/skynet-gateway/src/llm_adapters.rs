//! Concrete LLM-backed implementations of the minimal provider "seams"
//! each lower crate defines (`skynet_ingestion::Completion`,
//! `skynet_ner::Extractor`, `skynet_fileproc::VisionPort`,
//! `skynet_fileproc::pdf::PdfRenderer`). Each trait doc comment explains
//! why the seam exists: to let this crate implement it against
//! `AgentRuntime`'s provider without creating a dependency cycle.

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine as _;

use skynet_agent::provider::{ChatRequest, Message, Role};
use skynet_agent::runtime::AgentRuntime;
use skynet_fileproc::pdf::PdfRenderer;
use skynet_fileproc::vision::{prompt_for_class, VisionPort};
use skynet_fileproc::{FileClass, Result as FileprocResult};

/// Shared non-streaming, toolless completion call against the configured
/// default model.
async fn complete(agent: &AgentRuntime, system: &str, user: &str) -> Result<String, String> {
    let model = agent.get_model().await;
    let req = ChatRequest {
        model,
        system: system.to_string(),
        system_prompt: None,
        messages: vec![Message {
            role: Role::User,
            content: user.to_string(),
        }],
        max_tokens: 4096,
        stream: false,
        thinking: None,
        tools: Vec::new(),
        raw_messages: None,
    };
    agent.provider().send(&req).await.map(|r| r.content).map_err(|e| e.to_string())
}

/// Implements `skynet_ingestion::Completion` against the gateway's agent
/// runtime — translation, enrichment, and fact-extraction prompts all go
/// through the same system+user completion call.
pub struct AgentCompletion {
    agent: Arc<AgentRuntime>,
}

impl AgentCompletion {
    pub fn new(agent: Arc<AgentRuntime>) -> Self {
        Self { agent }
    }
}

#[async_trait]
impl skynet_ingestion::Completion for AgentCompletion {
    async fn complete(&self, system: &str, user: &str) -> skynet_ingestion::Result<String> {
        complete(&self.agent, system, user)
            .await
            .map_err(skynet_ingestion::IngestionError::Extraction)
    }
}

/// Implements `skynet_ner::Extractor` against the same agent runtime.
pub struct AgentExtractor {
    agent: Arc<AgentRuntime>,
}

impl AgentExtractor {
    pub fn new(agent: Arc<AgentRuntime>) -> Self {
        Self { agent }
    }
}

#[async_trait]
impl skynet_ner::Extractor for AgentExtractor {
    async fn complete(&self, system: &str, user: &str) -> skynet_ner::Result<String> {
        complete(&self.agent, system, user)
            .await
            .map_err(skynet_ner::error::NerError::Extraction)
    }
}

/// Implements `VisionPort` by sending the image as an Anthropic-style
/// base64 content block alongside the class-specific prompt (§4.3).
pub struct AgentVision {
    agent: Arc<AgentRuntime>,
}

impl AgentVision {
    pub fn new(agent: Arc<AgentRuntime>) -> Self {
        Self { agent }
    }

    async fn ask(&self, prompt: &str, bytes: &[u8], mime: &str) -> FileprocResult<String> {
        let data = base64::engine::general_purpose::STANDARD.encode(bytes);
        let model = self.agent.get_model().await;
        let raw_messages = vec![serde_json::json!({
            "role": "user",
            "content": [
                {"type": "image", "source": {"type": "base64", "media_type": mime, "data": data}},
                {"type": "text", "text": prompt},
            ]
        })];
        let req = ChatRequest {
            model,
            system: "Respond with a single JSON object only, no prose.".to_string(),
            system_prompt: None,
            messages: Vec::new(),
            max_tokens: 2048,
            stream: false,
            thinking: None,
            tools: Vec::new(),
            raw_messages: Some(raw_messages),
        };
        self.agent
            .provider()
            .send(&req)
            .await
            .map(|r| r.content)
            .map_err(|e| skynet_fileproc::FileprocError::Vision(e.to_string()))
    }
}

#[async_trait]
impl VisionPort for AgentVision {
    async fn classify(&self, bytes: &[u8], mime: &str) -> FileprocResult<FileClass> {
        let prompt = "Classify this image into exactly one of: invoice, official_document, \
                      personal_photo, info_image, note, project_file, price_list, business_card, \
                      inventory_item. Respond with JSON: {\"class\": \"<one of the above>\"}.";
        let raw = self.ask(prompt, bytes, mime).await?;
        let parsed: serde_json::Value =
            serde_json::from_str(raw.trim()).map_err(|e| skynet_fileproc::FileprocError::Malformed(e.to_string()))?;
        let class = parsed
            .get("class")
            .and_then(|v| v.as_str())
            .ok_or_else(|| skynet_fileproc::FileprocError::Malformed("missing 'class' field".to_string()))?;
        match class {
            "invoice" => Ok(FileClass::Invoice),
            "official_document" => Ok(FileClass::OfficialDocument),
            "personal_photo" => Ok(FileClass::PersonalPhoto),
            "info_image" => Ok(FileClass::InfoImage),
            "note" => Ok(FileClass::Note),
            "project_file" => Ok(FileClass::ProjectFile),
            "price_list" => Ok(FileClass::PriceList),
            "business_card" => Ok(FileClass::BusinessCard),
            "inventory_item" => Ok(FileClass::InventoryItem),
            other => Err(skynet_fileproc::FileprocError::Malformed(format!("unknown class: {other}"))),
        }
    }

    async fn analyze(&self, class: FileClass, bytes: &[u8], mime: &str) -> FileprocResult<skynet_fileproc::types::VisionAnalysis> {
        let prompt = format!(
            "{} Respond with JSON matching: {{\"summary\": string, \"summary_ar\": string|null, \
             \"name_ar\": string|null, \"reference_numbers\": [string], \"vendor\": string|null, \
             \"total_amount\": number|null, \"category\": string|null, \"fields\": object}}.",
            prompt_for_class(class)
        );
        let raw = self.ask(&prompt, bytes, mime).await?;
        serde_json::from_str(raw.trim()).map_err(|e| skynet_fileproc::FileprocError::Malformed(e.to_string()))
    }
}

/// No-op `PdfRenderer`: the workspace carries no PDF-rasterization crate
/// (pdfium/poppler-equivalent), so scanned PDFs with no text layer fall
/// through `pdf-extract`'s empty output and are stored with whatever text
/// (possibly none) `pdf-extract` recovered. Recorded as an explicit open
/// decision rather than fabricating a dependency.
pub struct NullPdfRenderer;

#[async_trait]
impl PdfRenderer for NullPdfRenderer {
    async fn render_pages(&self, _bytes: &[u8], _max_pages: usize, _dpi: u32) -> FileprocResult<Vec<Vec<u8>>> {
        Ok(Vec::new())
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification buckets chosen by the lightweight vision/file-type
/// classifier (§4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileClass {
    Invoice,
    OfficialDocument,
    PersonalPhoto,
    InfoImage,
    Note,
    ProjectFile,
    PriceList,
    BusinessCard,
    InventoryItem,
    PdfDocument,
    AudioRecording,
}

impl fmt::Display for FileClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FileClass::Invoice => "invoice",
            FileClass::OfficialDocument => "official_document",
            FileClass::PersonalPhoto => "personal_photo",
            FileClass::InfoImage => "info_image",
            FileClass::Note => "note",
            FileClass::ProjectFile => "project_file",
            FileClass::PriceList => "price_list",
            FileClass::BusinessCard => "business_card",
            FileClass::InventoryItem => "inventory_item",
            FileClass::PdfDocument => "pdf_document",
            FileClass::AudioRecording => "audio_recording",
        };
        write!(f, "{s}")
    }
}

/// Broad media kind, determined from mime/extension before the finer-
/// grained `FileClass` vision call runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Pdf,
    Audio,
    Text,
}

/// The structured result of a per-class vision prompt (§4.3, step "Image").
/// Rendered to readable bilingual text by `_analysis_to_text` before
/// ingestion; `name_ar` and `reference_numbers` are preserved verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisionAnalysis {
    pub summary: String,
    #[serde(default)]
    pub summary_ar: Option<String>,
    #[serde(default)]
    pub name_ar: Option<String>,
    #[serde(default)]
    pub reference_numbers: Vec<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct ProcessFileRequest {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub mime: String,
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessFileResult {
    pub class: FileClass,
    pub ingest: skynet_ingestion::IngestResult,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub similar_inventory_warning: Option<String>,
    #[serde(default)]
    pub auto_expense_created: bool,
}

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{FileClass, VisionAnalysis};

/// The image-analysis port this crate needs. Mirrors `skynet-ner::Extractor`
/// / `skynet-ingestion::Completion`: a minimal seam so `skynet-agent`'s
/// provider adapters can implement it without a dependency cycle.
#[async_trait]
pub trait VisionPort: Send + Sync {
    /// One-shot classification into a `FileClass` from the raw image bytes.
    async fn classify(&self, bytes: &[u8], mime: &str) -> Result<FileClass>;

    /// Runs the class-specific prompt and returns the structured analysis.
    async fn analyze(&self, class: FileClass, bytes: &[u8], mime: &str) -> Result<VisionAnalysis>;
}

/// Per-class vision prompt template (§4.3 "type-specific vision prompt").
pub fn prompt_for_class(class: FileClass) -> &'static str {
    match class {
        FileClass::Invoice => {
            "This is an invoice or receipt. Extract vendor, line items, total amount, currency, and date. \
             Respond with JSON matching the analysis schema; preserve reference/invoice numbers verbatim."
        }
        FileClass::OfficialDocument => {
            "This is an official document (ID, certificate, government letter). Extract the document type, \
             holder name (preserve the Arabic form in name_ar if present), and any reference numbers verbatim."
        }
        FileClass::PersonalPhoto => "This is a personal photo. Briefly describe who/what is shown and the setting.",
        FileClass::InfoImage => "This image contains information (screenshot, sign, label). Transcribe the readable text.",
        FileClass::Note => "This is a handwritten or photographed note. Transcribe its content as faithfully as possible.",
        FileClass::ProjectFile => "This image is a project-related artifact (diagram, whiteboard, mockup). Describe its content and structure.",
        FileClass::PriceList => "This is a price list or menu. Extract each item name and its price, preserving currency and units.",
        FileClass::BusinessCard => {
            "This is a business card. Extract the person's name (and name_ar if Arabic text is present), \
             company, title, and contact details."
        }
        FileClass::InventoryItem => "This is a photo of a physical item for inventory tracking. Describe the item, its apparent condition, and any visible brand or model markings.",
        FileClass::PdfDocument | FileClass::AudioRecording => {
            "Describe the content of this page."
        }
    }
}

/// Arabic+English readable rendering of a `VisionAnalysis` (§4.3
/// `_analysis_to_text`). `name_ar` and reference numbers are carried
/// through verbatim so downstream ingestion/NER can pick them up.
pub fn analysis_to_text(analysis: &VisionAnalysis) -> String {
    let mut lines = Vec::new();
    lines.push(analysis.summary.clone());
    if let Some(ar) = &analysis.summary_ar {
        lines.push(ar.clone());
    }
    if let Some(name_ar) = &analysis.name_ar {
        lines.push(format!("name_ar: {name_ar}"));
    }
    if let Some(vendor) = &analysis.vendor {
        lines.push(format!("vendor: {vendor}"));
    }
    if let Some(total) = analysis.total_amount {
        lines.push(format!("total: {total}"));
    }
    if let Some(category) = &analysis.category {
        lines.push(format!("category: {category}"));
    }
    if !analysis.reference_numbers.is_empty() {
        lines.push(format!("reference numbers: {}", analysis.reference_numbers.join(", ")));
    }
    for (key, value) in &analysis.fields {
        lines.push(format!("{key}: {value}"));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_name_ar_and_reference_numbers_verbatim() {
        let analysis = VisionAnalysis {
            summary: "Invoice from Al-Noor Trading".to_string(),
            name_ar: Some("النور للتجارة".to_string()),
            reference_numbers: vec!["INV-2026-0042".to_string()],
            ..Default::default()
        };
        let text = analysis_to_text(&analysis);
        assert!(text.contains("النور للتجارة"));
        assert!(text.contains("INV-2026-0042"));
    }

    #[test]
    fn prompt_for_each_class_is_non_empty() {
        for class in [
            FileClass::Invoice,
            FileClass::OfficialDocument,
            FileClass::PersonalPhoto,
            FileClass::InfoImage,
            FileClass::Note,
            FileClass::ProjectFile,
            FileClass::PriceList,
            FileClass::BusinessCard,
            FileClass::InventoryItem,
        ] {
            assert!(!prompt_for_class(class).is_empty());
        }
    }
}

use async_trait::async_trait;

use crate::error::{FileprocError, Result};

/// Below this many extracted characters we assume the PDF is a scan with no
/// text layer and fall back to page-rendered vision calls (§4.3).
pub const VISION_FALLBACK_CHAR_THRESHOLD: usize = 200;

/// Cap on pages rendered for the vision fallback.
pub const MAX_VISION_PAGES: usize = 5;

/// Render DPI used for the vision-fallback page images.
pub const VISION_RENDER_DPI: u32 = 200;

pub fn extract_text(bytes: &[u8]) -> Result<String> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| FileprocError::Pdf(e.to_string()))
}

/// PDF page rasterization port. `pdf-extract` only pulls text, so scanned
/// documents need an external renderer (pdfium/poppler) behind this seam —
/// a thin port rather than a hand-rolled rasterizer, same reasoning as
/// `VisionPort`.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    /// Renders up to `max_pages` pages at `dpi`, returning PNG bytes per page.
    async fn render_pages(&self, bytes: &[u8], max_pages: usize, dpi: u32) -> Result<Vec<Vec<u8>>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_match_spec_defaults() {
        assert_eq!(VISION_FALLBACK_CHAR_THRESHOLD, 200);
        assert_eq!(MAX_VISION_PAGES, 5);
        assert_eq!(VISION_RENDER_DPI, 200);
    }
}

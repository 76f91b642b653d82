use image::GenericImageView;
use rxing::common::HybridBinarizer;
use rxing::{BinaryBitmap, Luma8LuminanceSource, MultiFormatReader, Reader};

use crate::error::{FileprocError, Result};

/// Scans raw image bytes for a barcode (§4.3 "Auto-item": barcode scan runs
/// on raw bytes; if present, it's attached to the created Item).
pub fn scan(bytes: &[u8]) -> Result<Option<(String, String)>> {
    let img = image::load_from_memory(bytes).map_err(|e| FileprocError::Image(e.to_string()))?;
    let luma = img.to_luma8();
    let (width, height) = luma.dimensions();
    let source = Luma8LuminanceSource::new(luma.into_raw(), width, height);
    let binarizer = HybridBinarizer::new(source);
    let mut bitmap = BinaryBitmap::new(binarizer);
    let mut reader = MultiFormatReader::default();

    match reader.decode(&mut bitmap) {
        Ok(result) => Ok(Some((result.getText().to_string(), format!("{:?}", result.getBarcodeFormat())))),
        Err(_) => Ok(None),
    }
}

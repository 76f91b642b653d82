use crate::error::{FileprocError, Result};

/// utf-8 → cp1256 (Arabic Windows code page) → latin-1 fallback chain
/// (§4.3, "Text" branch). Each encoding either decodes cleanly or we move
/// on; latin-1 never fails since every byte maps to a codepoint.
pub fn decode_text(bytes: &[u8]) -> Result<String> {
    if let Ok(s) = std::str::from_utf8(bytes) {
        return Ok(s.to_string());
    }

    let (decoded, _, had_errors) = encoding_rs::WINDOWS_1256.decode(bytes);
    if !had_errors {
        return Ok(decoded.into_owned());
    }

    let (decoded, _, had_errors) = encoding_rs::WINDOWS_1252.decode(bytes);
    if !had_errors {
        return Ok(decoded.into_owned());
    }

    Err(FileprocError::UndecodableText)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_valid_utf8() {
        assert_eq!(decode_text("مرحبا".as_bytes()).unwrap(), "مرحبا");
    }

    #[test]
    fn decodes_windows_1256_arabic_bytes() {
        let (encoded, _, had_errors) = encoding_rs::WINDOWS_1256.encode("شكرا");
        assert!(!had_errors);
        assert_eq!(decode_text(&encoded).unwrap(), "شكرا");
    }
}

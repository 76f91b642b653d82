use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell};
use tracing::info;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::error::{FileprocError, Result};

/// ASR (§4.3 "Audio"): language pinned to Arabic, the model is loaded lazily
/// on first use, and transcription is single-flight — whisper.cpp's GPU
/// context can't serve two `full()` calls concurrently.
pub struct AsrEngine {
    model_path: String,
    context: OnceCell<Arc<WhisperContext>>,
    single_flight: Mutex<()>,
}

impl AsrEngine {
    pub fn new(model_path: impl Into<String>) -> Self {
        Self {
            model_path: model_path.into(),
            context: OnceCell::new(),
            single_flight: Mutex::new(()),
        }
    }

    async fn get_or_load(&self) -> Result<&Arc<WhisperContext>> {
        self.context
            .get_or_try_init(|| async {
                info!(model = %self.model_path, "loading whisper model");
                let ctx = WhisperContext::new_with_params(&self.model_path, WhisperContextParameters::default())
                    .map_err(|e| FileprocError::Asr(e.to_string()))?;
                Ok(Arc::new(ctx))
            })
            .await
    }

    /// Transcribes 16kHz mono f32 PCM samples, language fixed to Arabic.
    pub async fn transcribe(&self, samples: &[f32]) -> Result<String> {
        let _permit = self.single_flight.lock().await;
        let ctx = self.get_or_load().await?;

        let mut state = ctx.create_state().map_err(|e| FileprocError::Asr(e.to_string()))?;
        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(Some("ar"));
        params.set_print_progress(false);
        params.set_print_special(false);
        params.set_print_realtime(false);

        state.full(params, samples).map_err(|e| FileprocError::Asr(e.to_string()))?;

        let n_segments = state.full_n_segments().map_err(|e| FileprocError::Asr(e.to_string()))?;
        let mut text = String::new();
        for i in 0..n_segments {
            if let Ok(segment) = state.full_get_segment_text(i) {
                text.push_str(&segment);
            }
        }
        Ok(text.trim().to_string())
    }
}

/// Minimal 16-bit PCM WAV reader — enough to feed `AsrEngine::transcribe`
/// without pulling in a general audio-decode dependency the rest of the
/// stack doesn't otherwise need.
pub fn decode_wav_pcm16(bytes: &[u8]) -> Result<(Vec<f32>, u32)> {
    if bytes.len() < 44 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return Err(FileprocError::Asr("not a RIFF/WAVE file".to_string()));
    }

    let mut pos = 12;
    let mut sample_rate = 16_000u32;
    let mut bits_per_sample = 16u16;
    let mut channels = 1u16;
    let mut data: &[u8] = &[];

    while pos + 8 <= bytes.len() {
        let chunk_id = &bytes[pos..pos + 4];
        let chunk_size = u32::from_le_bytes(bytes[pos + 4..pos + 8].try_into().unwrap()) as usize;
        let body_start = pos + 8;
        let body_end = (body_start + chunk_size).min(bytes.len());

        if chunk_id == b"fmt " {
            let fmt = &bytes[body_start..body_end];
            channels = u16::from_le_bytes(fmt[2..4].try_into().unwrap());
            sample_rate = u32::from_le_bytes(fmt[4..8].try_into().unwrap());
            bits_per_sample = u16::from_le_bytes(fmt[14..16].try_into().unwrap());
        } else if chunk_id == b"data" {
            data = &bytes[body_start..body_end];
        }

        pos = body_end + (chunk_size % 2);
    }

    if bits_per_sample != 16 {
        return Err(FileprocError::Asr(format!("unsupported bit depth: {bits_per_sample}")));
    }
    if data.is_empty() {
        return Err(FileprocError::Asr("no data chunk found".to_string()));
    }

    let samples: Vec<f32> = data
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]) as f32 / i16::MAX as f32)
        .collect();

    let mono = if channels > 1 {
        samples
            .chunks_exact(channels as usize)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    } else {
        samples
    };

    Ok((mono, sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_wav(samples: &[i16], sample_rate: u32) -> Vec<u8> {
        let data_bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        let mut out = Vec::new();
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data_bytes.len() as u32).to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes()); // PCM
        out.extend_from_slice(&1u16.to_le_bytes()); // mono
        out.extend_from_slice(&sample_rate.to_le_bytes());
        out.extend_from_slice(&(sample_rate * 2).to_le_bytes());
        out.extend_from_slice(&2u16.to_le_bytes());
        out.extend_from_slice(&16u16.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&(data_bytes.len() as u32).to_le_bytes());
        out.extend_from_slice(&data_bytes);
        out
    }

    #[test]
    fn decodes_mono_pcm16_wav() {
        let wav = make_wav(&[0, i16::MAX, i16::MIN], 16_000);
        let (samples, rate) = decode_wav_pcm16(&wav).unwrap();
        assert_eq!(rate, 16_000);
        assert_eq!(samples.len(), 3);
        assert!((samples[1] - 1.0).abs() < 0.001);
    }

    #[test]
    fn rejects_non_wav_bytes() {
        assert!(decode_wav_pcm16(b"not a wav file at all").is_err());
    }
}

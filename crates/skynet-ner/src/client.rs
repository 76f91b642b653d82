use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, warn};

use skynet_core::config::NerConfig;

use crate::error::{NerError, Result};
use crate::extractor::Extractor;
use crate::types::{NamedEntity, RawEntityResponse};

const SYSTEM_PROMPT: &str = "You extract named entities (Person, Location, Organisation) from Arabic \
or bilingual Arabic/English text. Respond ONLY with JSON: \
{\"entities\": [{\"text\": \"...\", \"label\": \"person|location|organisation\", \"confidence\": 0.0-1.0}]}. \
Preserve the original Arabic surface form in `text` when the source is Arabic.";

/// Arabic-first named-entity recognizer (§2, "NER"). Lazily initialised —
/// the extractor (and whatever model/provider backs it) is only constructed
/// on first use, not at process startup.
pub struct NerClient {
    extractor: OnceCell<Arc<dyn Extractor>>,
    confidence_floor: f64,
}

impl NerClient {
    pub fn new(config: &NerConfig) -> Self {
        Self {
            extractor: OnceCell::new(),
            confidence_floor: config.confidence_floor,
        }
    }

    /// Lazily binds the extractor on first call. Subsequent calls reuse it.
    pub async fn get_or_init(&self, init: impl FnOnce() -> Arc<dyn Extractor>) -> &Arc<dyn Extractor> {
        self.extractor.get_or_init(|| async { init() }).await
    }

    /// Extract entities above the confidence floor. Returns entities in
    /// extraction order; callers use these as NER hints prepended to the
    /// downstream fact-extraction prompt (`[NER hints: ...]`, §4.2 step 4).
    pub async fn extract(&self, extractor: &Arc<dyn Extractor>, text: &str) -> Result<Vec<NamedEntity>> {
        let raw = extractor
            .complete(SYSTEM_PROMPT, text)
            .await
            .map_err(|e| NerError::Extraction(e.to_string()))?;

        let parsed: RawEntityResponse = serde_json::from_str(raw.trim()).map_err(|e| {
            NerError::Malformed(format!("could not parse NER response as JSON: {e}"))
        })?;

        let entities: Vec<NamedEntity> = parsed
            .entities
            .into_iter()
            .filter(|e| {
                if e.confidence < self.confidence_floor {
                    debug!(text = %e.text, confidence = e.confidence, "dropping low-confidence entity");
                    false
                } else {
                    true
                }
            })
            .map(|e| NamedEntity {
                text: e.text,
                label: e.label,
                confidence: e.confidence,
            })
            .collect();

        if entities.is_empty() {
            warn!("NER extraction returned no entities above the confidence floor");
        }

        Ok(entities)
    }

    /// Render entities as the `[NER hints: ...]` prefix prepended to
    /// extraction prompts (§4.2 step 4).
    pub fn render_hints(entities: &[NamedEntity]) -> String {
        if entities.is_empty() {
            return String::new();
        }
        let joined = entities
            .iter()
            .map(|e| format!("{} ({})", e.text, e.label))
            .collect::<Vec<_>>()
            .join(", ");
        format!("[NER hints: {joined}]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntityLabel;
    use async_trait::async_trait;

    struct FakeExtractor(&'static str);

    #[async_trait]
    impl Extractor for FakeExtractor {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn extracts_and_filters_by_confidence_floor() {
        let config = NerConfig { confidence_floor: 0.7 };
        let client = NerClient::new(&config);
        let extractor: Arc<dyn Extractor> = Arc::new(FakeExtractor(
            r#"{"entities": [
                {"text": "محمد", "label": "person", "confidence": 0.9},
                {"text": "maybe-noise", "label": "location", "confidence": 0.4}
            ]}"#,
        ));

        let entities = client.extract(&extractor, "...").await.unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].text, "محمد");
        assert_eq!(entities[0].label, EntityLabel::Person);
    }

    #[tokio::test]
    async fn render_hints_formats_entities() {
        let entities = vec![NamedEntity {
            text: "محمد".to_string(),
            label: EntityLabel::Person,
            confidence: 0.9,
        }];
        assert_eq!(NerClient::render_hints(&entities), "[NER hints: محمد (Person)]");
    }

    #[tokio::test]
    async fn render_hints_empty_when_no_entities() {
        assert_eq!(NerClient::render_hints(&[]), "");
    }

    #[tokio::test]
    async fn malformed_response_errors() {
        let config = NerConfig { confidence_floor: 0.7 };
        let client = NerClient::new(&config);
        let extractor: Arc<dyn Extractor> = Arc::new(FakeExtractor("not json"));
        let err = client.extract(&extractor, "...").await.unwrap_err();
        assert!(matches!(err, NerError::Malformed(_)));
    }
}

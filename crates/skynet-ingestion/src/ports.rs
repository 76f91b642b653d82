use async_trait::async_trait;

use crate::error::Result;

/// The single LLM port this crate needs: a system+user prompt in, raw text
/// out. Used for translation, contextual enrichment, and fact extraction —
/// three different prompts through the same seam. Kept minimal rather than
/// depending on `skynet-agent`'s full provider trait so the agent crate can
/// implement it for its own providers without a dependency cycle (the agent
/// orchestrator drives ingestion; ingestion must not call back into the
/// agent's crate). Mirrors `skynet-ner::Extractor`.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

use async_trait::async_trait;

use crate::error::Result;

/// The single port this crate needs into an LLM. Kept minimal (rather than
/// depending on the agent crate's full provider trait) so `skynet-agent` can
/// implement it for its own providers without creating a dependency cycle
/// (agent calls into NER for post-processing; NER must not call back into
/// agent's crate).
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

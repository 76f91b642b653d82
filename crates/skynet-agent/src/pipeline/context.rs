//! Shared context interface for all channel adapters.
//!
//! `MessageContext` is the single trait that every channel host (gateway,
//! future bridges, etc.) must implement. Defined here, in `skynet-agent`,
//! so the shared pipeline stays channel-agnostic and the tool
//! implementations can reach the domain services without depending on
//! `skynet-gateway` directly.

use skynet_knowledge::KnowledgeService;
use skynet_memory::manager::MemoryManager;

use crate::runtime::AgentRuntime;

/// Minimal context interface required by the shared message pipeline and
/// every built-in tool.
pub trait MessageContext: Send + Sync {
    fn agent(&self) -> &AgentRuntime;
    fn memory(&self) -> &MemoryManager;
    fn knowledge(&self) -> &KnowledgeService;
}

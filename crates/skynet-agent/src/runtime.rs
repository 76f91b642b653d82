use tokio::sync::{mpsc, RwLock};
use tracing::info;

use crate::prompt::{PromptBuilder, SessionInfo};
use crate::provider::{ChatRequest, ChatResponse, LlmProvider, Message, ProviderError, Role};
use crate::stream::StreamEvent;

/// Central agent runtime — holds the LLM provider and prompt builder.
/// Shared across all connections via Arc in AppState.
pub struct AgentRuntime {
    provider: Box<dyn LlmProvider>,
    prompt: RwLock<PromptBuilder>,
    default_model: RwLock<String>,
}

impl AgentRuntime {
    pub fn new(
        provider: Box<dyn LlmProvider>,
        prompt: PromptBuilder,
        default_model: String,
    ) -> Self {
        Self {
            provider,
            prompt: RwLock::new(prompt),
            default_model: RwLock::new(default_model),
        }
    }

    /// Get the current default model name.
    pub async fn get_model(&self) -> String {
        self.default_model.read().await.clone()
    }

    /// Change the default model at runtime. Returns the previous model.
    pub async fn set_model(&self, model: String) -> String {
        let mut guard = self.default_model.write().await;
        std::mem::replace(&mut *guard, model)
    }

    /// Access the LLM provider directly (for tool-loop usage).
    pub fn provider(&self) -> &dyn LlmProvider {
        &*self.provider
    }

    /// Access the prompt builder (async read lock).
    pub async fn prompt(&self) -> tokio::sync::RwLockReadGuard<'_, PromptBuilder> {
        self.prompt.read().await
    }

    /// Reload the prompt's workspace files from disk (`/reload` slash command).
    pub async fn reload_prompt(&self) {
        self.prompt.write().await.reload_workspace();
    }

    /// Process a user message and return the AI response (non-streaming).
    pub async fn chat(&self, user_message: &str) -> Result<ChatResponse, ProviderError> {
        let req = self.build_request(user_message, None, None, None).await;
        info!(model = %req.model, provider = %self.provider.name(), "processing chat request");
        self.provider.send(&req).await
    }

    /// Chat with user context, session info, and optional model override.
    pub async fn chat_with_context(
        &self,
        user_message: &str,
        user_context: Option<&str>,
        session_info: Option<&SessionInfo>,
        model_override: Option<&str>,
    ) -> Result<ChatResponse, ProviderError> {
        let req = self
            .build_request(user_message, user_context, session_info, model_override)
            .await;
        info!(
            model = %req.model, provider = %self.provider.name(),
            cached = req.system_prompt.is_some(), "processing chat request with context"
        );
        self.provider.send(&req).await
    }

    /// Stream a chat response — sends events to the provided channel.
    pub async fn chat_stream(
        &self,
        user_message: &str,
        tx: mpsc::Sender<StreamEvent>,
    ) -> Result<(), ProviderError> {
        let mut req = self.build_request(user_message, None, None, None).await;
        req.stream = true;
        info!(model = %req.model, provider = %self.provider.name(), "processing streaming chat request");
        self.provider.send_stream(&req, tx).await
    }

    /// Stream with user context, session info, and optional model override.
    pub async fn chat_stream_with_context(
        &self,
        user_message: &str,
        user_context: Option<&str>,
        session_info: Option<&SessionInfo>,
        model_override: Option<&str>,
        tx: mpsc::Sender<StreamEvent>,
    ) -> Result<(), ProviderError> {
        let mut req = self
            .build_request(user_message, user_context, session_info, model_override)
            .await;
        req.stream = true;
        info!(
            model = %req.model, provider = %self.provider.name(),
            cached = req.system_prompt.is_some(), "processing streaming chat request with context"
        );
        self.provider.send_stream(&req, tx).await
    }

    // -------------------------------------------------------------------------
    // Private helpers
    // -------------------------------------------------------------------------

    async fn build_request(
        &self,
        user_message: &str,
        user_context: Option<&str>,
        session_info: Option<&SessionInfo>,
        model_override: Option<&str>,
    ) -> ChatRequest {
        let prompt_builder = self.prompt.read().await;
        let system_prompt = prompt_builder.build_prompt(user_context, session_info);
        let plain = system_prompt.to_plain_text();
        let model = match model_override {
            Some(m) => m.to_string(),
            None => self.default_model.read().await.clone(),
        };
        ChatRequest {
            model,
            system: plain,
            system_prompt: Some(system_prompt),
            messages: vec![Message {
                role: Role::User,
                content: user_message.to_string(),
            }],
            max_tokens: 4096,
            stream: false,
            thinking: None,
            tools: Vec::new(),
            raw_messages: None,
        }
    }
}

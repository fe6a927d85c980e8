//! This module provides a simplified synchronous wrapper around the `llm` crate, so that the
//! repair service can be called from the sequential fix loop with a hard time limit.

use llm::LLMProvider;
use llm::builder::{LLMBackend, LLMBuilder};
pub use llm::chat::ChatMessage;
use llm::error::LLMError;
use std::str::FromStr;
use std::time::Duration;
use tokio::runtime::Runtime;

pub use crate::config::{ApiKey, LLMConfig};

/// Errors produced while building or invoking an LLM client.
#[derive(Debug, thiserror::Error)]
pub enum InvokeError {
    #[error("unknown LLM backend {0:?}")]
    UnknownBackend(String),
    #[error("failed to build LLM client: {0}")]
    Build(#[source] LLMError),
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("LLM call did not complete within {0:?}")]
    Timeout(Duration),
    #[error("LLM call failed: {0}")]
    Provider(#[source] LLMError),
    #[error("LLM response contained no text")]
    NoText,
}

/// Wrapper for an LLM client with helper methods.
pub struct RepairLlm {
    client: Box<dyn LLMProvider>,
    runtime: Runtime,
}

impl RepairLlm {
    /// Builds an LLM client from configuration. `timeout` is passed to the HTTP layer as well as
    /// enforced around every call by [`RepairLlm::invoke`].
    pub fn build(
        config: &LLMConfig,
        system_prompt: &str,
        timeout: Duration,
    ) -> Result<Self, InvokeError> {
        let backend = LLMBackend::from_str(&config.backend)
            .map_err(|_| InvokeError::UnknownBackend(config.backend.clone()))?;

        let mut llm_builder = LLMBuilder::new()
            .backend(backend)
            .model(&config.model)
            .max_tokens(config.max_tokens)
            .temperature(0.0)
            .timeout_seconds(timeout.as_secs().max(1))
            .system(system_prompt);

        if let Some(ref address) = config.address
            && !address.is_empty()
        {
            llm_builder = llm_builder.base_url(address);
        }
        if let Some(ref api_key) = config.api_key
            && !api_key.0.is_empty()
        {
            llm_builder = llm_builder.api_key(&api_key.0);
        }

        let client = llm_builder.build().map_err(InvokeError::Build)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_io()
            .enable_time()
            .build()?;
        Ok(Self { client, runtime })
    }

    /// Invokes the LLM and returns the raw response text. Gives up after `timeout`.
    pub fn invoke(
        &self,
        request: &[ChatMessage],
        timeout: Duration,
    ) -> Result<String, InvokeError> {
        // The timer registers with the runtime when created, so it must be built inside it.
        let response = self
            .runtime
            .block_on(async { tokio::time::timeout(timeout, self.client.chat(request)).await })
            .map_err(|_| InvokeError::Timeout(timeout))?
            .map_err(InvokeError::Provider)?;
        response.text().ok_or(InvokeError::NoText)
    }
}

/// Builds a single-message user request from `prompt`.
pub fn build_request(prompt: &str) -> Vec<ChatMessage> {
    vec![ChatMessage::user().content(prompt).build()]
}

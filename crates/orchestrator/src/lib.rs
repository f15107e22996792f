//! Request orchestration for the Escriba assistant: turning user input into
//! multi-part backend requests behind a fixed persona preamble, and mapping
//! backend failures into a single stable condition.

use escriba_config::GeminiProviderConfig;
use thiserror::Error;
use tracing::error;

pub mod attachment;
pub mod conversation;
pub mod gemini;
pub mod transcript;

pub use attachment::{Attachment, AttachmentError, PendingAttachment, PDF_MIME_TYPE};
pub use conversation::{
    build_parts, preamble, ChatTurn, GenerationConfig, Message, Part, Role,
    DEFAULT_DOCUMENT_PROMPT,
};
pub use gemini::{GeminiClient, GeminiError};
pub use transcript::format_reply;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("a message or document is required")]
    EmptyTurn,
    #[error(transparent)]
    Generation(#[from] GeminiError),
}

/// The per-turn orchestration service: preamble + part list in, raw reply
/// text out. Stateless between turns.
#[derive(Debug, Clone)]
pub struct Scribe {
    client: GeminiClient,
    generation: GenerationConfig,
}

impl Scribe {
    pub fn new(config: &GeminiProviderConfig) -> Result<Self, GeminiError> {
        Ok(Self {
            client: GeminiClient::new(config)?,
            generation: GenerationConfig::default(),
        })
    }

    /// Submit one turn. Empty turns are rejected before any network call;
    /// every backend failure is terminal for the turn, with no retries.
    pub async fn respond(&self, turn: ChatTurn) -> Result<String, CompletionError> {
        if !turn.has_content() {
            return Err(CompletionError::EmptyTurn);
        }

        let parts = build_parts(&turn);
        let reply = self
            .client
            .generate(preamble(), parts, &self.generation)
            .await
            .map_err(|err| {
                error!(error = ?err, "generation request failed");
                err
            })?;

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_config() -> GeminiProviderConfig {
        GeminiProviderConfig {
            api_key: Some("test-api-key".to_string()),
            model: "gemini-1.5-flash".to_string(),
            // reserved discard port: any dispatched request fails fast
            base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_seconds: 1,
        }
    }

    #[tokio::test]
    async fn empty_turn_is_rejected_before_any_network_call() {
        let scribe = Scribe::new(&unreachable_config()).unwrap();

        let err = scribe
            .respond(ChatTurn::default())
            .await
            .expect_err("empty turn must be rejected");

        // An EmptyTurn error (rather than a connection failure) shows the
        // boundary check fired before dispatch.
        assert!(matches!(err, CompletionError::EmptyTurn));
    }

    #[tokio::test]
    async fn backend_failure_collapses_to_generation_error() {
        let scribe = Scribe::new(&unreachable_config()).unwrap();

        let err = scribe
            .respond(ChatTurn {
                message: "Hola".to_string(),
                attachment: None,
            })
            .await
            .expect_err("unreachable backend must fail");

        assert!(matches!(
            err,
            CompletionError::Generation(GeminiError::Http(_))
        ));
    }
}

//! Thin reqwest adapter for the generative-language `generateContent` call.

use std::time::Duration;

use escriba_config::GeminiProviderConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::conversation::{GenerationConfig, Message, Part};

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("missing Gemini API key")]
    ApiKeyMissing,
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("api error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("backend returned no reply text")]
    EmptyReply,
}

/// One-shot client for `models/{model}:generateContent`. No retries, no
/// streaming, no cancellation once a request is dispatched.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiProviderConfig) -> Result<Self, GeminiError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or(GeminiError::ApiKeyMissing)?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Send the conversation history plus the new user turn and return the
    /// reply text unmodified.
    pub async fn generate(
        &self,
        history: Vec<Message>,
        parts: Vec<Part>,
        generation: &GenerationConfig,
    ) -> Result<String, GeminiError> {
        let body = request_body(history, parts, generation);
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, self.model
        );

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(GeminiError::Api { status, message });
        }

        let data: GenerateContentResponse = response.json().await?;
        let text = data.reply_text();
        if text.is_empty() {
            return Err(GeminiError::EmptyReply);
        }

        Ok(text)
    }
}

fn request_body(
    history: Vec<Message>,
    parts: Vec<Part>,
    generation: &GenerationConfig,
) -> GenerateContentRequest {
    let mut contents: Vec<WireContent> = history.into_iter().map(WireContent::from).collect();
    contents.push(WireContent {
        role: "user".to_string(),
        parts: parts.into_iter().map(WirePart::from).collect(),
    });

    GenerateContentRequest {
        contents,
        generation_config: generation.clone(),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<WireContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireContent {
    role: String,
    parts: Vec<WirePart>,
}

impl From<Message> for WireContent {
    fn from(message: Message) -> Self {
        Self {
            role: message.role.as_str().to_string(),
            parts: message.parts.into_iter().map(WirePart::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    inline_data: Option<WireInlineData>,
}

impl From<Part> for WirePart {
    fn from(part: Part) -> Self {
        match part {
            Part::Text(text) => Self {
                text: Some(text),
                inline_data: None,
            },
            Part::InlineData { mime_type, data } => Self {
                text: None,
                inline_data: Some(WireInlineData { mime_type, data }),
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireInlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    fn reply_text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<WirePart>,
}

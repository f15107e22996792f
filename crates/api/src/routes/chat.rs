//! The chat turn endpoint. Anonymous per turn: access control lives in the
//! client flow, not here.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::error;

use escriba_orchestrator::{Attachment, ChatTurn, CompletionError};

use crate::AppState;

const EMPTY_TURN_REPLY: &str = "Por favor envía un texto o adjunta un archivo.";
const GENERATION_FAILED_REPLY: &str =
    "Hubo un error al procesar tu solicitud. Si enviaste un archivo, asegúrate de que sea un PDF legible.";

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub file: Option<FilePayload>,
}

#[derive(Debug, Deserialize)]
pub struct FilePayload {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub data: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
}

/// Chat failures keep the `reply` key so the transcript can render them like
/// any other turn.
#[derive(Debug)]
pub struct ChatFailure {
    status: StatusCode,
    reply: &'static str,
}

impl ChatFailure {
    fn bad_request(reply: &'static str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            reply,
        }
    }

    fn internal(reply: &'static str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            reply,
        }
    }
}

impl IntoResponse for ChatFailure {
    fn into_response(self) -> Response {
        let body = Json(ChatReply {
            reply: self.reply.to_string(),
        });
        (self.status, body).into_response()
    }
}

pub async fn chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatReply>, ChatFailure> {
    let turn = ChatTurn {
        message: payload.message.unwrap_or_default(),
        attachment: payload
            .file
            .map(|file| Attachment::from_encoded(&file.name, &file.mime_type, &file.data)),
    };

    // Boundary check: an empty turn never reaches the backend
    if !turn.has_content() {
        return Err(ChatFailure::bad_request(EMPTY_TURN_REPLY));
    }

    match state.scribe().respond(turn).await {
        Ok(reply) => Ok(Json(ChatReply { reply })),
        Err(CompletionError::EmptyTurn) => Err(ChatFailure::bad_request(EMPTY_TURN_REPLY)),
        Err(CompletionError::Generation(err)) => {
            error!(error = ?err, "chat turn failed");
            Err(ChatFailure::internal(GENERATION_FAILED_REPLY))
        }
    }
}

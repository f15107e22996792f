//! Attachment encoding and the single pending-attachment slot.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The only media type the encoder accepts.
pub const PDF_MIME_TYPE: &str = "application/pdf";

#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),
}

/// A transport-encoded document: payload, media type, and original filename.
/// Held transiently from selection until the next send, then discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub data: String,
    pub name: String,
}

impl Attachment {
    /// Encode a raw document for transport. Anything other than a PDF is
    /// rejected before touching any state.
    pub fn pdf_from_bytes(
        name: &str,
        mime_type: &str,
        bytes: &[u8],
    ) -> Result<Self, AttachmentError> {
        if mime_type != PDF_MIME_TYPE {
            return Err(AttachmentError::UnsupportedMediaType(mime_type.to_owned()));
        }

        Ok(Self {
            mime_type: mime_type.to_owned(),
            data: STANDARD.encode(bytes),
            name: name.to_owned(),
        })
    }

    /// Wrap an already-encoded payload, keeping only the payload portion of
    /// a `data:<media type>;base64,` style string.
    pub fn from_encoded(name: &str, mime_type: &str, data: &str) -> Self {
        Self {
            mime_type: mime_type.to_owned(),
            data: strip_data_url_prefix(data).to_owned(),
            name: name.to_owned(),
        }
    }
}

fn strip_data_url_prefix(data: &str) -> &str {
    if data.starts_with("data:") {
        match data.split_once(',') {
            Some((_, payload)) => payload,
            None => data,
        }
    } else {
        data
    }
}

/// The one attachment that may be pending between "file chosen" and "turn
/// sent". Selecting a new file replaces it; sending takes it whether or not
/// the send succeeds.
#[derive(Debug, Default)]
pub struct PendingAttachment(Option<Attachment>);

impl PendingAttachment {
    pub fn select(&mut self, attachment: Attachment) {
        self.0 = Some(attachment);
    }

    pub fn take(&mut self) -> Option<Attachment> {
        self.0.take()
    }

    pub fn current(&self) -> Option<&Attachment> {
        self.0.as_ref()
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }
}

//! Conversation assembly: the fixed persona preamble, the per-turn content
//! parts, and the generation settings sent with every request.

use serde::Serialize;

use crate::attachment::Attachment;

/// Persona instruction, authored as if from the user role. Re-sent on every
/// call; the backend holds no conversation state between turns.
pub const SYSTEM_INSTRUCTION: &str = r#"
Eres "El Escriba", un asistente de redacción académica experto en Historia de México y análisis de textos.
Tu objetivo es ayudar a estudiantes a mejorar sus redacciones, ortografía y comprensión lectora.

Tus capacidades:
- Si recibes un archivo PDF, analízalo a fondo y responde lo que pida el usuario (resumen, ideas principales, etc.).
- Si recibes solo texto, corrige gramática o mejora la coherencia según se pida.
- Mantén un tono formal, educativo y alentador.
"#;

/// Canned acknowledgement, authored as if from the model role.
pub const ACKNOWLEDGEMENT: &str =
    "Entendido. Soy El Escriba, listo para analizar textos y documentos.";

/// Instruction appended when a document arrives without any message text.
pub const DEFAULT_DOCUMENT_PROMPT: &str =
    "Analiza este documento y genera un resumen con las ideas principales.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

/// One content part of a user turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    /// Transport-encoded binary payload with its media type.
    InlineData { mime_type: String, data: String },
    Text(String),
}

/// One entry of conversation history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub parts: Vec<Part>,
}

/// The fixed two-entry exchange prepended to every backend call.
pub fn preamble() -> Vec<Message> {
    vec![
        Message {
            role: Role::User,
            parts: vec![Part::Text(SYSTEM_INSTRUCTION.to_string())],
        },
        Message {
            role: Role::Model,
            parts: vec![Part::Text(ACKNOWLEDGEMENT.to_string())],
        },
    ]
}

/// One user submission: text and/or a single encoded document.
#[derive(Debug, Clone, Default)]
pub struct ChatTurn {
    pub message: String,
    pub attachment: Option<Attachment>,
}

impl ChatTurn {
    /// A turn with neither text nor a document is never dispatched.
    pub fn has_content(&self) -> bool {
        !self.message.is_empty() || self.attachment.is_some()
    }
}

/// Build the ordered part list for a turn: the document first, then the
/// default instruction when the document arrived without text, then the
/// exact message.
pub fn build_parts(turn: &ChatTurn) -> Vec<Part> {
    let mut parts = Vec::new();

    if let Some(attachment) = &turn.attachment {
        parts.push(Part::InlineData {
            mime_type: attachment.mime_type.clone(),
            data: attachment.data.clone(),
        });

        if turn.message.is_empty() {
            parts.push(Part::Text(DEFAULT_DOCUMENT_PROMPT.to_string()));
        }
    }

    if !turn.message.is_empty() {
        parts.push(Part::Text(turn.message.clone()));
    }

    parts
}

/// Deterministic-leaning sampling settings, biased towards consistent
/// academic phrasing over creative variation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub top_k: i32,
    pub top_p: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            top_k: 1,
            top_p: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf_attachment() -> Attachment {
        Attachment::pdf_from_bytes("apuntes.pdf", "application/pdf", b"%PDF-1.4 contenido")
            .expect("valid pdf attachment")
    }

    #[test]
    fn text_only_turn_produces_exactly_one_text_part() {
        let turn = ChatTurn {
            message: "Hola".to_string(),
            attachment: None,
        };

        let parts = build_parts(&turn);
        assert_eq!(parts, vec![Part::Text("Hola".to_string())]);
    }

    #[test]
    fn attachment_without_message_appends_default_instruction() {
        let attachment = pdf_attachment();
        let turn = ChatTurn {
            message: String::new(),
            attachment: Some(attachment.clone()),
        };

        let parts = build_parts(&turn);
        assert_eq!(parts.len(), 2);
        assert_eq!(
            parts[0],
            Part::InlineData {
                mime_type: attachment.mime_type.clone(),
                data: attachment.data.clone(),
            }
        );
        assert_eq!(parts[1], Part::Text(DEFAULT_DOCUMENT_PROMPT.to_string()));
    }

    #[test]
    fn attachment_with_message_skips_default_instruction() {
        let turn = ChatTurn {
            message: "Resume el capítulo dos".to_string(),
            attachment: Some(pdf_attachment()),
        };

        let parts = build_parts(&turn);
        assert_eq!(parts.len(), 2);
        assert!(matches!(parts[0], Part::InlineData { .. }));
        assert_eq!(parts[1], Part::Text("Resume el capítulo dos".to_string()));
    }

    #[test]
    fn empty_turn_produces_no_parts_and_reports_no_content() {
        let turn = ChatTurn::default();
        assert!(!turn.has_content());
        assert!(build_parts(&turn).is_empty());
    }

    #[test]
    fn preamble_is_the_fixed_two_entry_exchange() {
        let history = preamble();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[1].role, Role::Model);
        assert_eq!(
            history[1].parts,
            vec![Part::Text(ACKNOWLEDGEMENT.to_string())]
        );
    }

    #[test]
    fn generation_config_serializes_camel_case_sampling_knobs() {
        let value = serde_json::to_value(GenerationConfig::default()).unwrap();
        assert_eq!(value["temperature"], serde_json::json!(0.3));
        assert_eq!(value["topK"], serde_json::json!(1));
        assert_eq!(value["topP"], serde_json::json!(1.0));
    }
}

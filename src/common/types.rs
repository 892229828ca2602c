use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier assigned by the backend. Passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(id) => write!(f, "{id}"),
            RecordId::Text(id) => f.write_str(id),
        }
    }
}

/// Distress signal emitted by a monitored user.
///
/// Every field is optional on decode: the backend owns the shape and the
/// dashboard renders whatever arrives.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SosEvent {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl SosEvent {
    /// Both coordinates, when the backend sent them.
    pub fn location(&self) -> Option<(f64, f64)> {
        Some((self.lat?, self.lon?))
    }
}

/// Message stored by the backend. A `recipient_id` of `None` is a broadcast.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub sender_id: Option<String>,
    #[serde(default)]
    pub recipient_id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Message {
    pub fn is_broadcast(&self) -> bool {
        self.recipient_id.is_none()
    }
}

/// Body of `POST /send_message`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub sender_id: String,
    pub recipient_id: Option<String>,
    pub msg_type: String,
    pub text: String,
}

impl OutgoingMessage {
    pub fn text(sender_id: &str, recipient_input: &str, text: &str) -> Self {
        Self {
            sender_id: sender_id.to_string(),
            recipient_id: normalize_recipient(recipient_input),
            msg_type: "text".to_string(),
            text: text.to_string(),
        }
    }
}

/// Body of `POST /send_sos`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SosReport {
    pub user_id: String,
    pub lat: f64,
    pub lon: f64,
    pub note: String,
}

/// Audio file submitted through `POST /send_voice/`.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceUpload {
    pub sender_id: String,
    pub recipient_id: Option<String>,
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Opaque response body of a write, shown to the caregiver as-is.
pub type ServerReply = serde_json::Value;

/// Turns the free-form recipient field into the wire value.
///
/// Blank input means broadcast and is sent as `null`, never `""`.
pub fn normalize_recipient(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

use super::types::{Message, ServerReply, SosEvent};
use crate::network::ApiError;

/// Which write produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionKind {
    TextMessage,
    Voice,
    Sos,
}

impl SubmissionKind {
    pub fn label(self) -> &'static str {
        match self {
            SubmissionKind::TextMessage => "Text message",
            SubmissionKind::Voice => "Voice message",
            SubmissionKind::Sos => "SOS",
        }
    }
}

/// Results the backend worker reports back to the UI.
#[derive(Debug, Clone)]
pub enum BackendEvent {
    SosLoaded(Result<Vec<SosEvent>, ApiError>),
    MessagesLoaded(Result<Vec<Message>, ApiError>),
    MediaFetched {
        media_url: String,
        result: Result<Vec<u8>, ApiError>,
    },
    Submitted {
        kind: SubmissionKind,
        result: Result<ServerReply, ApiError>,
    },
}

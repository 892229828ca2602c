use super::types::{OutgoingMessage, SosReport, VoiceUpload};
use crate::network::BackendConfig;

/// Commands the UI hands to the backend worker.
#[derive(Debug, Clone)]
pub enum BackendCommand {
    /// Re-fetch both the SOS list and the message list.
    RefreshDashboard,
    /// Download the media behind a message's `media_url` for playback.
    FetchMedia { media_url: String },
    SendMessage(OutgoingMessage),
    SendVoice(VoiceUpload),
    SendSos(SosReport),
    /// Swap the backend the following requests go to.
    Reconfigure(BackendConfig),
}

impl BackendCommand {
    /// Short label used in logs and the activity panel.
    pub fn label(&self) -> &'static str {
        match self {
            BackendCommand::RefreshDashboard => "refresh",
            BackendCommand::FetchMedia { .. } => "fetch media",
            BackendCommand::SendMessage(_) => "send message",
            BackendCommand::SendVoice(_) => "send voice",
            BackendCommand::SendSos(_) => "send SOS",
            BackendCommand::Reconfigure(_) => "reconfigure",
        }
    }
}

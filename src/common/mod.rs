pub mod commands;
pub mod events;
pub mod types;

pub use commands::BackendCommand;
pub use events::{BackendEvent, SubmissionKind};
pub use types::{
    Message, OutgoingMessage, RecordId, ServerReply, SosEvent, SosReport, VoiceUpload,
    normalize_recipient,
};

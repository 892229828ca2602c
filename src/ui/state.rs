use std::path::Path;

use chrono::{DateTime, Utc};

use crate::common::{
    BackendEvent, Message, OutgoingMessage, SosEvent, SosReport, SubmissionKind, VoiceUpload,
    normalize_recipient,
};
use crate::config::AppConfig;
use crate::network::{ApiResult, BackendConfig, load_voice_file};

use super::map::MapView;

/// How many messages the dashboard lists, in server order.
pub const MESSAGE_DISPLAY_LIMIT: usize = 50;
const MAX_ACTIVITY_ENTRIES: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    SendMessage,
    SimulateWatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityLevel {
    Info,
    Warning,
    Error,
}

/// One line of the activity panel.
#[derive(Debug, Clone)]
pub struct ActivityEntry {
    pub timestamp: DateTime<Utc>,
    pub level: ActivityLevel,
    pub message: String,
}

/// What the last write returned, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplyView {
    pub kind: SubmissionKind,
    /// Pretty-printed response body, or the error text.
    pub body: Result<String, String>,
}

/// A point to draw on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub lat: f64,
    pub lon: f64,
    pub label: String,
}

/// Local UI state.
pub struct AppState {
    pub page: Page,
    pub settings: AppConfig,
    pub config_path: String,
    pub backend_url_input: String,

    pub sos: Vec<SosEvent>,
    pub messages: Vec<Message>,
    pub sos_warning: Option<String>,
    pub messages_warning: Option<String>,
    /// Refreshes queued but not yet answered by `MessagesLoaded`.
    pub pending_refreshes: usize,
    pub loaded_once: bool,
    /// Set once the command channel is closed; nothing more can be queued.
    pub worker_stopped: bool,
    pub last_refreshed: Option<DateTime<Utc>>,
    pub resolve_notice: Option<String>,
    pub media_error: Option<String>,
    pub map_view: MapView,

    pub sender_input: String,
    pub recipient_input: String,
    pub text_input: String,
    pub voice_path_input: String,
    pub watch_user_input: String,
    pub last_reply: Option<ReplyView>,

    pub activity: Vec<ActivityEntry>,
}

impl AppState {
    pub fn new(settings: AppConfig, config_path: String) -> Self {
        Self {
            page: Page::Dashboard,
            backend_url_input: settings.backend_url.clone(),
            sender_input: settings.default_sender_id.clone(),
            watch_user_input: settings.default_user_id.clone(),
            settings,
            config_path,
            sos: Vec::new(),
            messages: Vec::new(),
            sos_warning: None,
            messages_warning: None,
            pending_refreshes: 0,
            loaded_once: false,
            worker_stopped: false,
            last_refreshed: None,
            resolve_notice: None,
            media_error: None,
            map_view: MapView::default(),
            recipient_input: String::new(),
            text_input: String::new(),
            voice_path_input: String::new(),
            last_reply: None,
            activity: Vec::new(),
        }
    }

    /// Folds a worker result into state. Returns media bytes that should be
    /// played, if any.
    pub fn apply_event(&mut self, event: BackendEvent) -> Option<(String, Vec<u8>)> {
        match event {
            BackendEvent::SosLoaded(result) => {
                self.loaded_once = true;
                match result {
                    Ok(sos) => {
                        self.sos_warning = None;
                        self.sos = sos;
                    }
                    Err(err) => {
                        let warning = format!("Failed to fetch SOS: {err}");
                        self.record(ActivityLevel::Warning, warning.clone());
                        self.sos_warning = Some(warning);
                        self.sos = Vec::new();
                    }
                }
                None
            }
            BackendEvent::MessagesLoaded(result) => {
                self.pending_refreshes = self.pending_refreshes.saturating_sub(1);
                self.last_refreshed = Some(Utc::now());
                match result {
                    Ok(messages) => {
                        self.messages_warning = None;
                        self.messages = messages;
                    }
                    Err(err) => {
                        let warning = format!("Failed to fetch messages: {err}");
                        self.record(ActivityLevel::Warning, warning.clone());
                        self.messages_warning = Some(warning);
                        self.messages = Vec::new();
                    }
                }
                None
            }
            BackendEvent::MediaFetched { media_url, result } => match result {
                Ok(bytes) => {
                    self.media_error = None;
                    self.record(
                        ActivityLevel::Info,
                        format!("Fetched {media_url} ({} bytes)", bytes.len()),
                    );
                    Some((media_url, bytes))
                }
                Err(err) => {
                    let message = format!("Failed to fetch media: {err}");
                    self.record(ActivityLevel::Error, message.clone());
                    self.media_error = Some(message);
                    None
                }
            },
            BackendEvent::Submitted { kind, result } => {
                let body = match result {
                    Ok(reply) => {
                        self.record(ActivityLevel::Info, format!("{} sent", kind.label()));
                        Ok(serde_json::to_string_pretty(&reply).unwrap_or_else(|_| reply.to_string()))
                    }
                    Err(err) => {
                        self.record(
                            ActivityLevel::Error,
                            format!("{} failed: {err}", kind.label()),
                        );
                        Err(err.to_string())
                    }
                };
                self.last_reply = Some(ReplyView { kind, body });
                None
            }
        }
    }

    pub fn begin_refresh(&mut self) {
        self.pending_refreshes += 1;
    }

    pub fn is_refreshing(&self) -> bool {
        self.pending_refreshes > 0
    }

    /// The startup load is queued until one lands or the worker is gone.
    pub fn needs_initial_load(&self) -> bool {
        !self.loaded_once && !self.is_refreshing() && !self.worker_stopped
    }

    /// First entries of the message list, never re-ordered.
    pub fn visible_messages(&self) -> &[Message] {
        &self.messages[..self.messages.len().min(MESSAGE_DISPLAY_LIMIT)]
    }

    pub fn map_markers(&self) -> Vec<MapMarker> {
        map_markers(&self.sos)
    }

    /// The backend has no resolve endpoint, so this only tells the caregiver.
    pub fn request_resolve(&mut self, event: &SosEvent) {
        let id = event
            .id
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "?".to_string());
        let notice = format!(
            "SOS {id} cannot be resolved from here: the backend has no resolve endpoint. Delete it on the backend."
        );
        self.record(ActivityLevel::Warning, notice.clone());
        self.resolve_notice = Some(notice);
    }

    /// Applies the edited URL to the session settings.
    pub fn commit_backend_url(&mut self) -> BackendConfig {
        self.settings.backend_url = self.backend_url_input.trim().to_string();
        self.record(
            ActivityLevel::Info,
            format!("Backend set to {}", self.settings.backend_url),
        );
        BackendConfig::from(&self.settings)
    }

    pub fn outgoing_text(&self) -> OutgoingMessage {
        OutgoingMessage::text(&self.sender_input, &self.recipient_input, &self.text_input)
    }

    pub fn voice_upload(&self) -> ApiResult<VoiceUpload> {
        load_voice_file(
            Path::new(self.voice_path_input.trim()),
            &self.sender_input,
            normalize_recipient(&self.recipient_input),
        )
    }

    pub fn simulated_sos(&self) -> SosReport {
        SosReport {
            user_id: self.watch_user_input.clone(),
            lat: self.settings.simulated_lat,
            lon: self.settings.simulated_lon,
            note: self.settings.simulated_note.clone(),
        }
    }

    pub fn record(&mut self, level: ActivityLevel, message: String) {
        self.activity.push(ActivityEntry {
            timestamp: Utc::now(),
            level,
            message,
        });

        if self.activity.len() > MAX_ACTIVITY_ENTRIES {
            self.activity.remove(0);
        }
    }
}

/// Markers for every event that carries both coordinates.
pub fn map_markers(events: &[SosEvent]) -> Vec<MapMarker> {
    events
        .iter()
        .filter_map(|event| {
            let (lat, lon) = event.location()?;
            Some(MapMarker {
                lat,
                lon,
                label: format!("{}: {}", display(&event.user_id), display(&event.note)),
            })
        })
        .collect()
}

/// Renders an optional backend field the way it arrived.
pub fn display(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("None")
}

pub fn sos_headline(event: &SosEvent) -> String {
    format!(
        "{} - {} - {}",
        display(&event.user_id),
        display(&event.note),
        display(&event.created_at)
    )
}

pub fn sos_location(event: &SosEvent) -> String {
    let coord = |value: Option<f64>| value.map_or_else(|| "None".to_string(), |v| v.to_string());
    format!("Location: {}, {}", coord(event.lat), coord(event.lon))
}

pub fn message_headline(message: &Message) -> String {
    let recipient = if message.is_broadcast() {
        "broadcast"
    } else {
        display(&message.recipient_id)
    };
    format!(
        "{} - From: {} -> {}",
        display(&message.created_at),
        display(&message.sender_id),
        recipient
    )
}

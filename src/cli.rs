use std::path::PathBuf;

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::common::{OutgoingMessage, SosReport, normalize_recipient};
use crate::config::{self, AppConfig};
use crate::network::{ApiError, BackendClient, load_voice_file};
use crate::ui::state::MESSAGE_DISPLAY_LIMIT;

#[derive(Parser)]
#[command(
    name = "wristbridge-caregiver",
    version,
    about = "WristBridge caregiver panel"
)]
pub struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    pub config: String,
    /// Backend base URL, overrides the config file
    #[arg(long, env = "WRISTBRIDGE_BACKEND", value_name = "URL")]
    pub backend: Option<String>,
    /// Run one request and print the result instead of opening the window
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print the SOS list as JSON
    Sos,
    /// Print recent messages as JSON
    Messages {
        #[arg(long, default_value_t = MESSAGE_DISPLAY_LIMIT)]
        limit: usize,
    },
    /// Send a text message (blank recipient = broadcast)
    SendMessage {
        #[arg(long)]
        sender: String,
        #[arg(long, default_value = "")]
        recipient: String,
        #[arg(long)]
        text: String,
    },
    /// Upload a .wav/.mp3 voice message
    SendVoice {
        #[arg(long)]
        sender: String,
        #[arg(long, default_value = "")]
        recipient: String,
        #[arg(long, value_name = "PATH")]
        file: PathBuf,
    },
    /// Report an SOS as a watch would
    SendSos {
        #[arg(long)]
        user: String,
        #[arg(long, allow_negative_numbers = true)]
        lat: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        lon: Option<f64>,
        #[arg(long)]
        note: Option<String>,
    },
    /// Download the media behind a message's media_url
    FetchMedia {
        #[arg(long)]
        url: String,
        #[arg(long, value_name = "PATH")]
        out: PathBuf,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("cannot write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
    #[error("cannot encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Runs one command and returns what should be printed.
pub async fn run_command(
    command: Command,
    client: &BackendClient,
    settings: &AppConfig,
) -> Result<String, CliError> {
    match command {
        Command::Sos => {
            let sos = client.fetch_sos_list().await?;
            Ok(serde_json::to_string_pretty(&sos)?)
        }
        Command::Messages { limit } => {
            let messages = client.fetch_messages().await?;
            let shown = &messages[..messages.len().min(limit)];
            Ok(serde_json::to_string_pretty(shown)?)
        }
        Command::SendMessage {
            sender,
            recipient,
            text,
        } => {
            let message = OutgoingMessage::text(&sender, &recipient, &text);
            let reply = client.send_message(&message).await?;
            Ok(serde_json::to_string_pretty(&reply)?)
        }
        Command::SendVoice {
            sender,
            recipient,
            file,
        } => {
            let upload = load_voice_file(&file, &sender, normalize_recipient(&recipient))?;
            let reply = client.send_voice(&upload).await?;
            Ok(serde_json::to_string_pretty(&reply)?)
        }
        Command::SendSos {
            user,
            lat,
            lon,
            note,
        } => {
            let report = SosReport {
                user_id: user,
                lat: lat.unwrap_or(settings.simulated_lat),
                lon: lon.unwrap_or(settings.simulated_lon),
                note: note.unwrap_or_else(|| settings.simulated_note.clone()),
            };
            let reply = client.send_sos(&report).await?;
            Ok(serde_json::to_string_pretty(&reply)?)
        }
        Command::FetchMedia { url, out } => {
            let bytes = client.fetch_media(&url).await?;
            std::fs::write(&out, &bytes).map_err(|source| CliError::Write {
                path: out.display().to_string(),
                source,
            })?;
            Ok(format!("Wrote {} bytes to {}", bytes.len(), out.display()))
        }
    }
}

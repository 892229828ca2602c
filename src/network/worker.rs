use tokio::sync::mpsc;

use crate::common::{BackendCommand, BackendEvent, ServerReply, SubmissionKind};

use super::client::BackendClient;
use super::error::ApiResult;

/// Runs UI commands against the backend one at a time.
pub struct BackendWorker {
    client: BackendClient,
    event_sender: mpsc::Sender<BackendEvent>,
    command_receiver: mpsc::Receiver<BackendCommand>,
}

impl BackendWorker {
    pub fn new(
        client: BackendClient,
        event_sender: mpsc::Sender<BackendEvent>,
        command_receiver: mpsc::Receiver<BackendCommand>,
    ) -> Self {
        Self {
            client,
            event_sender,
            command_receiver,
        }
    }

    /// Loops until the UI drops its command sender or stops listening.
    pub async fn run(mut self) {
        log::info!(
            "Backend worker started against {}",
            self.client.config().base_url
        );

        while let Some(command) = self.command_receiver.recv().await {
            log::debug!("Handling {} command", command.label());
            if !self.handle_command(command).await {
                log::warn!("UI event channel closed; stopping backend worker");
                break;
            }
        }

        log::info!("Backend worker stopped");
    }

    /// Returns `false` once the UI can no longer receive events.
    async fn handle_command(&mut self, command: BackendCommand) -> bool {
        match command {
            BackendCommand::RefreshDashboard => {
                let sos = self.client.fetch_sos_list().await;
                if let Err(err) = &sos {
                    log::warn!("Failed to fetch SOS: {err}");
                }
                if !self.emit(BackendEvent::SosLoaded(sos)).await {
                    return false;
                }

                let messages = self.client.fetch_messages().await;
                if let Err(err) = &messages {
                    log::warn!("Failed to fetch messages: {err}");
                }
                self.emit(BackendEvent::MessagesLoaded(messages)).await
            }
            BackendCommand::FetchMedia { media_url } => {
                let result = self.client.fetch_media(&media_url).await;
                if let Err(err) = &result {
                    log::error!("Failed to fetch media {media_url}: {err}");
                }
                self.emit(BackendEvent::MediaFetched { media_url, result })
                    .await
            }
            BackendCommand::SendMessage(message) => {
                let result = self.client.send_message(&message).await;
                self.submitted(SubmissionKind::TextMessage, result).await
            }
            BackendCommand::SendVoice(upload) => {
                let result = self.client.send_voice(&upload).await;
                self.submitted(SubmissionKind::Voice, result).await
            }
            BackendCommand::SendSos(report) => {
                let result = self.client.send_sos(&report).await;
                self.submitted(SubmissionKind::Sos, result).await
            }
            BackendCommand::Reconfigure(config) => {
                log::info!("Backend URL set to {}", config.base_url);
                self.client.set_config(config);
                true
            }
        }
    }

    async fn submitted(&self, kind: SubmissionKind, result: ApiResult<ServerReply>) -> bool {
        match &result {
            Ok(_) => log::info!("{} submitted", kind.label()),
            Err(err) => log::error!("{} failed: {err}", kind.label()),
        }
        self.emit(BackendEvent::Submitted { kind, result }).await
    }

    async fn emit(&self, event: BackendEvent) -> bool {
        self.event_sender.send(event).await.is_ok()
    }
}

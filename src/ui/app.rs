use std::time::Duration;

use eframe::egui;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::audio;
use crate::common::{BackendCommand, BackendEvent};
use crate::config::{self, AppConfig};

use super::components::{
    activity_panel, compose, map_view, message_list,
    sidebar::{self, SidebarActions},
    sos_list, watch_panel,
};
use super::state::{ActivityLevel, AppState, Page};

pub struct CaregiverApp {
    state: AppState,
    command_sender: mpsc::Sender<BackendCommand>,
    event_receiver: mpsc::Receiver<BackendEvent>,
}

impl CaregiverApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        settings: AppConfig,
        config_path: String,
        command_sender: mpsc::Sender<BackendCommand>,
        event_receiver: mpsc::Receiver<BackendEvent>,
    ) -> Self {
        Self {
            state: AppState::new(settings, config_path),
            command_sender,
            event_receiver,
        }
    }

    fn handle_backend_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            if let Some((media_url, bytes)) = self.state.apply_event(event) {
                audio::play_in_background(media_url, bytes);
            }
        }
    }

    fn send_command(&mut self, command: BackendCommand) -> bool {
        let label = command.label();
        match self.command_sender.try_send(command) {
            Ok(()) => true,
            Err(err) => {
                if matches!(err, TrySendError::Closed(_)) {
                    self.state.worker_stopped = true;
                }
                log::warn!("Failed to queue {label} command: {err}");
                self.state
                    .record(ActivityLevel::Error, format!("Could not queue {label}: {err}"));
                false
            }
        }
    }

    fn refresh(&mut self) {
        if self.send_command(BackendCommand::RefreshDashboard) {
            self.state.begin_refresh();
        }
    }

    fn handle_sidebar(&mut self, actions: SidebarActions) {
        if actions.apply_backend {
            let backend = self.state.commit_backend_url();
            self.send_command(BackendCommand::Reconfigure(backend));
            self.refresh();
        }
        if actions.save_settings {
            if let Err(err) = config::save_config(&self.state.config_path, &self.state.settings) {
                log::error!("{err}");
                self.state.record(ActivityLevel::Error, err.to_string());
            } else {
                let path = self.state.config_path.clone();
                self.state
                    .record(ActivityLevel::Info, format!("Settings saved to {path}"));
            }
        }
    }

    fn take_dropped_voice_file(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if let Some(path) = dropped.into_iter().find_map(|file| file.path) {
            self.state.voice_path_input = path.display().to_string();
            self.state.page = Page::SendMessage;
        }
    }

    fn dashboard(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Recent SOS");
            let label = if self.state.is_refreshing() {
                "Refreshing..."
            } else {
                "Refresh"
            };
            if ui
                .add_enabled(!self.state.is_refreshing(), egui::Button::new(label))
                .clicked()
            {
                self.refresh();
            }
        });

        if let Some(warning) = &self.state.sos_warning {
            ui.colored_label(egui::Color32::YELLOW, warning);
        }
        if let Some(notice) = &self.state.resolve_notice {
            ui.colored_label(egui::Color32::YELLOW, notice);
        }

        let markers = self.state.map_markers();
        let mut resolve = None;
        ui.columns(2, |columns| {
            resolve = sos_list::render(&mut columns[0], &self.state.sos);

            columns[1].heading("Map view");
            map_view::render(&mut columns[1], &mut self.state.map_view, &markers);
        });
        if let Some(event) = resolve {
            self.state.request_resolve(&event);
        }

        ui.separator();
        ui.heading("Recent Messages");
        if let Some(warning) = &self.state.messages_warning {
            ui.colored_label(egui::Color32::YELLOW, warning);
        }
        if let Some(err) = &self.state.media_error {
            ui.colored_label(egui::Color32::RED, err);
        }
        if let Some(media_url) = message_list::render(ui, self.state.visible_messages()) {
            self.send_command(BackendCommand::FetchMedia { media_url });
        }
    }

    fn send_message_page(&mut self, ui: &mut egui::Ui) {
        let actions = compose::render(ui, &mut self.state);

        if actions.send_text {
            let message = self.state.outgoing_text();
            self.send_command(BackendCommand::SendMessage(message));
        }

        if actions.send_voice {
            match self.state.voice_upload() {
                Ok(upload) => {
                    self.send_command(BackendCommand::SendVoice(upload));
                }
                Err(err) => {
                    log::warn!("{err}");
                    self.state.record(ActivityLevel::Error, err.to_string());
                }
            }
        }
    }

    fn simulate_watch_page(&mut self, ui: &mut egui::Ui) {
        if watch_panel::render(ui, &mut self.state) {
            let report = self.state.simulated_sos();
            self.send_command(BackendCommand::SendSos(report));
        }
    }
}

impl eframe::App for CaregiverApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_backend_events();
        self.take_dropped_voice_file(ctx);

        if self.state.needs_initial_load() {
            self.refresh();
        }

        egui::SidePanel::left("settings_sidebar")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                let actions = sidebar::render(ui, &mut self.state);
                self.handle_sidebar(actions);
            });

        egui::SidePanel::right("activity_panel")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| {
                activity_panel::render(ui, &self.state);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("WristBridge - Caregiver Panel");
            ui.separator();
            egui::ScrollArea::vertical()
                .id_salt("page")
                .show(ui, |ui| match self.state.page {
                    Page::Dashboard => self.dashboard(ui),
                    Page::SendMessage => self.send_message_page(ui),
                    Page::SimulateWatch => self.simulate_watch_page(ui),
                });
        });

        ctx.request_repaint_after(Duration::from_millis(250));
    }
}

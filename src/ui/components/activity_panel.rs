use eframe::egui;

use crate::ui::state::{ActivityLevel, AppState};

pub fn render(ui: &mut egui::Ui, state: &AppState) {
    if let Some(reply) = &state.last_reply {
        ui.heading(format!("{} response", reply.kind.label()));
        match &reply.body {
            Ok(body) => {
                egui::ScrollArea::vertical()
                    .id_salt("last_reply")
                    .max_height(200.0)
                    .show(ui, |ui| {
                        ui.monospace(body);
                    });
            }
            Err(err) => {
                ui.colored_label(egui::Color32::RED, err);
            }
        }
        ui.separator();
    }

    ui.heading("Activity");
    egui::ScrollArea::vertical()
        .id_salt("activity")
        .show(ui, |ui| {
            for entry in state.activity.iter().rev().take(20) {
                let color = match entry.level {
                    ActivityLevel::Info => ui.visuals().text_color(),
                    ActivityLevel::Warning => egui::Color32::YELLOW,
                    ActivityLevel::Error => egui::Color32::RED,
                };

                ui.horizontal_wrapped(|ui| {
                    ui.colored_label(color, format!("[{}]", entry.timestamp.format("%H:%M:%S")));
                    ui.label(&entry.message);
                });
            }
        });
}

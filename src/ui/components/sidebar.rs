use eframe::egui;

use crate::ui::state::{AppState, Page};

#[derive(Default)]
pub struct SidebarActions {
    pub apply_backend: bool,
    pub save_settings: bool,
}

pub fn render(ui: &mut egui::Ui, state: &mut AppState) -> SidebarActions {
    let mut actions = SidebarActions::default();

    ui.heading("WristBridge");
    ui.separator();

    ui.label("Backend URL:");
    let response = ui.text_edit_singleline(&mut state.backend_url_input);
    if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
        actions.apply_backend = true;
    }
    ui.horizontal(|ui| {
        if ui.button("Apply").clicked() {
            actions.apply_backend = true;
        }
        if ui.button("Save settings").clicked() {
            actions.save_settings = true;
        }
    });
    if state.backend_url_input.trim() != state.settings.backend_url {
        ui.label(egui::RichText::new("(not applied)").weak());
    }

    ui.separator();
    ui.label("Page");
    ui.radio_value(&mut state.page, Page::Dashboard, "Dashboard");
    ui.radio_value(&mut state.page, Page::SendMessage, "Send Message");
    ui.radio_value(&mut state.page, Page::SimulateWatch, "Simulate Watch");

    if let Some(refreshed) = state.last_refreshed {
        ui.separator();
        ui.label(
            egui::RichText::new(format!("Refreshed at {}", refreshed.format("%H:%M:%S"))).weak(),
        );
    }

    actions
}

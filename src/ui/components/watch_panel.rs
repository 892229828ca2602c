use eframe::egui;

use crate::ui::state::AppState;

/// Quick actions of the simulated watch. Returns `true` when SOS was pressed.
pub fn render(ui: &mut egui::Ui, state: &mut AppState) -> bool {
    ui.heading("Simulated Watch UI (quick actions)");
    ui.horizontal(|ui| {
        ui.label("User id");
        ui.text_edit_singleline(&mut state.watch_user_input);
    });

    let sos_button = egui::Button::new(
        egui::RichText::new("Send SOS (simulate)").color(egui::Color32::WHITE),
    )
    .fill(egui::Color32::from_rgb(180, 30, 30));
    let pressed = ui.add(sos_button).clicked();

    ui.label(
        egui::RichText::new(format!(
            "Reports {}, {} with note \"{}\"",
            state.settings.simulated_lat,
            state.settings.simulated_lon,
            state.settings.simulated_note
        ))
        .weak(),
    );
    ui.label("Use the Send Message page to post a message or voice from the simulated watch.");

    pressed
}

use eframe::egui;

use crate::ui::state::AppState;

#[derive(Default)]
pub struct ComposeActions {
    pub send_text: bool,
    pub send_voice: bool,
}

pub fn render(ui: &mut egui::Ui, state: &mut AppState) -> ComposeActions {
    let mut actions = ComposeActions::default();

    ui.heading("Send text message");
    egui::Grid::new("compose_ids").num_columns(2).show(ui, |ui| {
        ui.label("Sender id");
        ui.text_edit_singleline(&mut state.sender_input);
        ui.end_row();

        ui.label("Recipient id (optional)");
        ui.text_edit_singleline(&mut state.recipient_input);
        ui.end_row();
    });
    ui.label(egui::RichText::new("Leave the recipient blank for broadcast").weak());

    ui.label("Text");
    ui.text_edit_multiline(&mut state.text_input);
    if ui.button("Send").clicked() {
        actions.send_text = true;
    }

    ui.separator();
    ui.heading("Send voice file");
    ui.label("WAV/MP3 file path (or drop a file on the window):");
    ui.horizontal(|ui| {
        ui.text_edit_singleline(&mut state.voice_path_input);
        let has_file = !state.voice_path_input.trim().is_empty();
        if ui
            .add_enabled(has_file, egui::Button::new("Send voice"))
            .clicked()
        {
            actions.send_voice = true;
        }
    });

    actions
}

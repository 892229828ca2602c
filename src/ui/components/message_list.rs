use eframe::egui;

use crate::common::Message;
use crate::ui::state::message_headline;

/// Lists messages as given. Returns the `media_url` whose Play button was
/// pressed.
pub fn render(ui: &mut egui::Ui, messages: &[Message]) -> Option<String> {
    let mut play = None;

    if messages.is_empty() {
        ui.label("No messages");
        return None;
    }

    egui::ScrollArea::vertical()
        .id_salt("message_list")
        .show(ui, |ui| {
            for (index, message) in messages.iter().enumerate() {
                ui.push_id(index, |ui| {
                    ui.label(message_headline(message));
                    if let Some(text) = &message.text {
                        if !text.is_empty() {
                            ui.label(text);
                        }
                    }
                    if let Some(media_url) = &message.media_url {
                        if !media_url.is_empty() {
                            ui.horizontal(|ui| {
                                ui.label(format!("Media: {media_url}"));
                                if ui.button("Play media").clicked() {
                                    play = Some(media_url.clone());
                                }
                            });
                        }
                    }
                    ui.separator();
                });
            }
        });

    play
}

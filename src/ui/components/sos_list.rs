use eframe::egui;

use crate::common::SosEvent;
use crate::ui::state::{sos_headline, sos_location};

/// Lists SOS events. Returns the event whose Resolve button was pressed.
pub fn render(ui: &mut egui::Ui, events: &[SosEvent]) -> Option<SosEvent> {
    let mut resolve = None;

    if events.is_empty() {
        ui.label("No SOS events");
        return None;
    }

    egui::ScrollArea::vertical()
        .id_salt("sos_list")
        .max_height(400.0)
        .show(ui, |ui| {
            for (index, event) in events.iter().enumerate() {
                ui.push_id(index, |ui| {
                    ui.label(egui::RichText::new(sos_headline(event)).strong());
                    ui.label(sos_location(event));

                    let id = event
                        .id
                        .as_ref()
                        .map(ToString::to_string)
                        .unwrap_or_default();
                    if ui.button(format!("Resolve {id}")).clicked() {
                        resolve = Some(event.clone());
                    }
                    ui.separator();
                });
            }
        });

    resolve
}

use eframe::egui::{self, Align2, Color32, FontId, Sense, Stroke, vec2};

use crate::ui::map::MapView;
use crate::ui::state::MapMarker;

const MARKER_RADIUS: f32 = 6.0;
const HOVER_DISTANCE: f32 = 10.0;

pub fn render(ui: &mut egui::Ui, view: &mut MapView, markers: &[MapMarker]) {
    let size = vec2(ui.available_width().min(500.0), 400.0);
    let (rect, response) = ui.allocate_exact_size(size, Sense::click_and_drag());

    if response.dragged() {
        view.pan(rect, response.drag_delta());
    }
    if response.hovered() {
        let scroll = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll != 0.0 {
            view.zoom(scroll / 50.0);
        }
    }
    if response.double_clicked() {
        *view = MapView::default();
    }

    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, egui::CornerRadius::ZERO, Color32::from_rgb(205, 225, 240));

    let grid = Stroke::new(1.0, Color32::from_rgba_unmultiplied(90, 110, 130, 80));
    let step = view.grid_step();
    let (top_lat, left_lon) = view.unproject(rect, rect.left_top());
    let (bottom_lat, right_lon) = view.unproject(rect, rect.right_bottom());

    let mut lon = (left_lon / step).floor() * step;
    while lon <= right_lon {
        let x = view.project(rect, 0.0, lon).x;
        painter.line_segment([egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())], grid);
        painter.text(
            egui::pos2(x + 2.0, rect.bottom() - 2.0),
            Align2::LEFT_BOTTOM,
            format!("{lon:.1}"),
            FontId::proportional(10.0),
            Color32::DARK_GRAY,
        );
        lon += step;
    }

    let mut lat = (bottom_lat / step).floor() * step;
    while lat <= top_lat {
        let y = view.project(rect, lat, 0.0).y;
        painter.line_segment([egui::pos2(rect.left(), y), egui::pos2(rect.right(), y)], grid);
        painter.text(
            egui::pos2(rect.left() + 2.0, y - 2.0),
            Align2::LEFT_BOTTOM,
            format!("{lat:.1}"),
            FontId::proportional(10.0),
            Color32::DARK_GRAY,
        );
        lat += step;
    }

    let pointer = response.hover_pos();
    let mut hovered: Option<&str> = None;

    for marker in markers {
        let pos = view.project(rect, marker.lat, marker.lon);
        if !rect.contains(pos) {
            continue;
        }
        painter.circle_filled(pos, MARKER_RADIUS, Color32::from_rgb(200, 30, 30));
        painter.circle_filled(pos, MARKER_RADIUS / 3.0, Color32::WHITE);

        if pointer.is_some_and(|p| p.distance(pos) <= HOVER_DISTANCE) {
            hovered = Some(marker.label.as_str());
        }
    }

    if let Some(label) = hovered {
        response.on_hover_text(label);
    }

    ui.label(
        egui::RichText::new("Drag to pan, scroll to zoom, double-click to reset").weak(),
    );
}

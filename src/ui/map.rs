use eframe::egui::{Pos2, Rect, Vec2, pos2};

pub const DEFAULT_CENTER: (f64, f64) = (20.5937, 78.9629);
/// Longitude degrees across the map width at the initial zoom.
pub const DEFAULT_LON_SPAN: f64 = 22.0;
const MIN_LON_SPAN: f64 = 0.05;
const MAX_LON_SPAN: f64 = 360.0;

/// Pannable, zoomable equirectangular view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center_lat: f64,
    pub center_lon: f64,
    pub lon_span: f64,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center_lat: DEFAULT_CENTER.0,
            center_lon: DEFAULT_CENTER.1,
            lon_span: DEFAULT_LON_SPAN,
        }
    }
}

impl MapView {
    fn degrees_per_point(&self, rect: Rect) -> f64 {
        self.lon_span / f64::from(rect.width().max(1.0))
    }

    /// Screen position of a coordinate inside `rect`. May fall outside it.
    pub fn project(&self, rect: Rect, lat: f64, lon: f64) -> Pos2 {
        let scale = self.degrees_per_point(rect);
        let center = rect.center();
        let x = f64::from(center.x) + (lon - self.center_lon) / scale;
        let y = f64::from(center.y) - (lat - self.center_lat) / scale;
        pos2(x as f32, y as f32)
    }

    /// Inverse of [`MapView::project`], as `(lat, lon)`.
    pub fn unproject(&self, rect: Rect, pos: Pos2) -> (f64, f64) {
        let scale = self.degrees_per_point(rect);
        let center = rect.center();
        let lon = self.center_lon + f64::from(pos.x - center.x) * scale;
        let lat = self.center_lat - f64::from(pos.y - center.y) * scale;
        (lat, lon)
    }

    /// Moves the view by a drag of `delta` screen points.
    pub fn pan(&mut self, rect: Rect, delta: Vec2) {
        let scale = self.degrees_per_point(rect);
        self.center_lon -= f64::from(delta.x) * scale;
        self.center_lat = (self.center_lat + f64::from(delta.y) * scale).clamp(-90.0, 90.0);
    }

    /// Positive `steps` zoom in.
    pub fn zoom(&mut self, steps: f32) {
        let factor = 0.9_f64.powf(f64::from(steps));
        self.lon_span = (self.lon_span * factor).clamp(MIN_LON_SPAN, MAX_LON_SPAN);
    }

    /// Grid spacing in degrees that keeps a handful of lines on screen.
    pub fn grid_step(&self) -> f64 {
        [0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0]
            .into_iter()
            .find(|step| self.lon_span / step <= 8.0)
            .unwrap_or(60.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> Rect {
        Rect::from_min_size(pos2(0.0, 0.0), Vec2::new(500.0, 400.0))
    }

    #[test]
    fn center_projects_to_rect_center() {
        let view = MapView::default();
        let pos = view.project(rect(), DEFAULT_CENTER.0, DEFAULT_CENTER.1);
        assert!((pos.x - 250.0).abs() < 0.01);
        assert!((pos.y - 200.0).abs() < 0.01);
    }

    #[test]
    fn north_is_up_and_east_is_right() {
        let view = MapView::default();
        let pos = view.project(rect(), 12.97, 77.59);
        // Bengaluru lies south-west of the default center.
        assert!(pos.x < 250.0);
        assert!(pos.y > 200.0);
        assert!(rect().contains(pos));
    }

    #[test]
    fn unproject_inverts_project() {
        let view = MapView::default();
        let pos = view.project(rect(), 12.97, 77.59);
        let (lat, lon) = view.unproject(rect(), pos);
        assert!((lat - 12.97).abs() < 1e-3);
        assert!((lon - 77.59).abs() < 1e-3);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut view = MapView::default();
        view.zoom(1000.0);
        assert_eq!(view.lon_span, MIN_LON_SPAN);
        view.zoom(-1000.0);
        assert_eq!(view.lon_span, MAX_LON_SPAN);
    }

    #[test]
    fn pan_follows_drag() {
        let mut view = MapView::default();
        view.pan(rect(), Vec2::new(50.0, 0.0));
        assert!(view.center_lon < DEFAULT_CENTER.1);
        assert_eq!(view.center_lat, DEFAULT_CENTER.0);
    }
}

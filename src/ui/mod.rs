pub mod app;
pub mod components;
pub mod map;
pub mod state;

pub use app::CaregiverApp;

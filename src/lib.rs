//! Caregiver dashboard for the WristBridge backend: SOS alerts on a map,
//! recent messages with voice playback, text/voice sending and a simulated
//! watch SOS button.

pub mod audio;
pub mod cli;
pub mod common;
pub mod config;
pub mod network;
pub mod ui;

use std::process::ExitCode;

use clap::Parser;
use dotenvy::dotenv;
use eframe::egui;
use tokio::sync::mpsc;
use wristbridge_caregiver::cli::{Cli, Command, run_command};
use wristbridge_caregiver::config::{self, AppConfig};
use wristbridge_caregiver::network::{BackendClient, BackendConfig, BackendWorker};
use wristbridge_caregiver::ui::CaregiverApp;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let mut settings = config::load_config(&cli.config);
    if let Some(backend) = &cli.backend {
        settings.backend_url = backend.clone();
    }
    let backend = BackendConfig::from(&settings);

    match cli.command {
        Some(command) => run_headless(command, backend, &settings).await,
        None => run_dashboard(settings, backend, cli.config),
    }
}

async fn run_headless(command: Command, backend: BackendConfig, settings: &AppConfig) -> ExitCode {
    let client = BackendClient::new(backend);
    match run_command(command, &client, settings).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_dashboard(settings: AppConfig, backend: BackendConfig, config_path: String) -> ExitCode {
    // UI -> backend worker
    let (cmd_tx, cmd_rx) = mpsc::channel(100);
    // backend worker -> UI
    let (event_tx, event_rx) = mpsc::channel(100);

    log::info!("Dashboard starting against {}", backend.base_url);
    tokio::spawn(async move {
        let worker = BackendWorker::new(BackendClient::new(backend), event_tx, cmd_rx);
        worker.run().await;
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("WristBridge Caregiver Panel")
            .with_inner_size([1280.0, 820.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        "WristBridge Caregiver Panel",
        options,
        Box::new(move |cc| {
            Ok(Box::new(CaregiverApp::new(
                cc,
                settings,
                config_path,
                cmd_tx,
                event_rx,
            )))
        }),
    );

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("Dashboard terminated: {err}");
            ExitCode::FAILURE
        }
    }
}

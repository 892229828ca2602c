mod common;

use std::time::Duration;

use common::{Hit, MockBackend, WAV_BYTES, dead_backend, test_config};
use serde_json::json;
use tokio::sync::mpsc;
use wristbridge_caregiver::cli::{Command, run_command};
use wristbridge_caregiver::common::{BackendCommand, BackendEvent, OutgoingMessage, SubmissionKind};
use wristbridge_caregiver::config::AppConfig;
use wristbridge_caregiver::network::{BackendClient, BackendWorker, ErrorKind};
use wristbridge_caregiver::ui::state::AppState;

struct Harness {
    commands: mpsc::Sender<BackendCommand>,
    events: mpsc::Receiver<BackendEvent>,
}

impl Harness {
    fn start(base_url: String) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (event_tx, event_rx) = mpsc::channel(16);
        let worker = BackendWorker::new(BackendClient::new(test_config(base_url)), event_tx, cmd_rx);
        tokio::spawn(worker.run());
        Self {
            commands: cmd_tx,
            events: event_rx,
        }
    }

    async fn send(&self, command: BackendCommand) {
        self.commands.send(command).await.unwrap();
    }

    async fn next(&mut self) -> BackendEvent {
        tokio::time::timeout(Duration::from_secs(10), self.events.recv())
            .await
            .expect("worker did not answer in time")
            .expect("worker stopped")
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn refresh_loads_sos_then_messages_into_state() {
    let backend = MockBackend::new();
    let mut harness = Harness::start(backend.spawn().await);
    let mut state = AppState::new(AppConfig::default(), "unused.json".into());

    harness.send(BackendCommand::RefreshDashboard).await;
    let first = harness.next().await;
    assert!(matches!(first, BackendEvent::SosLoaded(Ok(_))));
    state.apply_event(first);
    let second = harness.next().await;
    assert!(matches!(second, BackendEvent::MessagesLoaded(Ok(_))));
    state.apply_event(second);

    assert_eq!(state.sos.len(), 2);
    assert_eq!(state.map_markers().len(), 2);
    assert_eq!(state.visible_messages().len(), 3);
    assert!(state.sos_warning.is_none());
    assert!(!state.is_refreshing());
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_backend_yields_warnings_and_empty_lists() {
    let mut harness = Harness::start(dead_backend().await);
    let mut state = AppState::new(AppConfig::default(), "unused.json".into());

    harness.send(BackendCommand::RefreshDashboard).await;
    state.apply_event(harness.next().await);
    state.apply_event(harness.next().await);

    assert!(state.sos.is_empty());
    assert!(state.messages.is_empty());
    assert!(state.sos_warning.is_some());
    assert!(state.messages_warning.is_some());
}

#[tokio::test(flavor = "multi_thread")]
async fn reconfigure_redirects_following_requests() {
    let backend = MockBackend::new();
    let live = backend.spawn().await;
    let mut harness = Harness::start(dead_backend().await);

    harness
        .send(BackendCommand::Reconfigure(test_config(live)))
        .await;
    harness.send(BackendCommand::RefreshDashboard).await;

    match harness.next().await {
        BackendEvent::SosLoaded(Ok(sos)) => assert_eq!(sos.len(), 2),
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn play_media_downloads_from_uploads() {
    let backend = MockBackend::new();
    let mut harness = Harness::start(backend.spawn().await);

    harness
        .send(BackendCommand::FetchMedia {
            media_url: "/files/a.wav".into(),
        })
        .await;

    match harness.next().await {
        BackendEvent::MediaFetched { media_url, result } => {
            assert_eq!(media_url, "/files/a.wav");
            assert_eq!(result.unwrap(), WAV_BYTES);
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert_eq!(backend.hits(), vec![Hit::Upload("a.wav".into())]);
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_write_is_reported_once() {
    let mut harness = Harness::start(dead_backend().await);

    harness
        .send(BackendCommand::SendMessage(OutgoingMessage::text(
            "s1", "", "hello",
        )))
        .await;

    match harness.next().await {
        BackendEvent::Submitted { kind, result } => {
            assert_eq!(kind, SubmissionKind::TextMessage);
            assert_eq!(result.unwrap_err().kind(), ErrorKind::Transport);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn server_error_write_is_sent_once_and_shown_verbatim() {
    let backend = MockBackend::failing_writes();
    let mut harness = Harness::start(backend.spawn().await);
    let mut state = AppState::new(AppConfig::default(), "unused.json".into());

    harness
        .send(BackendCommand::SendSos(state.simulated_sos()))
        .await;
    let event = harness.next().await;
    assert!(matches!(
        &event,
        BackendEvent::Submitted {
            kind: SubmissionKind::Sos,
            result: Ok(_)
        }
    ));
    state.apply_event(event);

    assert_eq!(backend.write_calls(), 1);
    let reply = state.last_reply.unwrap();
    assert!(reply.body.unwrap().contains("boom"));
}

#[tokio::test(flavor = "multi_thread")]
async fn headless_send_message_prints_reply() {
    let backend = MockBackend::new();
    let client = BackendClient::new(test_config(backend.spawn().await));

    let output = run_command(
        Command::SendMessage {
            sender: "s1".into(),
            recipient: "  ".into(),
            text: "hello".into(),
        },
        &client,
        &AppConfig::default(),
    )
    .await
    .unwrap();

    let printed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(printed, json!({"status": "ok", "id": 42}));
    assert_eq!(
        backend.hits(),
        vec![Hit::Json {
            path: "/send_message",
            body: json!({"sender_id": "s1", "recipient_id": null, "msg_type": "text", "text": "hello"}),
        }]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn headless_send_sos_defaults_to_simulated_location() {
    let backend = MockBackend::new();
    let client = BackendClient::new(test_config(backend.spawn().await));

    run_command(
        Command::SendSos {
            user: "u1".into(),
            lat: None,
            lon: None,
            note: None,
        },
        &client,
        &AppConfig::default(),
    )
    .await
    .unwrap();

    assert_eq!(
        backend.hits(),
        vec![Hit::Json {
            path: "/send_sos",
            body: json!({"user_id": "u1", "lat": 12.9716, "lon": 77.5946, "note": "Simulated SOS from watch"}),
        }]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn headless_messages_respects_limit() {
    let backend = MockBackend::new();
    let client = BackendClient::new(test_config(backend.spawn().await));

    let output = run_command(Command::Messages { limit: 2 }, &client, &AppConfig::default())
        .await
        .unwrap();

    let printed: Vec<serde_json::Value> = serde_json::from_str(&output).unwrap();
    assert_eq!(printed.len(), 2);
    assert_eq!(printed[0]["id"], 9);
}

#[tokio::test(flavor = "multi_thread")]
async fn headless_voice_and_media_round_trip_files() {
    let backend = MockBackend::new();
    let client = BackendClient::new(test_config(backend.spawn().await));
    let dir = tempfile::tempdir().unwrap();

    let voice = dir.path().join("clip.wav");
    std::fs::write(&voice, WAV_BYTES).unwrap();
    run_command(
        Command::SendVoice {
            sender: "user_blind_1".into(),
            recipient: String::new(),
            file: voice,
        },
        &client,
        &AppConfig::default(),
    )
    .await
    .unwrap();

    let out = dir.path().join("downloaded.wav");
    let output = run_command(
        Command::FetchMedia {
            url: "/files/a.wav".into(),
            out: out.clone(),
        },
        &client,
        &AppConfig::default(),
    )
    .await
    .unwrap();

    assert!(output.starts_with("Wrote"));
    assert_eq!(std::fs::read(&out).unwrap(), WAV_BYTES);
    match backend.hits().as_slice() {
        [Hit::Voice { fields, file_name, content_type, .. }, Hit::Upload(name)] => {
            assert!(!fields.contains_key("recipient_id"));
            assert_eq!(file_name, "clip.wav");
            assert_eq!(content_type, "audio/wav");
            assert_eq!(name, "a.wav");
        }
        other => panic!("unexpected hits: {other:?}"),
    }
}

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use wristbridge_caregiver::network::BackendConfig;

pub const WAV_BYTES: &[u8] = b"RIFF\x24\x00\x00\x00WAVEfmt ";

/// A request the mock backend received.
#[derive(Debug, Clone, PartialEq)]
pub enum Hit {
    Json { path: &'static str, body: Value },
    Upload(String),
    Voice {
        fields: BTreeMap<String, String>,
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

#[derive(Clone, Default)]
pub struct MockBackend {
    hits: Arc<Mutex<Vec<Hit>>>,
    sos_calls: Arc<AtomicUsize>,
    write_calls: Arc<AtomicUsize>,
    /// Number of leading `/sos` calls that stall past the read timeout.
    stall_first_sos: usize,
    /// Number of leading connections closed before any response is written.
    drop_first_connections: usize,
    /// Writes answer HTTP 500 with a JSON error body.
    failing_writes: bool,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stalling_first_sos(calls: usize) -> Self {
        Self {
            stall_first_sos: calls,
            ..Self::default()
        }
    }

    pub fn dropping_first_connections(connections: usize) -> Self {
        Self {
            drop_first_connections: connections,
            ..Self::default()
        }
    }

    pub fn failing_writes() -> Self {
        Self {
            failing_writes: true,
            ..Self::default()
        }
    }

    pub fn hits(&self) -> Vec<Hit> {
        self.hits.lock().unwrap().clone()
    }

    pub fn sos_calls(&self) -> usize {
        self.sos_calls.load(Ordering::SeqCst)
    }

    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    fn write_reply(&self, ok: Value) -> (StatusCode, Json<Value>) {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_writes {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"detail": "boom"})),
            )
        } else {
            (StatusCode::OK, Json(ok))
        }
    }

    fn record(&self, hit: Hit) {
        self.hits.lock().unwrap().push(hit);
    }

    /// Serves on an ephemeral port; returns the base URL with a trailing slash.
    pub async fn spawn(&self) -> String {
        let router = Router::new()
            .route("/sos", get(list_sos))
            .route("/messages", get(list_messages))
            .route("/uploads/{file}", get(upload))
            .route("/send_message", post(send_message))
            .route("/send_voice/", post(send_voice))
            .route("/send_sos", post(send_sos))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let drops = self.drop_first_connections;
        tokio::spawn(async move {
            for _ in 0..drops {
                let (socket, _) = listener.accept().await.unwrap();
                drop(socket);
            }
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/")
    }
}

pub fn sos_fixture() -> Value {
    json!([
        {"id": 1, "user_id": "u1", "lat": 12.97, "lon": 77.59, "note": "help", "created_at": "2024-01-01T00:00:00Z"},
        {"id": 2, "user_id": "u2", "lat": 19.07, "lon": 72.87, "note": "fell", "created_at": "2024-01-02T00:00:00Z"}
    ])
}

pub fn messages_fixture() -> Value {
    json!([
        {"id": 9, "sender_id": "s2", "recipient_id": null, "text": "newest first from server", "media_url": null, "created_at": "2024-01-03T00:00:00Z"},
        {"id": 3, "sender_id": "user_blind_1", "recipient_id": "carer", "text": null, "media_url": "/files/a.wav", "created_at": "2024-01-02T00:00:00Z"},
        {"id": 5, "sender_id": "s1", "recipient_id": "u1", "text": "hi", "media_url": null, "created_at": "2024-01-01T00:00:00Z"}
    ])
}

/// Base URL nothing listens on.
pub async fn dead_backend() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn test_config(base_url: String) -> BackendConfig {
    BackendConfig {
        base_url,
        read_timeout: Duration::from_millis(300),
        read_attempts: 2,
        retry_backoff: Duration::from_millis(10),
    }
}

async fn list_sos(State(backend): State<MockBackend>) -> Json<Value> {
    let call = backend.sos_calls.fetch_add(1, Ordering::SeqCst);
    if call < backend.stall_first_sos {
        tokio::time::sleep(Duration::from_secs(2)).await;
    }
    Json(sos_fixture())
}

async fn list_messages() -> Json<Value> {
    Json(messages_fixture())
}

async fn upload(State(backend): State<MockBackend>, Path(file): Path<String>) -> (StatusCode, Vec<u8>) {
    backend.record(Hit::Upload(file.clone()));
    if file == "missing.wav" {
        (StatusCode::NOT_FOUND, Vec::new())
    } else {
        (StatusCode::OK, WAV_BYTES.to_vec())
    }
}

async fn send_message(
    State(backend): State<MockBackend>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    backend.record(Hit::Json {
        path: "/send_message",
        body,
    });
    backend.write_reply(json!({"status": "ok", "id": 42}))
}

async fn send_sos(
    State(backend): State<MockBackend>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    backend.record(Hit::Json {
        path: "/send_sos",
        body,
    });
    backend.write_reply(json!({"status": "ok", "sos_id": 7}))
}

async fn send_voice(
    State(backend): State<MockBackend>,
    mut multipart: Multipart,
) -> (StatusCode, Json<Value>) {
    let mut fields = BTreeMap::new();
    let mut file_name = String::new();
    let mut content_type = String::new();
    let mut bytes = Vec::new();

    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            file_name = field.file_name().unwrap_or_default().to_string();
            content_type = field.content_type().unwrap_or_default().to_string();
            bytes = field.bytes().await.unwrap().to_vec();
        } else {
            fields.insert(name, field.text().await.unwrap());
        }
    }

    backend.record(Hit::Voice {
        fields,
        file_name,
        content_type,
        bytes,
    });
    backend.write_reply(json!({"status": "ok", "media_url": "/files/voice.wav"}))
}

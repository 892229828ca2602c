pub mod client;
pub mod endpoint;
pub mod error;
pub mod worker;

pub use client::{BackendClient, load_voice_file, voice_mime_type};
pub use endpoint::{BackendConfig, DEFAULT_BACKEND_URL, join_url, media_file_name};
pub use error::{ApiError, ApiResult, ErrorKind};
pub use worker::BackendWorker;

use std::path::Path;

use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::common::{Message, OutgoingMessage, ServerReply, SosEvent, SosReport, VoiceUpload};

use super::endpoint::{
    BackendConfig, MESSAGES_PATH, SEND_MESSAGE_PATH, SEND_SOS_PATH, SEND_VOICE_PATH, SOS_PATH,
    UPLOADS_PATH, media_file_name,
};
use super::error::{ApiError, ApiResult};

/// HTTP client for the caregiver backend.
///
/// Reads (`/sos`, `/messages`, `/uploads/..`) are retried with backoff on
/// connection failures. Writes are sent exactly once and their response body
/// is handed back undecoded beyond JSON.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    config: BackendConfig,
}

impl BackendClient {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: BackendConfig) {
        self.config = config;
    }

    pub async fn fetch_sos_list(&self) -> ApiResult<Vec<SosEvent>> {
        self.get_json_with_retry(SOS_PATH).await
    }

    pub async fn fetch_messages(&self) -> ApiResult<Vec<Message>> {
        self.get_json_with_retry(MESSAGES_PATH).await
    }

    /// Downloads `GET {base}/uploads/{file name of media_url}`.
    pub async fn fetch_media(&self, media_url: &str) -> ApiResult<Vec<u8>> {
        let file_name = media_file_name(media_url).ok_or_else(|| ApiError::InvalidMediaUrl {
            media_url: media_url.to_string(),
        })?;
        let url = self.config.endpoint(&format!("{UPLOADS_PATH}/{file_name}"));

        let mut attempt = 1;
        loop {
            match self.get_bytes(&url).await {
                Ok(bytes) => return Ok(bytes),
                Err(err) if err.is_retryable() && attempt < self.config.read_attempts => {
                    self.wait_before_retry(&url, attempt, &err).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    pub async fn send_message(&self, message: &OutgoingMessage) -> ApiResult<ServerReply> {
        self.post_json(SEND_MESSAGE_PATH, message).await
    }

    /// Multipart upload. A broadcast voice message leaves `recipient_id` out
    /// of the form.
    pub async fn send_voice(&self, upload: &VoiceUpload) -> ApiResult<ServerReply> {
        let url = self.config.endpoint(SEND_VOICE_PATH);

        let part = Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(&upload.mime_type)
            .map_err(|err| ApiError::File {
                path: upload.file_name.clone(),
                message: err.to_string(),
            })?;

        let mut form = Form::new().text("sender_id", upload.sender_id.clone());
        if let Some(recipient) = &upload.recipient_id {
            form = form.text("recipient_id", recipient.clone());
        }
        let form = form.part("file", part);

        log::debug!(
            "POST {url} ({} bytes, {})",
            upload.bytes.len(),
            upload.mime_type
        );
        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|err| ApiError::from_reqwest(&url, err))?;
        decode_json(&url, response).await
    }

    pub async fn send_sos(&self, report: &SosReport) -> ApiResult<ServerReply> {
        self.post_json(SEND_SOS_PATH, report).await
    }

    async fn get_json_with_retry<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = self.config.endpoint(path);
        let mut attempt = 1;
        loop {
            match self.get_json(&url).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < self.config.read_attempts => {
                    self.wait_before_retry(&url, attempt, &err).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        log::debug!("GET {url}");
        let response = self
            .http
            .get(url)
            .timeout(self.config.read_timeout)
            .send()
            .await
            .map_err(|err| ApiError::from_reqwest(url, err))?;
        decode_json(url, response).await
    }

    async fn get_bytes(&self, url: &str) -> ApiResult<Vec<u8>> {
        log::debug!("GET {url}");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| ApiError::from_reqwest(url, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| ApiError::from_reqwest(url, err))?;
        Ok(bytes.to_vec())
    }

    async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> ApiResult<ServerReply> {
        let url = self.config.endpoint(path);
        log::debug!("POST {url}");
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|err| ApiError::from_reqwest(&url, err))?;
        decode_json(&url, response).await
    }

    async fn wait_before_retry(&self, url: &str, attempt: u32, err: &ApiError) {
        let delay = self.config.backoff_after(attempt);
        log::warn!(
            "Attempt {attempt}/{} for {url} failed ({err}); retrying in {delay:?}",
            self.config.read_attempts
        );
        tokio::time::sleep(delay).await;
    }
}

/// Decodes the body as JSON whatever the status code.
async fn decode_json<T: DeserializeOwned>(url: &str, response: reqwest::Response) -> ApiResult<T> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|err| ApiError::from_reqwest(url, err))?;
    if !status.is_success() {
        log::warn!("{url} answered HTTP {status}");
    }
    serde_json::from_slice(&body).map_err(|err| ApiError::from_json(url, err))
}

/// Mime type for the audio formats the backend accepts.
pub fn voice_mime_type(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "wav" => Some("audio/wav"),
        "mp3" => Some("audio/mpeg"),
        _ => None,
    }
}

/// Reads a `.wav`/`.mp3` file from disk into an upload.
pub fn load_voice_file(
    path: &Path,
    sender_id: &str,
    recipient_id: Option<String>,
) -> ApiResult<VoiceUpload> {
    let display = path.display().to_string();
    let mime_type = voice_mime_type(path).ok_or_else(|| ApiError::File {
        path: display.clone(),
        message: "only .wav and .mp3 files can be sent".to_string(),
    })?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| ApiError::File {
            path: display.clone(),
            message: "path has no file name".to_string(),
        })?
        .to_string();
    let bytes = std::fs::read(path).map_err(|err| ApiError::File {
        path: display,
        message: err.to_string(),
    })?;

    Ok(VoiceUpload {
        sender_id: sender_id.to_string(),
        recipient_id,
        file_name,
        mime_type: mime_type.to_string(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn mime_type_from_extension() {
        assert_eq!(voice_mime_type(Path::new("a.wav")), Some("audio/wav"));
        assert_eq!(voice_mime_type(Path::new("clip.MP3")), Some("audio/mpeg"));
        assert_eq!(voice_mime_type(Path::new("notes.txt")), None);
        assert_eq!(voice_mime_type(Path::new("noext")), None);
    }

    #[test]
    fn load_voice_file_reads_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.wav");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"RIFFdata").unwrap();

        let upload = load_voice_file(&path, "s1", None).unwrap();
        assert_eq!(upload.file_name, "hello.wav");
        assert_eq!(upload.mime_type, "audio/wav");
        assert_eq!(upload.bytes, b"RIFFdata");
        assert_eq!(upload.recipient_id, None);
    }

    #[test]
    fn load_voice_file_rejects_other_formats() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"x").unwrap();

        let err = load_voice_file(&path, "s1", None).unwrap_err();
        assert_eq!(err.kind(), crate::network::ErrorKind::File);
    }
}

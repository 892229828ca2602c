use thiserror::Error;

/// Coarse failure class, used by the UI to pick how an error is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Timeout,
    Decode,
    Status,
    File,
}

/// Failure of any backend operation.
///
/// Carries strings rather than the underlying `reqwest::Error` so results can
/// travel through the UI event channel and be cloned into state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("request to {url} timed out")]
    Timeout { url: String },
    #[error("unexpected response from {url}: {message}")]
    Decode { url: String, message: String },
    #[error("media url `{media_url}` has no file name")]
    InvalidMediaUrl { media_url: String },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("cannot use voice file {path}: {message}")]
    File { path: String, message: String },
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Transport { .. } => ErrorKind::Transport,
            ApiError::Timeout { .. } => ErrorKind::Timeout,
            ApiError::Decode { .. } | ApiError::InvalidMediaUrl { .. } => ErrorKind::Decode,
            ApiError::Status { .. } => ErrorKind::Status,
            ApiError::File { .. } => ErrorKind::File,
        }
    }

    /// Only connection-level failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Transport | ErrorKind::Timeout)
    }

    pub(crate) fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout {
                url: url.to_string(),
            }
        } else if err.is_decode() {
            ApiError::Decode {
                url: url.to_string(),
                message: err.to_string(),
            }
        } else {
            ApiError::Transport {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }

    pub(crate) fn from_json(url: &str, err: serde_json::Error) -> Self {
        ApiError::Decode {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

use std::borrow::Cow;

use bytes::Bytes;
use serde::Deserialize;
use thiserror::Error;

/// Failure of a single IntelX call, tagged with the stage that failed.
#[derive(Debug, Error)]
pub enum IntelXError {
    /// The URL, request or HTTP client could not be built; nothing was sent.
    #[error("request construction error: {0}")]
    RequestConstruction(String),
    #[error("network error: {0}")]
    Transport(String),
    #[error("timeout")]
    Timeout,
    /// The service answered with a non-2xx status. `body` holds the response
    /// bytes exactly as sent.
    #[error("http {status}: {}", String::from_utf8_lossy(.body))]
    Remote { status: u16, body: Bytes },
    #[error("json error: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    detail: String,
}

impl IntelXError {
    /// Returns true if the failure may go away when the call is repeated.
    /// The client itself never retries.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout => true,
            Self::Remote { status, .. } => (500..=599).contains(status),
            _ => false,
        }
    }

    /// Status code of a remote failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Body of a remote failure as text, with invalid UTF-8 replaced.
    pub fn body_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Remote { body, .. } => Some(String::from_utf8_lossy(body)),
            _ => None,
        }
    }

    /// The `detail` message of a JSON error body, e.g. `{"detail":"Not found."}`.
    pub fn detail(&self) -> Option<String> {
        if let Self::Remote { body, .. } = self
            && let Ok(api_err) = serde_json::from_slice::<ApiErrorResponse>(body)
        {
            return Some(api_err.detail);
        }
        None
    }
}

pub(crate) fn map_reqwest_error(e: reqwest::Error) -> IntelXError {
    if e.is_timeout() {
        IntelXError::Timeout
    } else if e.is_builder() {
        IntelXError::RequestConstruction(e.to_string())
    } else {
        IntelXError::Transport(e.to_string())
    }
}

use reqwest::StatusCode;
use thiserror::Error;

/// Failures of the users endpoint call. The endpoint is public, so every
/// non-success status is either "not there", "server broke" or "unexpected".
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Users endpoint not found: {0}")]
    EndpointNotFound(String),

    #[error("Server error ({status}): {body}")]
    Server { status: StatusCode, body: String },

    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to decode users: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Bodies quoted in errors are cut to this many bytes.
const MAX_ERROR_BODY_LENGTH: usize = 500;

fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
}

impl ApiError {
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let body = truncate_body(body);
        if status == StatusCode::NOT_FOUND {
            ApiError::EndpointNotFound(body)
        } else if status.is_server_error() {
            ApiError::Server { status, body }
        } else {
            ApiError::UnexpectedStatus { status, body }
        }
    }
}

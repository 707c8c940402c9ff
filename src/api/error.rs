//! API error types

use thiserror::Error;

/// Errors produced by the request gateway and endpoint bindings.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure: no usable response arrived.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server rejected the credential. The gateway has already
    /// cleared the stored token and broadcast a logout by the time this
    /// is returned.
    #[error("unauthorized")]
    Unauthorized,

    /// The request conflicts with server state, e.g. a vote that already
    /// exists. Benign for vote toggles and absorbed by the reconciler.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Any other non-success HTTP status.
    #[error("request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body was not the JSON we expected.
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// Short message suitable for inline display next to the action that
    /// triggered the failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Could not reach the server".to_string(),
            Self::Unauthorized => "Your session has expired, please log in again".to_string(),
            Self::Conflict(msg) | Self::Status { message: msg, .. } if !msg.is_empty() => {
                msg.clone()
            }
            Self::Conflict(_) => "Already applied".to_string(),
            Self::Status { status, .. } => format!("Request failed ({})", status),
            Self::Decode(_) => "Unexpected server response".to_string(),
        }
    }
}

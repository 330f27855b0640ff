use reqwest::StatusCode;
use thiserror::Error;

use crate::models::ApiEnvelope;

/// Coarse failure classes surfaced to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Malformed or missing field, reported by the Listing Service
    ValidationGap,
    /// The request could not complete
    NetworkFailure,
    /// The bearer credential is no longer valid
    SessionExpired,
    /// Any other rejection
    ServerRejected,
}

/// Listing Service error type
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("session expired")]
    SessionExpired,

    #[error("validation failed: {}", message.as_deref().unwrap_or("no details"))]
    ValidationGap { message: Option<String> },

    #[error("listing service returned {status}: {}", message.as_deref().unwrap_or("no details"))]
    ServerRejected { status: u16, message: Option<String> },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ServiceError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ServiceError::Network(_) => FailureKind::NetworkFailure,
            ServiceError::SessionExpired => FailureKind::SessionExpired,
            ServiceError::ValidationGap { .. } => FailureKind::ValidationGap,
            ServiceError::ServerRejected { .. } | ServiceError::InvalidResponse(_) => {
                FailureKind::ServerRejected
            }
        }
    }

    /// Message provided by the Listing Service, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ServiceError::ValidationGap { message } | ServiceError::ServerRejected { message, .. } => {
                message.as_deref()
            }
            _ => None,
        }
    }
}

/// Result type for Listing Service calls
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Classify a non-2xx response.
///
/// 401 means the session expired, as does a 403 whose message contains one
/// of `markers`. Permission denials without a token message stay rejections.
/// 400 and 422 are validation rejections; everything else is a plain rejection.
pub fn classify_failure(status: StatusCode, body: &str, markers: &[String]) -> ServiceError {
    let message = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(body)
        .ok()
        .and_then(|envelope| envelope.message)
        .filter(|m| !m.trim().is_empty());

    let token_rejected =
        status == StatusCode::FORBIDDEN && is_session_expired(message.as_deref(), markers);
    if status == StatusCode::UNAUTHORIZED || token_rejected {
        return ServiceError::SessionExpired;
    }

    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            ServiceError::ValidationGap { message }
        }
        _ => ServiceError::ServerRejected {
            status: status.as_u16(),
            message,
        },
    }
}

fn is_session_expired(message: Option<&str>, markers: &[String]) -> bool {
    let Some(message) = message else {
        return false;
    };
    let message = message.to_lowercase();
    markers
        .iter()
        .any(|marker| message.contains(&marker.to_lowercase()))
}

//! Server error types.

use crate::actor::ActorError;
use crate::wire::WireError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use derive_more::{Display, Error};
use houseqi::{MoveError, MoveErrorKind};
use serde_json::json;
use tracing::{error, instrument, warn};

/// Error returned by HTTP handlers.
#[derive(Debug, Display)]
pub enum ServerError {
    /// The body was not valid JSON for a move.
    #[display("Malformed move body: {}", _0)]
    Decode(serde_json::Error),
    /// The body decoded but does not describe a move.
    #[display("Invalid move: {}", _0)]
    Wire(WireError),
    /// The actor refused the move.
    #[display("{}", _0)]
    Move(MoveError),
    /// The actor is not running.
    #[display("Game state actor is not running")]
    ActorUnavailable,
    /// A snapshot could not be encoded.
    #[display("Failed to encode game state: {}", _0)]
    Encode(serde_json::Error),
}

impl ServerError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Decode(_) => StatusCode::BAD_REQUEST,
            ServerError::Wire(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::Move(e) => match e.kind() {
                MoveErrorKind::InvalidInput => StatusCode::UNPROCESSABLE_ENTITY,
                MoveErrorKind::Invariant => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ServerError::ActorUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::error::Error for ServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServerError::Decode(e) | ServerError::Encode(e) => Some(e),
            ServerError::Wire(e) => Some(e),
            ServerError::Move(e) => Some(e),
            ServerError::ActorUnavailable => None,
        }
    }
}

impl From<WireError> for ServerError {
    fn from(err: WireError) -> Self {
        ServerError::Wire(err)
    }
}

impl From<ActorError> for ServerError {
    fn from(err: ActorError) -> Self {
        match err {
            ActorError::Rejected(e) => ServerError::Move(e),
            ActorError::Closed => ServerError::ActorUnavailable,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, %status, "Request failed");
        } else {
            warn!(error = %self, %status, "Request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

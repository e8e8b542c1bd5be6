//! Error kinds for request handling and process startup.

use http::StatusCode;
use thiserror::Error;

/// The executor raised instead of reporting errors in-band.
#[derive(Debug, Clone, Error)]
#[error("executor failed: {0}")]
pub struct ExecutorFailure(pub String);

impl ExecutorFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Errors that end a single invocation before or during execution.
///
/// None of these are fatal to the process. Each maps to a transport status
/// through [`HandlerError::status`]; GraphQL validation and resolver errors
/// never appear here because they travel inside a 200 response body.
#[derive(Debug, Clone, Error)]
pub enum HandlerError {
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("method not allowed: {0}")]
    MethodNotAllowed(String),

    #[error("no GraphQL endpoint at {0}")]
    NotFound(String),

    #[error("must provide query string")]
    MissingQuery,

    #[error("request body exceeds {0} bytes")]
    PayloadTooLarge(usize),

    #[error(transparent)]
    ExecutorFailure(#[from] ExecutorFailure),
}

impl HandlerError {
    pub fn status(&self) -> StatusCode {
        match self {
            HandlerError::MalformedPayload(_) | HandlerError::MissingQuery => {
                StatusCode::BAD_REQUEST
            }
            HandlerError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            HandlerError::NotFound(_) => StatusCode::NOT_FOUND,
            HandlerError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            HandlerError::ExecutorFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Errors that abort the process before any invocation is served.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartupError {
    #[error("environment variable {0} is set but empty")]
    EmptySignal(String),

    #[error("adapter wiring failed: {0}")]
    Wiring(String),
}

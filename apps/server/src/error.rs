//! Error types for the directory service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value as JsonValue};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// A single field's validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid request")]
    InvalidRequest(Vec<FieldError>),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("search unavailable: {0}")]
    SearchUnavailable(String),

    #[error("SMS gateway error: {0}")]
    SmsGateway(String),

    #[error("internal server error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Error::InvalidRequest(errors) => (
                StatusCode::BAD_REQUEST,
                json!({ "errors": group_by_field(errors) }),
            ),
            Error::Validation(_) => (StatusCode::BAD_REQUEST, detail(self.to_string())),
            Error::NotFound(_) => (StatusCode::NOT_FOUND, detail(self.to_string())),
            Error::SearchUnavailable(_) => {
                // Unavailability must stay distinguishable from an empty
                // result set; the underlying cause only goes to the log.
                tracing::error!("{}", self);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    detail("Search is temporarily unavailable".to_string()),
                )
            }
            Error::SmsGateway(_) => {
                tracing::error!("{}", self);
                (
                    StatusCode::BAD_GATEWAY,
                    detail("SMS gateway error".to_string()),
                )
            }
            Error::Internal(_) | Error::Other(_) => {
                tracing::error!("Internal error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    detail("Internal server error".to_string()),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

fn detail(message: String) -> JsonValue {
    json!({ "detail": message })
}

/// Group field errors into `{"field": ["message", ...]}`, preserving the
/// order in which fields first failed.
fn group_by_field(errors: &[FieldError]) -> JsonValue {
    let mut grouped: Map<String, JsonValue> = Map::new();
    for error in errors {
        if let JsonValue::Array(messages) = grouped
            .entry(error.field.clone())
            .or_insert_with(|| JsonValue::Array(Vec::new()))
        {
            messages.push(json!(error.message));
        }
    }
    JsonValue::Object(grouped)
}

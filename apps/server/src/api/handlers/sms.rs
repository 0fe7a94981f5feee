//! SMS handler
//!
//! Sends an organisation link to a cell number. Gateway failures are
//! swallowed and reported as `{"result": false}` so that a broken SMS
//! provider never turns into a request failure.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::state::AppState;
use crate::{Error, FieldError, Result};

#[derive(Debug, Deserialize)]
pub struct SendSmsPayload {
    pub cell_number: String,
    pub organisation_url: String,
    #[serde(default)]
    pub your_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendSmsResponse {
    pub result: bool,
}

/// Send an organisation link via SMS (POST /api/organisations/send-sms)
pub async fn send_sms(
    State(state): State<AppState>,
    Json(payload): Json<SendSmsPayload>,
) -> Result<Json<SendSmsResponse>> {
    let mut errors = Vec::new();
    if payload.cell_number.trim().is_empty() {
        errors.push(FieldError::new("cell_number", "a cell number is required"));
    }
    if url::Url::parse(&payload.organisation_url).is_err() {
        errors.push(FieldError::new("organisation_url", "a valid URL is required"));
    }
    if !errors.is_empty() {
        return Err(Error::InvalidRequest(errors));
    }

    let (message, analytics_label) = match payload.your_name.as_deref().filter(|n| !n.is_empty()) {
        Some(name) => (
            format!("{} has sent you a link: {}", name, payload.organisation_url),
            "send",
        ),
        None => (
            format!("You have sent yourself a link: {}", payload.organisation_url),
            "save",
        ),
    };

    let result = match state.sms.send_text(&payload.cell_number, &message).await {
        Ok(()) => true,
        Err(error) => {
            tracing::error!(%error, "Failed to send SMS");
            false
        }
    };

    state.analytics.send_event(
        "/api/organisations/send-sms",
        "SMS",
        &payload.organisation_url,
        analytics_label,
    );

    Ok(Json(SendSmsResponse { result }))
}

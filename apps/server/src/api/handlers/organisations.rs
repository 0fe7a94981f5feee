//! Organisation handlers
//!
//! Detail retrieval plus the two feedback endpoints (incorrect-information
//! reports and ratings). Feedback writes return 201 with the stored record.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::models::{IncorrectInformationReport, Organisation, OrganisationRating, Rating};
use crate::state::AppState;
use crate::{Error, Result};

/// Retrieve organisation details (GET /api/organisations/:id)
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Organisation>> {
    let organisation = state
        .store
        .organisation(id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("organisation {id}")))?;

    state.analytics.send_event(
        &format!("/api/organisations/{id}"),
        "View",
        "Organisation",
        &organisation.name,
    );

    Ok(Json(organisation))
}

#[derive(Debug, Deserialize)]
pub struct ReportPayload {
    #[serde(default)]
    pub contact_details: Option<bool>,
    #[serde(default)]
    pub address: Option<bool>,
    #[serde(default)]
    pub trading_hours: Option<bool>,
    #[serde(default)]
    pub other: Option<bool>,
    #[serde(default)]
    pub other_detail: Option<String>,
}

/// Report incorrect information (POST /api/organisations/:id/report)
pub async fn report_incorrect_information(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ReportPayload>,
) -> Result<(StatusCode, Json<IncorrectInformationReport>)> {
    let organisation = state
        .store
        .organisation(id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("organisation {id}")))?;

    let report = IncorrectInformationReport {
        organisation_id: id,
        reported_at: Utc::now(),
        contact_details: payload.contact_details,
        address: payload.address,
        trading_hours: payload.trading_hours,
        other: payload.other,
        other_detail: payload.other_detail,
    };

    state.store.add_report(report.clone()).await?;

    state.analytics.send_event(
        &format!("/api/organisations/{id}/report"),
        "Feedback",
        "OrganisationIncorrectInformationReport",
        &organisation.name,
    );

    Ok((StatusCode::CREATED, Json(report)))
}

#[derive(Debug, Deserialize)]
pub struct RatingPayload {
    pub rating: Rating,
}

/// Rate the quality of an organisation (POST /api/organisations/:id/rate)
pub async fn rate(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<RatingPayload>,
) -> Result<(StatusCode, Json<OrganisationRating>)> {
    let organisation = state
        .store
        .organisation(id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("organisation {id}")))?;

    let rating = OrganisationRating {
        organisation_id: id,
        rated_at: Utc::now(),
        rating: payload.rating,
    };

    state.store.add_rating(rating.clone()).await?;

    state.analytics.send_event(
        &format!("/api/organisations/{id}/rate"),
        "Feedback",
        "OrganisationRating",
        &organisation.name,
    );

    Ok((StatusCode::CREATED, Json(rating)))
}

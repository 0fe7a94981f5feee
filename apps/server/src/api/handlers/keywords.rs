//! Keyword and home-page grouping handlers

use axum::{
    extract::{RawQuery, State},
    Json,
};

use crate::models::{CategoryKeywordGroup, Keyword};
use crate::state::AppState;
use crate::Result;

/// Keywords grouped by category for the home page
/// (GET /api/home-page-groupings)
pub async fn home_page_groupings(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryKeywordGroup>>> {
    let groups = state.store.home_page_groupings().await?;
    Ok(Json(groups))
}

/// List keywords, optionally filtering by category name
/// (GET /api/keywords?category=X&show_on_home_page=true)
pub async fn list_keywords(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<Vec<Keyword>>> {
    let mut categories = Vec::new();
    let mut home_page_only = false;

    for (key, value) in url::form_urlencoded::parse(query.as_deref().unwrap_or("").as_bytes()) {
        match key.as_ref() {
            "category" => categories.push(value.into_owned()),
            "show_on_home_page" => {
                home_page_only = matches!(value.as_ref(), "true" | "1" | "yes");
            }
            _ => {}
        }
    }

    let keywords = state.store.keywords(&categories, home_page_only).await?;

    if let Some(first_category) = categories.first() {
        if !keywords.is_empty() {
            // Only the first category gets a tracking event: usually only
            // one is supplied, and the response must not wait on a burst of
            // tracking calls.
            state.analytics.send_event(
                "/api/keywords",
                "View",
                "KeywordsInCategory",
                first_category,
            );
        }
    }

    Ok(Json(keywords))
}

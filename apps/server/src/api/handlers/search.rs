//! Search endpoint
//!
//! `GET /api/search` — search organisations by free text and/or location.
//! With location coordinates the results come back ordered ascending by
//! distance; a radius additionally restricts how far away matches may be.
//!
//! Query parameters: `search_term`, `location` (`lat,lon`), `radius` (km),
//! `country` (ISO code), repeated `categories` (ids), `place_name`
//! (analytics only).

use axum::{
    extract::{RawQuery, State},
    Json,
};
use signpost_esquery::Point;

use crate::models::OrganisationSummary;
use crate::services::SearchRequest;
use crate::state::AppState;
use crate::{Error, FieldError, Result};

/// Raw parameters as they arrived, before validation.
#[derive(Debug, Default)]
struct RawSearchQuery {
    search_term: Option<String>,
    location: Option<String>,
    radius: Option<String>,
    country: Option<String>,
    categories: Vec<String>,
    place_name: Option<String>,
}

pub async fn search(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<Vec<OrganisationSummary>>> {
    let raw = collect_params(query.as_deref().unwrap_or(""));

    state.analytics.send_event(
        "/api/search",
        "Search",
        raw.search_term.as_deref().unwrap_or(""),
        raw.place_name.as_deref().unwrap_or(""),
    );

    let request = validate(raw)?;
    let results = state.search_service.search(&request).await?;

    Ok(Json(results))
}

fn collect_params(query: &str) -> RawSearchQuery {
    let mut raw = RawSearchQuery::default();

    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "search_term" => raw.search_term = Some(value.into_owned()),
            "location" => raw.location = Some(value.into_owned()),
            "radius" => raw.radius = Some(value.into_owned()),
            "country" => raw.country = Some(value.into_owned()),
            "categories" | "categories[]" => raw.categories.push(value.into_owned()),
            "place_name" => raw.place_name = Some(value.into_owned()),
            // Unknown parameters are ignored.
            _ => {}
        }
    }

    raw
}

fn validate(raw: RawSearchQuery) -> Result<SearchRequest> {
    let mut errors = Vec::new();

    let location = match raw.location.as_deref().filter(|v| !v.is_empty()) {
        Some(value) => match Point::parse(value) {
            Ok(point) => Some(point),
            Err(error) => {
                errors.push(FieldError::new("location", error.to_string()));
                None
            }
        },
        None => None,
    };

    let radius_km = match raw.radius.as_deref().filter(|v| !v.is_empty()) {
        Some(value) => match value.parse::<f64>() {
            Ok(km) if km > 0.0 && km.is_finite() => Some(km),
            _ => {
                errors.push(FieldError::new(
                    "radius",
                    "a valid positive number of kilometers is required",
                ));
                None
            }
        },
        None => None,
    };

    let country = match raw.country.filter(|v| !v.is_empty()) {
        Some(value) if value.len() >= 2 => Some(value),
        Some(_) => {
            errors.push(FieldError::new(
                "country",
                "an ISO code of at least 2 characters is required",
            ));
            None
        }
        None => None,
    };

    let mut categories = Vec::new();
    for value in &raw.categories {
        match value.parse::<i64>() {
            Ok(id) => categories.push(id),
            Err(_) => {
                errors.push(FieldError::new(
                    "categories",
                    format!("'{value}' is not a valid category id"),
                ));
            }
        }
    }

    if !errors.is_empty() {
        return Err(Error::InvalidRequest(errors));
    }

    Ok(SearchRequest {
        search_term: raw.search_term.filter(|v| !v.is_empty()),
        location,
        // Meaningless without a location; the service ignores it there.
        radius_km,
        country,
        categories,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_gathers_repeated_categories() {
        let raw = collect_params(
            "search_term=heart&location=-33.9%2C18.4&categories=1&categories=2&ignored=x",
        );
        assert_eq!(raw.search_term.as_deref(), Some("heart"));
        assert_eq!(raw.location.as_deref(), Some("-33.9,18.4"));
        assert_eq!(raw.categories, vec!["1", "2"]);
    }

    #[test]
    fn validate_accepts_a_full_request() {
        let raw = collect_params("search_term=heart&location=-33.9,18.4&radius=5&country=ZA&categories=1");
        let request = validate(raw).unwrap();

        assert_eq!(request.search_term.as_deref(), Some("heart"));
        assert_eq!(request.location, Some(Point::new(-33.9, 18.4).unwrap()));
        assert_eq!(request.radius_km, Some(5.0));
        assert_eq!(request.country.as_deref(), Some("ZA"));
        assert_eq!(request.categories, vec![1]);
    }

    #[test]
    fn validate_collects_every_field_error() {
        let raw = collect_params("location=nowhere&radius=-2&country=Z&categories=abc");
        let Err(Error::InvalidRequest(errors)) = validate(raw) else {
            panic!("expected a field error list");
        };

        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["location", "radius", "country", "categories"]);
    }

    #[test]
    fn validate_keeps_radius_without_location() {
        // The invariant is enforced downstream: the service ignores a radius
        // that has no location to anchor it.
        let raw = collect_params("radius=5");
        let request = validate(raw).unwrap();
        assert_eq!(request.radius_km, Some(5.0));
        assert!(request.location.is_none());
    }
}

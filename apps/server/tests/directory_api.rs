//! Directory browsing and feedback endpoints.

mod support;

use axum::http::StatusCode;
use serde_json::json;
use signpost::models::{Category, Keyword};
use support::{organisation, seed_cape_town, TestApp};

async fn seed_catalogue(app: &TestApp) {
    app.store
        .insert_category(Category {
            id: 1,
            name: "Health Services".to_string(),
            show_on_home_page: true,
        })
        .await;
    app.store
        .insert_category(Category {
            id: 2,
            name: "Legal Aid".to_string(),
            show_on_home_page: false,
        })
        .await;

    app.store
        .insert_keyword(Keyword {
            id: 1,
            name: "hiv".to_string(),
            show_on_home_page: true,
            categories: vec![1],
        })
        .await;
    app.store
        .insert_keyword(Keyword {
            id: 2,
            name: "trauma".to_string(),
            show_on_home_page: false,
            categories: vec![1],
        })
        .await;
    app.store
        .insert_keyword(Keyword {
            id: 3,
            name: "eviction".to_string(),
            show_on_home_page: true,
            categories: vec![2],
        })
        .await;
}

#[tokio::test]
async fn home_page_groupings_list_flagged_categories_with_flagged_keywords() {
    let app = TestApp::new();
    seed_catalogue(&app).await;

    let (status, body) = app.get("/api/home-page-groupings").await;

    assert_eq!(status, StatusCode::OK);
    let groups = body.as_array().expect("group list");
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["name"], "Health Services");
    assert_eq!(groups[0]["keywords"], json!(["hiv"]));
}

#[tokio::test]
async fn keywords_filter_by_category_and_home_page_flag() {
    let app = TestApp::new();
    seed_catalogue(&app).await;

    let (status, body) = app.get("/api/keywords").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().expect("keyword list").len(), 3);

    let (status, body) = app.get("/api/keywords?category=Health%20Services").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .expect("keyword list")
        .iter()
        .map(|k| k["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["hiv", "trauma"]);

    let (status, body) = app.get("/api/keywords?show_on_home_page=true").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().expect("keyword list").len(), 2);
}

#[tokio::test]
async fn organisation_detail_round_trips_and_404s() {
    let app = TestApp::new();
    seed_cape_town(&app).await;

    let (status, body) = app.get("/api/organisations/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Kingsbury Hospital Claremont");
    assert_eq!(body["country"]["iso_code"], "ZA");
    assert_eq!(body["location"]["lat"], -33.986375);

    let (status, _) = app.get("/api/organisations/404").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn incorrect_information_report_is_stored() {
    let app = TestApp::new();
    app.seed_organisation(organisation(7, "Test Clinic", &["test"], -33.9, 18.4))
        .await;

    let (status, body) = app
        .post_json(
            "/api/organisations/7/report",
            json!({ "address": true, "other": true, "other_detail": "Closed down" }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["organisation_id"], 7);
    assert_eq!(body["address"], true);
    assert_eq!(body["contact_details"], json!(null));

    let reports = app.store.reports().await;
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].other_detail.as_deref(), Some("Closed down"));

    let (status, _) = app
        .post_json("/api/organisations/404/report", json!({ "address": true }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn ratings_are_stored() {
    let app = TestApp::new();
    app.seed_organisation(organisation(7, "Test Clinic", &["test"], -33.9, 18.4))
        .await;

    let (status, body) = app
        .post_json("/api/organisations/7/rate", json!({ "rating": "good" }))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["rating"], "good");

    let ratings = app.store.ratings().await;
    assert_eq!(ratings.len(), 1);
    assert_eq!(ratings[0].organisation_id, 7);

    let (status, _) = app
        .post_json("/api/organisations/404/rate", json!({ "rating": "poor" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sms_failure_degrades_to_result_false() {
    // No gateway configured: sending fails, the endpoint still succeeds.
    let app = TestApp::new();

    let (status, body) = app
        .post_json(
            "/api/organisations/send-sms",
            json!({
                "cell_number": "+27820000000",
                "organisation_url": "https://directory.example.org/organisations/7",
                "your_name": "Thandi",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], false);
}

#[tokio::test]
async fn sms_payload_is_validated() {
    let app = TestApp::new();

    let (status, body) = app
        .post_json(
            "/api/organisations/send-sms",
            json!({ "cell_number": " ", "organisation_url": "not a url" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["errors"].as_object().expect("per-field error map");
    assert!(errors.contains_key("cell_number"));
    assert!(errors.contains_key("organisation_url"));
}

#[tokio::test]
async fn health_check_responds() {
    let app = TestApp::new();
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

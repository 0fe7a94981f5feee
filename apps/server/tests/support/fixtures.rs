//! Shared fixtures: the three Cape Town organisations used by the
//! end-to-end search scenarios, at increasing distances from Adderley
//! Street outside Cape Town station.

use signpost::models::{Category, Country, Keyword, Organisation};
use signpost_esquery::Point;

use super::TestApp;

/// Adderley Street, outside Cape Town station.
pub const ADDERLEY_STREET: &str = "-33.921387,18.424101";

pub fn south_africa() -> Country {
    Country {
        id: 1,
        name: "South Africa".to_string(),
        iso_code: "ZA".to_string(),
    }
}

pub fn health_category() -> Category {
    Category {
        id: 1,
        name: "Health Services".to_string(),
        show_on_home_page: true,
    }
}

pub fn organisation(id: i64, name: &str, keywords: &[&str], lat: f64, lon: f64) -> Organisation {
    Organisation {
        id,
        name: name.to_string(),
        about: String::new(),
        address: format!("{name}, Cape Town"),
        telephone: String::new(),
        emergency_telephone: String::new(),
        email: String::new(),
        web: String::new(),
        verified_as: String::new(),
        age_range_min: None,
        age_range_max: None,
        opening_hours: String::new(),
        country: south_africa(),
        location: Point::new(lat, lon).expect("fixture coordinates"),
        categories: vec![health_category()],
        keywords: keywords
            .iter()
            .enumerate()
            .map(|(i, name)| Keyword {
                id: id * 10 + i as i64,
                name: name.to_string(),
                show_on_home_page: false,
                categories: vec![1],
            })
            .collect(),
        facility_code: String::new(),
    }
}

/// Seed the three hospitals, nearest to farthest from Adderley Street.
pub async fn seed_cape_town(app: &TestApp) {
    app.seed_organisation(organisation(
        1,
        "Netcare Christiaan Barnard Memorial Hospital",
        &["test", "heart", "transplant"],
        -33.921859,
        18.418231,
    ))
    .await;

    app.seed_organisation(organisation(
        2,
        "Kingsbury Hospital Claremont",
        &["test", "hiv", "aids"],
        -33.986375,
        18.469060,
    ))
    .await;

    app.seed_organisation(organisation(
        3,
        "Constantiaberg Medi Clinic",
        &["test", "trauma", "accident"],
        -34.026629,
        18.461260,
    ))
    .await;
}

//! Domain models for the directory

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use signpost_esquery::Point;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub id: i64,
    pub name: String,
    /// ISO country code.
    pub iso_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub show_on_home_page: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub show_on_home_page: bool,
    /// Ids of the categories this keyword belongs to.
    #[serde(default)]
    pub categories: Vec<i64>,
}

/// A directory entry: a clinic or other service provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organisation {
    pub id: i64,
    pub name: String,

    #[serde(default)]
    pub about: String,

    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub telephone: String,
    #[serde(default)]
    pub emergency_telephone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub web: String,

    #[serde(default)]
    pub verified_as: String,

    #[serde(default)]
    pub age_range_min: Option<u16>,
    #[serde(default)]
    pub age_range_max: Option<u16>,

    #[serde(default)]
    pub opening_hours: String,

    pub country: Country,

    pub location: Point,

    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub keywords: Vec<Keyword>,

    #[serde(default)]
    pub facility_code: String,
}

/// The search result shape: a summary plus an optional distance annotation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrganisationSummary {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub keywords: Vec<String>,
    /// Formatted as `"X.XXkm"`; `null` when no geo sort ran.
    pub distance: Option<String>,
}

impl OrganisationSummary {
    pub fn from_organisation(organisation: &Organisation, distance: Option<String>) -> Self {
        Self {
            id: organisation.id,
            name: organisation.name.clone(),
            address: organisation.address.clone(),
            keywords: organisation
                .keywords
                .iter()
                .map(|keyword| keyword.name.clone())
                .collect(),
            distance,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Poor,
    Average,
    Good,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrganisationRating {
    pub organisation_id: i64,
    pub rated_at: DateTime<Utc>,
    pub rating: Rating,
}

/// A user report that an organisation's listed details are wrong.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncorrectInformationReport {
    pub organisation_id: i64,
    pub reported_at: DateTime<Utc>,
    pub contact_details: Option<bool>,
    pub address: Option<bool>,
    pub trading_hours: Option<bool>,
    pub other: Option<bool>,
    pub other_detail: Option<String>,
}

/// A home-page grouping: one category and its flagged keywords.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryKeywordGroup {
    pub name: String,
    pub keywords: Vec<String>,
}

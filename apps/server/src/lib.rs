//! Signpost - a geo-aware service directory
//!
//! An HTTP API over a query-construction core:
//! - Organisations tagged with categories and keywords, geolocated
//! - Search by free-text relevance, category, country, distance and radius
//! - Structured requests compiled into search-engine query documents
//! - Best-effort analytics and SMS notification side channels

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod state;
pub mod store;

pub use config::Config;
pub use error::{Error, FieldError, Result};
pub use state::AppState;

//! Configuration loading and validation
//!
//! Configuration is layered: an optional TOML file (path from
//! `SIGNPOST_CONFIG`, default `signpost.toml`), then `SIGNPOST__*`
//! environment variables with `__` separating section and key
//! (e.g. `SIGNPOST__SERVER__PORT=8080`). Every section has serde defaults so
//! a bare environment starts a working development server.
//!
//! Search tunables become an explicit [`CompilerSettings`] struct handed to
//! the query compiler; nothing reads them ambiently after startup.

use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Deserialize;
use signpost_esquery::{BoolOperator, CompilerSettings};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub engine: EngineConfig,
    pub search: SearchConfig,
    pub directory: DirectoryConfig,
    pub analytics: AnalyticsConfig,
    pub sms: SmsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins; empty means no CORS headers are emitted.
    pub cors_origins: Vec<String>,
    pub max_request_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            cors_origins: Vec::new(),
            max_request_body_size: 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Base URL of the search engine.
    pub url: String,
    /// Index searched by the service.
    pub index: String,
    /// Bound on each engine round trip.
    pub timeout_seconds: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:9200".to_string(),
            index: "signpost".to_string(),
            timeout_seconds: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub content_field: String,
    pub geo_field: String,
    /// Boolean operator between free-text terms: "AND" or "OR".
    pub default_operator: String,
    pub fuzzy_min_sim: f64,
    pub fuzzy_max_expansions: u32,
    pub include_spelling: bool,
    pub limit_to_registered_types: bool,
    pub registered_types: Vec<String>,
    /// Maximum results returned per search.
    pub result_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            content_field: "text".to_string(),
            geo_field: "location".to_string(),
            default_operator: "AND".to_string(),
            fuzzy_min_sim: 0.5,
            fuzzy_max_expansions: 50,
            include_spelling: false,
            limit_to_registered_types: true,
            registered_types: vec![crate::services::search::ORGANISATION_TYPE.to_string()],
            result_limit: 20,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// JSON file the in-memory store is seeded from at startup.
    pub seed_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Measurement tracking id; absent disables analytics entirely.
    pub tracking_id: Option<String>,
    pub endpoint: String,
    pub client_id: String,
    pub timeout_seconds: u64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            tracking_id: None,
            endpoint: "https://www.google-analytics.com/collect".to_string(),
            client_id: "SIGNPOST-API".to_string(),
            timeout_seconds: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SmsConfig {
    /// Base URL of the SMS gateway; absent disables sending.
    pub api_url: Option<String>,
    pub account_key: Option<String>,
    pub conversation_key: Option<String>,
    pub api_token: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            account_key: None,
            conversation_key: None,
            api_token: None,
            timeout_seconds: 10,
        }
    }
}

impl SmsConfig {
    pub fn is_configured(&self) -> bool {
        self.api_url.is_some()
            && self.account_key.is_some()
            && self.conversation_key.is_some()
            && self.api_token.is_some()
    }

    fn is_partially_configured(&self) -> bool {
        let set = [
            self.api_url.is_some(),
            self.account_key.is_some(),
            self.conversation_key.is_some(),
            self.api_token.is_some(),
        ];
        set.iter().any(|v| *v) && !set.iter().all(|v| *v)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
    pub file_enabled: bool,
    pub file_directory: String,
    pub file_prefix: String,
    /// One of "daily", "hourly", "minutely", "never".
    pub file_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file_enabled: false,
            file_directory: "logs".to_string(),
            file_prefix: "signpost".to_string(),
            file_rotation: "daily".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the optional file and the environment.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let file = std::env::var("SIGNPOST_CONFIG").unwrap_or_else(|_| "signpost".to_string());

        let source = config::Config::builder()
            .add_source(config::File::with_name(&file).required(false))
            .add_source(
                config::Environment::with_prefix("SIGNPOST")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        Ok(source.try_deserialize()?)
    }

    /// Reject configurations that cannot produce a working service.
    pub fn validate(&self) -> Result<(), String> {
        url::Url::parse(&self.engine.url)
            .map_err(|e| format!("engine.url '{}' is not a valid URL: {e}", self.engine.url))?;

        if self.engine.index.is_empty() {
            return Err("engine.index must not be empty".to_string());
        }
        if self.engine.timeout_seconds == 0 {
            return Err("engine.timeout_seconds must be at least 1".to_string());
        }

        if !(0.0..=1.0).contains(&self.search.fuzzy_min_sim) || self.search.fuzzy_min_sim == 0.0 {
            return Err(format!(
                "search.fuzzy_min_sim must be in (0, 1], got {}",
                self.search.fuzzy_min_sim
            ));
        }
        if self.search.fuzzy_max_expansions == 0 {
            return Err("search.fuzzy_max_expansions must be at least 1".to_string());
        }
        if !["AND", "OR"].contains(&self.search.default_operator.to_uppercase().as_str()) {
            return Err(format!(
                "search.default_operator must be AND or OR, got '{}'",
                self.search.default_operator
            ));
        }
        if self.search.result_limit == 0 {
            return Err("search.result_limit must be at least 1".to_string());
        }

        if self.sms.is_partially_configured() {
            return Err(
                "sms configuration is incomplete: api_url, account_key, conversation_key and \
                 api_token must all be set (or all be unset)"
                    .to_string(),
            );
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.server.host, self.server.port).parse()?)
    }

    /// The compiler tunables as an explicit settings struct.
    pub fn compiler_settings(&self) -> CompilerSettings {
        let default_operator = if self.search.default_operator.eq_ignore_ascii_case("or") {
            BoolOperator::Or
        } else {
            BoolOperator::And
        };

        CompilerSettings {
            content_field: self.search.content_field.clone(),
            geo_field: self.search.geo_field.clone(),
            default_operator,
            fuzzy_min_sim: self.search.fuzzy_min_sim,
            fuzzy_max_expansions: self.search.fuzzy_max_expansions,
            include_spelling: self.search.include_spelling,
            limit_to_registered_types: self.search.limit_to_registered_types,
            registered_types: self.search.registered_types.clone(),
        }
    }
}

//! HTTP search backend
//!
//! Posts compiled query documents to the engine's `_search` endpoint. The
//! result-set size goes on the URL rather than into the document. Every
//! round trip is bounded by the configured timeout; transport failures,
//! timeouts and non-success responses all surface as
//! [`Error::SearchUnavailable`].

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use signpost_esquery::CompiledQuery;
use url::Url;

use crate::config::EngineConfig;
use crate::{Error, Result};

use super::{SearchBackend, SearchHit};

pub struct HttpSearchBackend {
    http: reqwest::Client,
    search_url: Url,
}

impl HttpSearchBackend {
    pub fn new(config: &EngineConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        let mut base: Url = config.url.parse()?;
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        let search_url = base.join(&format!("{}/_search", config.index))?;

        Ok(Self { http, search_url })
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    hits: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(rename = "_source")]
    source: RawSource,
    /// Sort keys; the first is the distance in km when a geo sort ran.
    #[serde(default)]
    sort: Vec<JsonValue>,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    doc_type: String,
    id: i64,
}

#[async_trait]
impl SearchBackend for HttpSearchBackend {
    async fn execute(&self, query: &CompiledQuery, limit: usize) -> Result<Vec<SearchHit>> {
        let mut url = self.search_url.clone();
        url.query_pairs_mut().append_pair("size", &limit.to_string());

        let response = self
            .http
            .post(url)
            .json(query.body())
            .send()
            .await
            .map_err(|e| Error::SearchUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::SearchUnavailable(format!(
                "engine returned {status}"
            )));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| Error::SearchUnavailable(format!("invalid engine response: {e}")))?;

        Ok(parsed
            .hits
            .hits
            .into_iter()
            .map(|hit| {
                let distance_km = hit
                    .sort
                    .first()
                    .and_then(JsonValue::as_f64)
                    .filter(|km| km.is_finite());
                SearchHit {
                    doc_type: hit.source.doc_type,
                    id: hit.source.id,
                    distance_km,
                }
            })
            .collect())
    }
}

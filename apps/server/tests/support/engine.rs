//! A stub search engine for integration tests.
//!
//! Interprets compiled query documents over a small set of indexed docs:
//! enough of the query grammar to cover what the service compiles
//! (query_string conjunctions, type/narrow/geo filters, geo-distance
//! sorting). Anything else panics so drift shows up as a test failure.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use signpost::engine::{SearchBackend, SearchHit};
use signpost::{Error, Result};
use signpost_esquery::{CompiledQuery, Point};

#[derive(Debug, Clone)]
pub struct IndexedDoc {
    pub id: i64,
    pub doc_type: String,
    /// Content-field text, matched word-by-word.
    pub text: String,
    pub category_ids: Vec<i64>,
    /// ISO country code.
    pub country: String,
    pub location: Point,
}

#[derive(Default)]
pub struct StubSearchEngine {
    docs: Mutex<Vec<IndexedDoc>>,
    unavailable: AtomicBool,
    last_query: Mutex<Option<JsonValue>>,
}

impl StubSearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self, doc: IndexedDoc) {
        self.docs.lock().unwrap().push(doc);
    }

    /// Make every subsequent call fail the way an unreachable engine would.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// The most recent compiled document this engine executed.
    pub fn last_query(&self) -> Option<JsonValue> {
        self.last_query.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchBackend for StubSearchEngine {
    async fn execute(&self, query: &CompiledQuery, limit: usize) -> Result<Vec<SearchHit>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(Error::SearchUnavailable("stub engine offline".to_string()));
        }

        let body = query.body().clone();
        *self.last_query.lock().unwrap() = Some(body.clone());

        let (base, filters) = split_query(&body["query"]);

        let docs = self.docs.lock().unwrap().clone();
        let mut matched: Vec<(IndexedDoc, Option<f64>)> = docs
            .into_iter()
            .filter(|doc| matches_base(&base, doc) && filters.iter().all(|f| matches_filter(f, doc)))
            .map(|doc| (doc, None))
            .collect();

        if let Some(geo) = body
            .get("sort")
            .and_then(|sort| sort.get(0))
            .and_then(|clause| clause.get("_geo_distance"))
        {
            let coords = geo["location"]
                .as_array()
                .expect("geo sort carries [lon, lat]");
            let anchor = Point::new(
                coords[1].as_f64().expect("lat"),
                coords[0].as_f64().expect("lon"),
            )
            .expect("valid anchor point");

            for (doc, distance) in &mut matched {
                *distance = Some(doc.location.haversine_km(&anchor));
            }
            matched.sort_by(|a, b| a.1.partial_cmp(&b.1).expect("finite distances"));
            if geo["order"] == "desc" {
                matched.reverse();
            }
        }

        matched.truncate(limit);

        Ok(matched
            .into_iter()
            .map(|(doc, distance_km)| SearchHit {
                doc_type: doc.doc_type,
                id: doc.id,
                distance_km,
            })
            .collect())
    }
}

/// Unwrap the optional `filtered` envelope into (base query, filter list).
fn split_query(query: &JsonValue) -> (JsonValue, Vec<JsonValue>) {
    match query.get("filtered") {
        Some(filtered) => {
            let base = filtered["query"].clone();
            let filter = &filtered["filter"];
            let filters = match filter.get("bool") {
                Some(group) => group["must"].as_array().expect("bool.must array").clone(),
                None => vec![filter.clone()],
            };
            (base, filters)
        }
        None => (query.clone(), Vec::new()),
    }
}

fn matches_base(base: &JsonValue, doc: &IndexedDoc) -> bool {
    if base.get("match_all").is_some() {
        return true;
    }
    let text = base["query_string"]["query"]
        .as_str()
        .expect("query_string clause");
    eval_query_string(text, doc)
}

fn matches_filter(filter: &JsonValue, doc: &IndexedDoc) -> bool {
    if let Some(terms) = filter.get("terms") {
        let allowed = terms["doc_type"].as_array().expect("doc_type terms");
        return allowed
            .iter()
            .any(|t| t.as_str() == Some(doc.doc_type.as_str()));
    }

    if let Some(geo) = filter.get("geo_distance") {
        let distance = geo["distance"].as_str().expect("distance literal");
        let km: f64 = distance
            .strip_suffix("km")
            .expect("km-suffixed literal")
            .parse()
            .expect("numeric distance");
        let center = Point::new(
            geo["location"]["lat"].as_f64().expect("lat"),
            geo["location"]["lon"].as_f64().expect("lon"),
        )
        .expect("valid center");
        return doc.location.haversine_km(&center) <= km;
    }

    if let Some(narrow) = filter.get("fquery") {
        let text = narrow["query"]["query_string"]["query"]
            .as_str()
            .expect("narrow query_string");
        return eval_query_string(text, doc);
    }

    panic!("unsupported filter in stub engine: {filter}");
}

/// Evaluate a compiled query string: a top-level AND of groups.
fn eval_query_string(query: &str, doc: &IndexedDoc) -> bool {
    split_top_level(query)
        .iter()
        .all(|group| eval_group(group.trim(), doc))
}

fn eval_group(group: &str, doc: &IndexedDoc) -> bool {
    if let Some(rest) = group.strip_prefix("categories:") {
        return quoted_values(rest)
            .iter()
            .filter_map(|v| v.parse::<i64>().ok())
            .any(|id| doc.category_ids.contains(&id));
    }

    if let Some(rest) = group.strip_prefix("country:") {
        return quoted_values(rest)
            .iter()
            .any(|v| v.eq_ignore_ascii_case(&doc.country));
    }

    // A content-field group: an AND of individual word matches.
    let inner = group
        .strip_prefix('(')
        .and_then(|g| g.strip_suffix(')'))
        .unwrap_or(group);
    inner.split(" AND ").all(|term| has_term(doc, term.trim()))
}

fn has_term(doc: &IndexedDoc, term: &str) -> bool {
    let term = term.trim_matches('"');
    let (term, prefix_match) = match term.strip_suffix('*') {
        Some(t) => (t, true),
        None => (term.strip_suffix('~').unwrap_or(term), false),
    };
    let term = term.to_lowercase();

    doc.text.to_lowercase().split_whitespace().any(|word| {
        if prefix_match {
            word.starts_with(&term)
        } else {
            word == term
        }
    })
}

/// Split on ` AND ` outside parentheses and quotes.
fn split_top_level(query: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut start = 0usize;
    let mut i = 0usize;
    let bytes = query.as_bytes();

    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                in_quotes = !in_quotes;
                i += 1;
            }
            b'(' if !in_quotes => {
                depth += 1;
                i += 1;
            }
            b')' if !in_quotes => {
                depth = depth.saturating_sub(1);
                i += 1;
            }
            b' ' if !in_quotes && depth == 0 && query[i..].starts_with(" AND ") => {
                parts.push(query[start..i].to_string());
                i += " AND ".len();
                start = i;
            }
            _ => i += 1,
        }
    }

    parts.push(query[start..].to_string());
    parts
}

fn quoted_values(fragment: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current: Option<String> = None;

    for c in fragment.chars() {
        match (c, current.as_mut()) {
            ('"', None) => current = Some(String::new()),
            ('"', Some(_)) => {
                if let Some(value) = current.take() {
                    values.push(value);
                }
            }
            (c, Some(value)) => value.push(c),
            _ => {}
        }
    }

    values
}

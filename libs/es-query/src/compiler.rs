//! Search request compilation.
//!
//! Translates a [`SearchPlan`] into the engine's query document: base query
//! clause, filter clauses (type restriction, narrowing queries, geo bounding
//! box, geo radius), sort clauses, facets, highlighting and spelling
//! suggestions. The compiled document targets the Elasticsearch 1.x query
//! grammar; in particular the geo-distance literal uses the `"{:.6}km"`
//! format introduced in 1.0 and filters combine under a `filtered` wrapper.

use serde::Serialize;
use serde_json::{json, Map, Value as JsonValue};

use crate::geo::BoundingBox;
use crate::input::Scalar;
use crate::plan::{SearchPlan, SortDirection, MATCH_ALL};

/// The indexed field carrying each document's entity type code.
pub const DOC_TYPE_FIELD: &str = "doc_type";

/// Default boolean operator between query terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOperator {
    And,
    Or,
}

impl BoolOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            BoolOperator::And => "AND",
            BoolOperator::Or => "OR",
        }
    }
}

/// Compiler tunables, fixed at startup and passed in explicitly.
#[derive(Debug, Clone)]
pub struct CompilerSettings {
    /// The designated default content field.
    pub content_field: String,

    /// The indexed geo-point field used by distance sorts and geo filters.
    pub geo_field: String,

    /// Boolean operator between free-text terms.
    pub default_operator: BoolOperator,

    /// Minimum similarity for fuzzy matching.
    pub fuzzy_min_sim: f64,

    /// Expansion limit for fuzzy matching.
    pub fuzzy_max_expansions: u32,

    /// Request term suggestions alongside results.
    pub include_spelling: bool,

    /// When no explicit types are given, restrict to `registered_types`.
    pub limit_to_registered_types: bool,

    /// Entity type codes the caller's result mapping can resolve.
    pub registered_types: Vec<String>,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            content_field: "text".to_string(),
            geo_field: "location".to_string(),
            default_operator: BoolOperator::And,
            fuzzy_min_sim: 0.5,
            fuzzy_max_expansions: 50,
            include_spelling: false,
            limit_to_registered_types: true,
            registered_types: Vec::new(),
        }
    }
}

/// The full query document sent to the engine.
///
/// Built once per request and never mutated after hand-off.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CompiledQuery {
    body: JsonValue,
}

impl CompiledQuery {
    pub fn body(&self) -> &JsonValue {
        &self.body
    }

    pub fn into_body(self) -> JsonValue {
        self.body
    }
}

/// Compile a search plan into the engine's query document.
pub fn compile(plan: &SearchPlan, settings: &CompilerSettings) -> CompiledQuery {
    let base_query = if plan.query == MATCH_ALL {
        json!({ "match_all": {} })
    } else {
        json!({
            "query_string": {
                "default_field": settings.content_field,
                "default_operator": settings.default_operator.as_str(),
                "query": plan.query,
                "analyze_wildcard": true,
                "auto_generate_phrase_queries": true,
                "fuzzy_min_sim": settings.fuzzy_min_sim,
                "fuzzy_max_expansions": settings.fuzzy_max_expansions,
            }
        })
    };

    let filters = build_filters(plan, settings);

    let mut body = Map::new();
    body.insert("query".to_string(), wrap_filters(base_query, filters));

    if !plan.fields.is_empty() {
        body.insert("fields".to_string(), json!(plan.fields.join(" ")));
    }

    if !plan.sort.is_empty() {
        let clauses: Vec<JsonValue> = plan
            .sort
            .iter()
            .map(|spec| sort_clause(plan, settings, &spec.field, spec.direction))
            .collect();
        body.insert("sort".to_string(), JsonValue::Array(clauses));
    }

    if plan.highlight {
        let mut fields = Map::new();
        fields.insert(settings.content_field.clone(), json!({ "store": "yes" }));
        body.insert("highlight".to_string(), json!({ "fields": fields }));
    }

    if settings.include_spelling {
        let text = plan.spelling_query.as_deref().unwrap_or(&plan.query);
        body.insert(
            "suggest".to_string(),
            json!({
                "suggest": {
                    "text": text,
                    "term": {
                        // Suggesting against the content field would surface
                        // stemmed words.
                        "field": "_all",
                    },
                },
            }),
        );
    }

    if let Some(facets) = build_facets(plan) {
        body.insert("facets".to_string(), JsonValue::Object(facets));
    }

    CompiledQuery {
        body: JsonValue::Object(body),
    }
}

fn sort_clause(
    plan: &SearchPlan,
    settings: &CompilerSettings,
    field: &str,
    direction: SortDirection,
) -> JsonValue {
    if field == "distance" {
        if let Some(point) = plan.distance_point {
            let mut clause = Map::new();
            clause.insert(settings.geo_field.clone(), json!([point.lon, point.lat]));
            clause.insert("order".to_string(), json!(direction.as_str()));
            clause.insert("unit".to_string(), json!("km"));
            return json!({ "_geo_distance": clause });
        }

        tracing::warn!(
            "sorting by distance requires a distance anchor point; \
             falling back to a plain field sort"
        );
    }

    let mut clause = Map::new();
    clause.insert(field.to_string(), json!({ "order": direction.as_str() }));
    JsonValue::Object(clause)
}

fn build_facets(plan: &SearchPlan) -> Option<Map<String, JsonValue>> {
    if plan.facets.is_empty() && plan.date_facets.is_empty() && plan.query_facets.is_empty() {
        return None;
    }

    let mut facets = Map::new();

    for (field, spec) in &plan.facets {
        let size = spec.size.unwrap_or(100).min(100);
        let mut options = Map::new();
        options.insert("terms".to_string(), json!({ "field": field, "size": size }));
        if spec.global_scope {
            options.insert("global".to_string(), json!(true));
        }
        if let Some(filter) = &spec.facet_filter {
            options.insert("facet_filter".to_string(), filter.clone());
        }
        facets.insert(field.clone(), JsonValue::Object(options));
    }

    for (field, spec) in &plan.date_facets {
        let mut window = Map::new();
        window.insert(
            field.clone(),
            json!({
                "from": Scalar::from(spec.start).to_engine_literal(),
                "to": Scalar::from(spec.end).to_engine_literal(),
            }),
        );
        facets.insert(
            field.clone(),
            json!({
                "date_histogram": {
                    "field": field,
                    "interval": spec.interval(),
                },
                "facet_filter": { "range": window },
            }),
        );
    }

    for (name, query) in &plan.query_facets {
        facets.insert(
            name.clone(),
            json!({
                "query": {
                    "query_string": { "query": query },
                },
            }),
        );
    }

    Some(facets)
}

fn build_filters(plan: &SearchPlan, settings: &CompilerSettings) -> Vec<JsonValue> {
    let mut filters = Vec::new();

    let type_choices = if !plan.types.is_empty() {
        let mut types = plan.types.clone();
        types.sort();
        types.dedup();
        types
    } else if settings.limit_to_registered_types {
        let mut types = settings.registered_types.clone();
        types.sort();
        types.dedup();
        types
    } else {
        Vec::new()
    };

    if !type_choices.is_empty() {
        let mut terms = Map::new();
        terms.insert(DOC_TYPE_FIELD.to_string(), json!(type_choices));
        filters.push(json!({ "terms": terms }));
    }

    for narrow in &plan.narrow_queries {
        filters.push(json!({
            "fquery": {
                "query": {
                    "query_string": { "query": narrow },
                },
                "_cache": true,
            },
        }));
    }

    if let Some(geo_box) = &plan.within {
        let bounds = BoundingBox::from_corners(geo_box.corner1, geo_box.corner2);
        let mut spec = Map::new();
        spec.insert(
            settings.geo_field.clone(),
            json!({
                "top_left": { "lat": bounds.north, "lon": bounds.west },
                "bottom_right": { "lat": bounds.south, "lon": bounds.east },
            }),
        );
        filters.push(json!({ "geo_bounding_box": spec }));
    }

    if let Some(radius) = &plan.dwithin {
        let mut spec = Map::new();
        // The decimal-with-unit literal is the >= 1.0 engine format.
        spec.insert("distance".to_string(), json!(format!("{:.6}km", radius.km)));
        spec.insert(
            settings.geo_field.clone(),
            json!({ "lat": radius.center.lat, "lon": radius.center.lon }),
        );
        filters.push(json!({ "geo_distance": spec }));
    }

    filters
}

/// Combine the base query with the accumulated filters.
///
/// Zero filters leaves the query bare; one or more require the engine's
/// explicit `filtered` wrapper, with multiple filters ANDed under a
/// `bool.must` group.
fn wrap_filters(base: JsonValue, mut filters: Vec<JsonValue>) -> JsonValue {
    if filters.is_empty() {
        return base;
    }

    let filter = if filters.len() == 1 {
        filters.remove(0)
    } else {
        json!({ "bool": { "must": filters } })
    };

    json!({
        "filtered": {
            "query": base,
            "filter": filter,
        },
    })
}

//! Search plan types consumed by the compiler.
//!
//! A [`SearchPlan`] is the normalized description of one search request:
//! query text, sorting, geo filters, facets and type restrictions. Facet and
//! narrowing collections are BTree-ordered so that identical plans always
//! compile to identical documents.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

use crate::geo::Point;

/// The universal wildcard: match everything.
pub const MATCH_ALL: &str = "*:*";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// A terms aggregation over one field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermsFacet {
    /// Bucket count; capped at 100 by the compiler.
    pub size: Option<u32>,
    /// Compute the facet over the whole index rather than the result set.
    pub global_scope: bool,
    /// Extra filter merged in at the facet level.
    pub facet_filter: Option<JsonValue>,
}

/// Histogram gap units. Month and year buckets never take a numeric
/// multiplier in the engine's interval syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateGap {
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl DateGap {
    pub fn unit(self) -> &'static str {
        match self {
            DateGap::Minute => "minute",
            DateGap::Hour => "hour",
            DateGap::Day => "day",
            DateGap::Week => "week",
            DateGap::Month => "month",
            DateGap::Year => "year",
        }
    }

    fn takes_amount(self) -> bool {
        !matches!(self, DateGap::Month | DateGap::Year)
    }
}

/// A date-histogram aggregation over one field, bounded to a window.
#[derive(Debug, Clone, PartialEq)]
pub struct DateFacet {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub gap_by: DateGap,
    pub gap_amount: u32,
}

impl DateFacet {
    /// The engine's interval literal: `"2w"`, `"day"`, `"month"`, ...
    ///
    /// Amounts other than 1 are prefixed to the unit's first letter, except
    /// for month/year where the engine rejects multipliers.
    pub(crate) fn interval(&self) -> String {
        let unit = self.gap_by.unit();
        if self.gap_amount != 1 && self.gap_by.takes_amount() {
            format!("{}{}", self.gap_amount, &unit[..1])
        } else {
            unit.to_string()
        }
    }
}

/// Restrict results to a bounding box spanned by two corner points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBox {
    pub corner1: Point,
    pub corner2: Point,
}

/// Restrict results to a radius around a center point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoRadius {
    pub center: Point,
    pub km: f64,
}

/// A normalized search request, ready for compilation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPlan {
    /// Query-language text; [`MATCH_ALL`] selects everything.
    pub query: String,

    /// Stored fields to return instead of the full document.
    pub fields: Vec<String>,

    /// Sort clauses in priority order. The field name `distance` is special:
    /// with a [`SearchPlan::distance_point`] it becomes a geo-distance sort.
    pub sort: Vec<SortSpec>,

    /// Request stored highlight fragments for the content field.
    pub highlight: bool,

    /// Alternate text for spelling suggestions (defaults to `query`).
    pub spelling_query: Option<String>,

    /// Terms facets by field name.
    pub facets: BTreeMap<String, TermsFacet>,

    /// Date-histogram facets by field name.
    pub date_facets: BTreeMap<String, DateFacet>,

    /// Named query facets.
    pub query_facets: BTreeMap<String, String>,

    /// Independently cacheable sub-queries ANDed into the filter set.
    pub narrow_queries: BTreeSet<String>,

    /// Bounding-box restriction.
    pub within: Option<GeoBox>,

    /// Radius restriction.
    pub dwithin: Option<GeoRadius>,

    /// Anchor point for distance sorting.
    pub distance_point: Option<Point>,

    /// Explicit entity types to restrict to. Empty means "use the compiler
    /// settings' registered types" (when enabled).
    pub types: Vec<String>,
}

impl SearchPlan {
    /// A plan that matches every document.
    pub fn matching_all() -> Self {
        Self {
            query: MATCH_ALL.to_string(),
            ..Self::default()
        }
    }

    /// A plan for the given query-language text.
    pub fn for_query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }
}

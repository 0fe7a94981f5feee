//! Query-document construction for the Signpost directory service.
//!
//! This crate is the pure core of the search path: it knows how to render
//! individual filter conditions as query-language fragments and how to
//! compile a whole [`plan::SearchPlan`] into the query document the search
//! engine executes. It performs no I/O — executing the compiled document and
//! resolving hits back to directory entities is the server's job.
//!
//! The compiled documents target the Elasticsearch 1.x query grammar
//! (`filtered` wrappers, `fquery` filters, `facets`, and the `"{:.6}km"`
//! geo-distance literal introduced in 1.0). No other engine version is
//! supported.

pub mod compiler;
pub mod fragment;
pub mod geo;
pub mod input;
pub mod plan;

pub use compiler::{compile, BoolOperator, CompiledQuery, CompilerSettings, DOC_TYPE_FIELD};
pub use fragment::{build_fragment, Filter};
pub use geo::{BoundingBox, GeoError, Point};
pub use input::{Scalar, Term};
pub use plan::{
    DateFacet, DateGap, GeoBox, GeoRadius, SearchPlan, SortDirection, SortSpec, TermsFacet,
    MATCH_ALL,
};

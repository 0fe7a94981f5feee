//! Search service
//!
//! Orchestrates a search request end to end: build the query plan, compile
//! it, execute it against the engine, then resolve each hit back to its
//! organisation with a distance annotation.

use std::sync::Arc;

use signpost_esquery::{
    build_fragment, compile, CompiledQuery, CompilerSettings, Filter, GeoRadius, Point, Scalar,
    SearchPlan, SortDirection, SortSpec, Term,
};

use crate::engine::{SearchBackend, SearchHit};
use crate::models::OrganisationSummary;
use crate::store::DirectoryStore;
use crate::Result;

/// Entity type code for organisations in the search index.
pub const ORGANISATION_TYPE: &str = "organisation";

/// A validated search request.
///
/// Immutable once validation has produced it. The radius is only meaningful
/// together with a location; validation guarantees it is ignored otherwise.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchRequest {
    pub search_term: Option<String>,
    pub location: Option<Point>,
    pub radius_km: Option<f64>,
    pub country: Option<String>,
    pub categories: Vec<i64>,
}

pub struct SearchService {
    settings: CompilerSettings,
    result_limit: usize,
    backend: Arc<dyn SearchBackend>,
    store: Arc<dyn DirectoryStore>,
}

impl SearchService {
    pub fn new(
        settings: CompilerSettings,
        result_limit: usize,
        backend: Arc<dyn SearchBackend>,
        store: Arc<dyn DirectoryStore>,
    ) -> Self {
        Self {
            settings,
            result_limit,
            backend,
            store,
        }
    }

    /// Run a search end to end.
    pub async fn search(&self, request: &SearchRequest) -> Result<Vec<OrganisationSummary>> {
        let query = self.compile_request(request);
        let hits = self.backend.execute(&query, self.result_limit).await?;
        self.format_results(&hits).await
    }

    /// Compile a validated request into the engine's query document.
    pub fn compile_request(&self, request: &SearchRequest) -> CompiledQuery {
        let content = self.settings.content_field.as_str();
        let mut parts = Vec::new();

        if let Some(term) = request
            .search_term
            .as_deref()
            .filter(|term| !term.trim().is_empty())
        {
            parts.push(build_fragment(
                content,
                &Filter::Contains(Term::clean(term)),
                content,
            ));
        }

        if !request.categories.is_empty() {
            let candidates: Vec<Scalar> =
                request.categories.iter().map(|id| Scalar::from(*id)).collect();
            parts.push(build_fragment("categories", &Filter::In(candidates), content));
        }

        if let Some(country) = request.country.as_deref() {
            parts.push(build_fragment(
                "country",
                &Filter::Exact(Term::clean(country)),
                content,
            ));
        }

        let mut plan = if parts.is_empty() {
            SearchPlan::matching_all()
        } else {
            SearchPlan::for_query(parts.join(" AND "))
        };

        if let Some(location) = request.location {
            plan.distance_point = Some(location);
            plan.sort = vec![SortSpec::new("distance", SortDirection::Asc)];

            if let Some(km) = request.radius_km {
                plan.dwithin = Some(GeoRadius {
                    center: location,
                    km,
                });
            }
        } else if request.radius_km.is_some() {
            tracing::debug!("ignoring radius filter without a location");
        }

        compile(&plan, &self.settings)
    }

    /// Resolve hits to organisations, preserving engine order.
    ///
    /// A hit referencing a missing organisation means the index has diverged
    /// from storage; it is skipped rather than failing the whole request.
    async fn format_results(&self, hits: &[SearchHit]) -> Result<Vec<OrganisationSummary>> {
        let mut summaries = Vec::with_capacity(hits.len());

        for hit in hits {
            if hit.doc_type != ORGANISATION_TYPE {
                tracing::warn!(
                    doc_type = %hit.doc_type,
                    id = hit.id,
                    "skipping hit with an unresolvable entity type"
                );
                continue;
            }

            let Some(organisation) = self.store.organisation(hit.id).await? else {
                tracing::warn!(
                    id = hit.id,
                    "search index references a missing organisation; \
                     the index is likely out of sync with storage"
                );
                continue;
            };

            let distance = hit
                .distance_km
                .filter(|km| km.is_finite())
                .map(|km| format!("{km:.2}km"));

            summaries.push(OrganisationSummary::from_organisation(&organisation, distance));
        }

        Ok(summaries)
    }
}

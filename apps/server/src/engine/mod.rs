//! Search engine seam
//!
//! The engine executes compiled query documents and returns ranked hits.
//! Query execution, indexing and fuzzy matching internals all live on the
//! other side of this trait; the service only compiles documents and
//! resolves the hits that come back.

use async_trait::async_trait;
use signpost_esquery::CompiledQuery;

use crate::Result;

mod elastic;
pub use elastic::HttpSearchBackend;

/// One ranked hit from the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// Entity type code carried in the indexed document.
    pub doc_type: String,
    /// Backing entity id.
    pub id: i64,
    /// Kilometers from the distance anchor; present only when the query
    /// sorted by distance.
    pub distance_km: Option<f64>,
}

#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Execute a compiled query, returning at most `limit` ranked hits.
    ///
    /// An unreachable or failing engine must surface as
    /// [`crate::Error::SearchUnavailable`], never as an empty result set.
    async fn execute(&self, query: &CompiledQuery, limit: usize) -> Result<Vec<SearchHit>>;
}

//! Storage seam for directory entities
//!
//! Persistent relational storage is an external collaborator; the service
//! consumes it only through this trait. Any backend (PostgreSQL, an HTTP
//! proxy, in-memory) can implement it. [`MemoryStore`] is the bundled
//! implementation used for development and tests.

use async_trait::async_trait;

use crate::models::{
    CategoryKeywordGroup, IncorrectInformationReport, Keyword, Organisation, OrganisationRating,
};
use crate::Result;

mod memory;
pub use memory::MemoryStore;

#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Look up one organisation by id.
    ///
    /// Returns `Ok(None)` when no such organisation exists.
    async fn organisation(&self, id: i64) -> Result<Option<Organisation>>;

    /// Categories flagged for the home page, each with its flagged keywords.
    ///
    /// Categories with no matching keywords are omitted.
    async fn home_page_groupings(&self) -> Result<Vec<CategoryKeywordGroup>>;

    /// List keywords, optionally restricted to category names and/or the
    /// home-page flag.
    async fn keywords(&self, category_names: &[String], home_page_only: bool)
        -> Result<Vec<Keyword>>;

    /// File an incorrect-information report against an organisation.
    async fn add_report(&self, report: IncorrectInformationReport) -> Result<()>;

    /// Record a rating against an organisation.
    async fn add_rating(&self, rating: OrganisationRating) -> Result<()>;
}

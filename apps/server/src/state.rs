//! Shared application state

use std::sync::Arc;

use crate::config::Config;
use crate::engine::SearchBackend;
use crate::services::{AnalyticsClient, SearchService, SmsSender};
use crate::store::DirectoryStore;

/// Cloneable handle to everything a handler needs.
///
/// All contents are read-only after startup; clones share the same Arcs.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn DirectoryStore>,
    pub search_service: Arc<SearchService>,
    pub analytics: Arc<AnalyticsClient>,
    pub sms: Arc<SmsSender>,
}

impl AppState {
    /// Wire up state from configuration plus the store and engine seams.
    pub fn new(
        config: Config,
        store: Arc<dyn DirectoryStore>,
        backend: Arc<dyn SearchBackend>,
    ) -> anyhow::Result<Self> {
        let analytics = Arc::new(AnalyticsClient::new(&config.analytics)?);
        let sms = Arc::new(SmsSender::new(&config.sms)?);

        let search_service = Arc::new(SearchService::new(
            config.compiler_settings(),
            config.search.result_limit,
            backend,
            store.clone(),
        ));

        Ok(Self {
            config: Arc::new(config),
            store,
            search_service,
            analytics,
            sms,
        })
    }
}

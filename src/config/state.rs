// Application state module
// Shared, read-only state handed to every request handler

use std::sync::Arc;

use super::types::Config;
use crate::checker::PageChecker;
use crate::registry::UrlRegistry;
use crate::store::UrlRepository;

/// Application state
pub struct AppState {
    pub config: Config,
    pub registry: UrlRegistry,
    pub checker: PageChecker,
}

impl AppState {
    /// Wire the registry and checker to `store`
    pub fn new(config: Config, store: Arc<dyn UrlRepository>) -> Result<Self, reqwest::Error> {
        let registry = UrlRegistry::new(Arc::clone(&store), config.pagination.page_size);
        let checker = PageChecker::new(store, &config.checker.user_agent)?;

        Ok(Self {
            config,
            registry,
            checker,
        })
    }
}

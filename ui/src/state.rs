use std::sync::Arc;

use tokenview_business::{
    AppConfig, EhttpFetcher, FetchService, SessionBootstrap, TokenInventory,
};

use crate::widgets::ErrorBanner;

/// The main application state.
///
/// Session bootstrap and token inventory each own their in-flight request;
/// everything else is plain data the widgets read.
pub struct State {
    pub config: AppConfig,
    pub session: SessionBootstrap,
    pub inventory: TokenInventory,
    pub errors: ErrorBanner,
}

impl State {
    pub fn new(config: AppConfig, fetcher: Arc<dyn FetchService>) -> Self {
        Self {
            config,
            session: SessionBootstrap::new(fetcher.clone()),
            inventory: TokenInventory::new(fetcher),
            errors: ErrorBanner::default(),
        }
    }

    /// State wired to a server at `base_url`, used by integration tests.
    pub fn test(base_url: impl Into<String>) -> Self {
        Self::new(AppConfig::new(base_url), Arc::new(EhttpFetcher))
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new(AppConfig::from_env(), Arc::new(EhttpFetcher))
    }
}

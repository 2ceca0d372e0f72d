//! Dependencies of the ingredient manager.

use crate::search::DEFAULT_DEBOUNCE;
use larder_core::environment::HttpClient;
use larder_core::request::RequestEnvironment;
use larder_docstore::Collection;
use std::sync::Arc;
use std::time::Duration;

/// Environment for [`IngredientsReducer`](crate::IngredientsReducer)
#[derive(Clone)]
pub struct IngredientsEnvironment {
    /// Remote collection holding the ingredients
    pub collection: Collection,
    /// Quiet period before a filter change triggers a search
    pub debounce: Duration,
    /// HTTP access for both request trackers
    pub request: RequestEnvironment,
}

impl IngredientsEnvironment {
    /// Creates an environment with the default 500 ms debounce
    #[must_use]
    pub fn new(collection: Collection, http: Arc<dyn HttpClient>) -> Self {
        Self {
            collection,
            debounce: DEFAULT_DEBOUNCE,
            request: RequestEnvironment::new(http),
        }
    }

    /// Use a different debounce period
    #[must_use]
    pub const fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }
}

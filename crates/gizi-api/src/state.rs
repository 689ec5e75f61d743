//! Application state for the gizi API

use std::sync::Arc;

use gizi_core::{AnalysisStore, TokenResolver};
use gizi_predict::PredictorClient;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn AnalysisStore>,
    predictor: PredictorClient,
    tokens: Arc<TokenResolver>,
    /// Restrict DELETE to the caller's own analyses
    enforce_ownership: bool,
}

impl AppState {
    /// Create a new AppState. Ownership is not enforced on DELETE.
    pub fn new(
        store: Arc<dyn AnalysisStore>,
        predictor: PredictorClient,
        tokens: TokenResolver,
    ) -> Self {
        Self {
            store,
            predictor,
            tokens: Arc::new(tokens),
            enforce_ownership: false,
        }
    }

    /// Require DELETE targets to belong to the caller
    pub fn with_ownership_check(mut self, enforce: bool) -> Self {
        self.enforce_ownership = enforce;
        self
    }

    pub fn store(&self) -> &Arc<dyn AnalysisStore> {
        &self.store
    }

    pub fn predictor(&self) -> &PredictorClient {
        &self.predictor
    }

    pub fn tokens(&self) -> &TokenResolver {
        &self.tokens
    }

    pub fn enforce_ownership(&self) -> bool {
        self.enforce_ownership
    }
}

pub mod handlers;
pub mod routes;

use std::sync::Arc;

use crate::artifacts::Artifacts;
use crate::config::Config;
use crate::index::DistanceIndex;
use crate::predict::PricePredictor;
use crate::recommend::RecommendationEngine;
use crate::session::SessionManager;

/// Shared application state injected into all handlers via axum's State extractor.
#[derive(Clone)]
pub struct AppState {
    pub distance: Arc<DistanceIndex>,
    pub engine: Arc<RecommendationEngine>,
    pub sessions: Arc<SessionManager>,
    pub predictor: Option<Arc<dyn PricePredictor>>,
    pub config: Arc<Config>,
    pub fingerprint: u64,
}

impl AppState {
    pub fn new(artifacts: Artifacts, config: Config) -> Self {
        let distance = Arc::new(artifacts.distance);
        let engine = Arc::new(RecommendationEngine::new(Arc::new(artifacts.similarity)));
        let sessions = Arc::new(SessionManager::new(
            distance.clone(),
            engine.clone(),
            config.sessions.max_sessions,
        ));
        let predictor = artifacts
            .price_model
            .map(|m| Arc::new(m) as Arc<dyn PricePredictor>);

        Self {
            distance,
            engine,
            sessions,
            predictor,
            config: Arc::new(config),
            fingerprint: artifacts.fingerprint,
        }
    }
}

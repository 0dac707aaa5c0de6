use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub properties: usize,
    pub locations: usize,
    pub similarity_properties: usize,
    pub active_sessions: usize,
    pub price_model_loaded: bool,
    pub artifact_fingerprint: String,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        properties: state.distance.len(),
        locations: state.distance.location_count(),
        similarity_properties: state.engine.store().len(),
        active_sessions: state.sessions.len(),
        price_model_loaded: state.predictor.is_some(),
        artifact_fingerprint: format!("{:016x}", state.fingerprint),
    })
}

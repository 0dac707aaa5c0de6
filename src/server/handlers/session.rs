use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::metrics::{OperationTimer, RECOMMENDATIONS_TOTAL};
use crate::server::AppState;
use crate::session::SessionSummary;
use crate::types::{Recommendation, RecommendMode};

use super::search::{record_search, SearchResponse};
use super::{resolve_top_n, ApiError};

#[derive(Debug, Deserialize)]
pub struct SessionSearchRequest {
    pub location: String,
    pub radius_km: f64,
}

#[derive(Debug, Serialize)]
pub struct SessionSearchResponse {
    pub session: SessionSummary,
    #[serde(flatten)]
    pub search: SearchResponse,
}

#[derive(Debug, Serialize)]
pub struct CandidatesResponse {
    pub candidates: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SessionRecommendRequest {
    pub property: String,
    #[serde(default)]
    pub top_n: Option<usize>,
    #[serde(default)]
    pub mode: RecommendMode,
}

#[derive(Debug, Serialize)]
pub struct SessionRecommendResponse {
    pub property: String,
    pub mode: RecommendMode,
    pub results: Vec<Recommendation>,
}

pub async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionSummary>), ApiError> {
    let summary = state.sessions.create()?;
    Ok((StatusCode::CREATED, Json(summary)))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionSummary>, ApiError> {
    Ok(Json(state.sessions.get(&id)?))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.sessions.remove(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, req), fields(session = %id, location = %req.location, radius_km = req.radius_km))]
pub async fn session_search(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SessionSearchRequest>,
) -> Result<Json<SessionSearchResponse>, ApiError> {
    let timer = OperationTimer::start("search");
    let outcome = state.sessions.search(&id, &req.location, req.radius_km);
    record_search(&outcome);
    let hits = outcome?;
    timer.observe();

    info!(results = hits.len(), "session search complete");
    Ok(Json(SessionSearchResponse {
        session: state.sessions.get(&id)?,
        search: SearchResponse::new(req.location, req.radius_km, hits),
    }))
}

pub async fn session_candidates(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CandidatesResponse>, ApiError> {
    Ok(Json(CandidatesResponse {
        candidates: state.sessions.candidates(&id)?,
    }))
}

#[instrument(skip(state, req), fields(session = %id, property = %req.property))]
pub async fn session_recommend(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SessionRecommendRequest>,
) -> Result<Json<SessionRecommendResponse>, ApiError> {
    let top_n = resolve_top_n(
        req.top_n,
        state.config.ranking.default_top_n,
        state.config.server.max_top_n,
    )?;

    let timer = OperationTimer::start("recommend");
    let results = state
        .sessions
        .recommend(&id, &req.property, top_n, req.mode)?;
    timer.observe();

    let scope = match req.mode {
        RecommendMode::Universe => "universe",
        RecommendMode::WithinCandidates => "candidates",
    };
    RECOMMENDATIONS_TOTAL.with_label_values(&[scope]).inc();

    info!(top_n, results = results.len(), "session recommendation complete");
    Ok(Json(SessionRecommendResponse {
        property: req.property,
        mode: req.mode,
        results,
    }))
}

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::Result;
use crate::metrics::{OperationTimer, SEARCHES_TOTAL};
use crate::server::AppState;
use crate::types::{round2, SearchHit};

use super::ApiError;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub location: String,
    pub radius_km: f64,
}

#[derive(Debug, Serialize)]
pub struct SearchHitResponse {
    pub name: String,
    /// Rounded to two decimals.
    pub distance_km: f64,
}

impl From<SearchHit> for SearchHitResponse {
    fn from(hit: SearchHit) -> Self {
        Self {
            distance_km: round2(hit.distance_km()),
            name: hit.name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub location: String,
    pub radius_km: f64,
    pub count: usize,
    pub results: Vec<SearchHitResponse>,
}

impl SearchResponse {
    pub fn new(location: String, radius_km: f64, hits: Vec<SearchHit>) -> Self {
        Self {
            location,
            radius_km,
            count: hits.len(),
            results: hits.into_iter().map(Into::into).collect(),
        }
    }
}

/// Count a search outcome; hits and empty results are both successes.
pub(crate) fn record_search(outcome: &Result<Vec<SearchHit>>) {
    let label = match outcome {
        Ok(hits) if hits.is_empty() => "empty",
        Ok(_) => "hit",
        Err(_) => "error",
    };
    SEARCHES_TOTAL.with_label_values(&[label]).inc();
}

#[instrument(skip(state, params), fields(location = %params.location, radius_km = params.radius_km))]
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> std::result::Result<Json<SearchResponse>, ApiError> {
    let timer = OperationTimer::start("search");
    let outcome = state.distance.query(&params.location, params.radius_km);
    record_search(&outcome);
    let hits = outcome?;
    timer.observe();

    info!(results = hits.len(), "search complete");
    Ok(Json(SearchResponse::new(
        params.location,
        params.radius_km,
        hits,
    )))
}

pub async fn list_locations(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.distance.locations())
}

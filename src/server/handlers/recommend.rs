use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::metrics::{OperationTimer, RECOMMENDATIONS_TOTAL};
use crate::server::AppState;
use crate::types::{RankingScope, Recommendation};

use super::{resolve_top_n, ApiError};

#[derive(Debug, Deserialize)]
pub struct RecommendParams {
    pub property: String,
    #[serde(default)]
    pub top_n: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub property: String,
    pub scope: &'static str,
    pub results: Vec<Recommendation>,
}

#[instrument(skip(state, params), fields(property = %params.property))]
pub async fn recommend(
    State(state): State<AppState>,
    Query(params): Query<RecommendParams>,
) -> Result<Json<RecommendResponse>, ApiError> {
    let top_n = resolve_top_n(
        params.top_n,
        state.config.ranking.default_top_n,
        state.config.server.max_top_n,
    )?;

    let timer = OperationTimer::start("recommend");
    let scope = RankingScope::Universe;
    let results = state.engine.recommend(&params.property, top_n, scope)?;
    timer.observe();
    RECOMMENDATIONS_TOTAL
        .with_label_values(&[scope.label()])
        .inc();

    info!(top_n, results = results.len(), "recommendation complete");
    Ok(Json(RecommendResponse {
        property: params.property,
        scope: scope.label(),
        results,
    }))
}

use axum::extract::State;
use axum::Json;
use tracing::{info, instrument};

use crate::error::HearthError;
use crate::metrics::{OperationTimer, PREDICTIONS_TOTAL};
use crate::predict::{PredictOptions, PriceRange, PropertyDescription};
use crate::server::AppState;

use super::ApiError;

#[instrument(skip(state, description), fields(sector = %description.sector))]
pub async fn predict_price(
    State(state): State<AppState>,
    Json(description): Json<PropertyDescription>,
) -> Result<Json<PriceRange>, ApiError> {
    let predictor = state
        .predictor
        .as_ref()
        .ok_or(ApiError(HearthError::PredictorUnavailable))?;

    let timer = OperationTimer::start("predict");
    let range = predictor.price_range(&description)?;
    timer.observe();
    PREDICTIONS_TOTAL.inc();

    info!(low = range.low, high = range.high, "price predicted");
    Ok(Json(range))
}

pub async fn predict_options(
    State(state): State<AppState>,
) -> Result<Json<PredictOptions>, ApiError> {
    let predictor = state
        .predictor
        .as_ref()
        .ok_or(ApiError(HearthError::PredictorUnavailable))?;
    Ok(Json(predictor.options()))
}

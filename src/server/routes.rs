use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use super::handlers::{health, metrics, predict, recommend, search, session};
use super::AppState;

pub fn build_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.server.request_timeout_secs);
    let body_limit = state.config.server.max_body_bytes;

    Router::new()
        .route("/healthz", get(health::health_check))
        .route("/metrics", get(metrics::metrics_handler))
        .route("/v1/locations", get(search::list_locations))
        .route("/v1/search", get(search::search))
        .route("/v1/recommend", get(recommend::recommend))
        .route("/v1/sessions", post(session::create_session))
        .route(
            "/v1/sessions/:id",
            get(session::get_session).delete(session::delete_session),
        )
        .route("/v1/sessions/:id/search", post(session::session_search))
        .route(
            "/v1/sessions/:id/candidates",
            get(session::session_candidates),
        )
        .route(
            "/v1/sessions/:id/recommend",
            post(session::session_recommend),
        )
        .route("/v1/predict", post(predict::predict_price))
        .route("/v1/predict/options", get(predict::predict_options))
        .layer(TimeoutLayer::new(timeout))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

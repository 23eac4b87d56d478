use std::sync::Arc;

use axum::{Router, extract::Request, routing::get};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info_span;

use crate::state::AppState;

mod health;
mod repos;
mod root;
mod tags;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root::get))
        .route("/api/health", get(health::get))
        .route("/api/repos/{username}", get(repos::get::get))
        .route("/api/tags/{username}/{repo}", get(tags::get::get))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
                    let request_id = request
                        .extensions()
                        .get::<RequestId>()
                        .and_then(|id| id.header_value().to_str().ok())
                        .unwrap_or_default();

                    info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id
                    )
                }))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .with_state(state)
}

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use crate::hub::UpstreamError;

/// Errors surfaced by the API handlers.
///
/// Every variant renders as `500 {"error": "..."}`; only the message differs.
#[derive(Debug)]
pub(crate) enum ApiError {
    UpstreamRequestFailed {
        error: UpstreamError,
        verbose: bool,
    },
}

/// Renders an error and all of its causes on one line.
pub(crate) fn format_error(e: &(dyn std::error::Error + 'static)) -> String {
    let mut s = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        s.push_str(&format!(": {}", cause));
        source = cause.source();
    }
    s
}

impl ApiError {
    pub(crate) fn message(&self) -> String {
        match self {
            Self::UpstreamRequestFailed { error, verbose } if *verbose => format_error(error),
            Self::UpstreamRequestFailed { error, .. } => error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::UpstreamRequestFailed { error, .. } => {
                error!(
                    error = %format_error(error),
                    kind = error.kind(),
                    "Upstream request failed"
                );
            }
        }

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.message() })),
        )
            .into_response()
    }
}

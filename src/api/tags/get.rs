use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::{error::ApiError, hub::TagSummary, metrics::Endpoint, state::AppState};

#[derive(Debug, Deserialize)]
pub struct TagList {
    username: String,
    repo: String,
}

pub(crate) async fn get(
    Path(TagList { username, repo }): Path<TagList>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TagSummary>>, ApiError> {
    let result = state.hub.list_tags(&username, &repo).await;
    let tags = state.observe(Endpoint::Tags, result)?;

    Ok(Json(tags))
}

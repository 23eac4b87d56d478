use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::{error::ApiError, hub::RepositorySummary, metrics::Endpoint, state::AppState};

#[derive(Debug, Deserialize)]
pub struct RepositoryList {
    username: String,
}

pub(crate) async fn get(
    Path(RepositoryList { username }): Path<RepositoryList>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RepositorySummary>>, ApiError> {
    let result = state.hub.list_repositories(&username).await;
    let repositories = state.observe(Endpoint::Repositories, result)?;

    Ok(Json(repositories))
}

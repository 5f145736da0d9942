use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::models::profile::ProfileView;
use crate::state::AppState;

use super::HttpError;

pub fn router() -> Router<AppState> {
    Router::new().route("/users/{identifier}", get(get_profile))
}

async fn get_profile(
    Path(identifier): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ProfileView>, HttpError> {
    let profile = state.identity.get_profile(&identifier).await?;
    Ok(Json(profile))
}

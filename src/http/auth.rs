use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};

use crate::models::profile::{LoginRequest, ProfileView, RegisterRequest};
use crate::state::AppState;

use super::{HttpError, json_body};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ProfileView>), HttpError> {
    let request = json_body(payload)?;
    let profile = state.identity.register(request).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<ProfileView>, HttpError> {
    let request = json_body(payload)?;
    let profile = state.identity.login(&request.wallet_address).await?;
    Ok(Json(profile))
}

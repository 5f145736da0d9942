use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::models::interaction::{InteractionOutcome, InteractionRequest};
use crate::models::track::{CreateTrackRequest, TrackView};
use crate::state::AppState;

use super::{HttpError, json_body, path_param};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tracks", post(create_track))
        .route("/tracks/{track_id}", get(get_track))
        .route("/tracks/{track_id}/upvote", post(toggle_upvote))
        .route("/tracks/{track_id}/gem", post(give_gem))
}

async fn create_track(
    State(state): State<AppState>,
    payload: Result<Json<CreateTrackRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TrackView>), HttpError> {
    let request = json_body(payload)?;
    let track = state.tracks.create_track(request).await?;
    Ok((StatusCode::CREATED, Json(track)))
}

async fn get_track(
    track_id: Result<Path<i64>, PathRejection>,
    State(state): State<AppState>,
) -> Result<Json<TrackView>, HttpError> {
    let track_id = path_param("trackId", track_id)?;
    let track = state.tracks.get_track(track_id).await?;
    Ok(Json(track))
}

async fn toggle_upvote(
    track_id: Result<Path<i64>, PathRejection>,
    State(state): State<AppState>,
    payload: Result<Json<InteractionRequest>, JsonRejection>,
) -> Result<Json<InteractionOutcome>, HttpError> {
    let track_id = path_param("trackId", track_id)?;
    let request = json_body(payload)?;
    let outcome = state
        .tracks
        .toggle_upvote(&request.wallet_address, track_id)
        .await?;
    Ok(Json(outcome))
}

async fn give_gem(
    track_id: Result<Path<i64>, PathRejection>,
    State(state): State<AppState>,
    payload: Result<Json<InteractionRequest>, JsonRejection>,
) -> Result<Json<InteractionOutcome>, HttpError> {
    let track_id = path_param("trackId", track_id)?;
    let request = json_body(payload)?;
    let outcome = state
        .tracks
        .give_gem(&request.wallet_address, track_id)
        .await?;
    Ok(Json(outcome))
}

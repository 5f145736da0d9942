use std::time::Duration;

use anyhow::Result;
use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::Method;
use axum::http::StatusCode;
use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde::Serialize;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::CorsConfig;
use crate::error::ServiceError;
use crate::state::AppState;

mod auth;
mod tracks;
mod users;

pub fn router(state: AppState, cors_config: &CorsConfig) -> Result<Router> {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(cors_config.allowed_origin_values()?))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([ACCEPT, AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let api = Router::new()
        .route("/health", get(health_live))
        .route("/health/ready", get(health_ready))
        .merge(auth::router())
        .merge(users::router())
        .merge(tracks::router());

    Ok(Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state))
}

async fn health_live() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn health_ready(State(state): State<AppState>) -> Result<Json<ReadyResponse>, HttpError> {
    state.store.ping().await.map_err(|err| {
        error!("Store readiness check failed: {err:#}");
        HttpError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "Store unavailable".to_string(),
        )
    })?;

    let response = ReadyResponse {
        status: "ready",
        backend: state.store.backend(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        cached_profiles: state.cache.profiles.entry_count(),
    };
    Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReadyResponse {
    status: &'static str,
    backend: &'static str,
    uptime_seconds: u64,
    cached_profiles: u64,
}

/// Unwraps a JSON body, turning any extractor rejection into a 400.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, HttpError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(HttpError::new(
            StatusCode::BAD_REQUEST,
            "Invalid input data".to_string(),
        )
        .with_error("body", rejection.body_text())),
    }
}

/// Unwraps a path parameter, reporting a malformed one against `field`.
pub(crate) fn path_param<T>(
    field: &str,
    path: Result<Path<T>, PathRejection>,
) -> Result<T, HttpError> {
    match path {
        Ok(Path(value)) => Ok(value),
        Err(rejection) => Err(HttpError::new(
            StatusCode::BAD_REQUEST,
            "Invalid input data".to_string(),
        )
        .with_error(field, rejection.body_text())),
    }
}

#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    message: String,
    errors: Vec<FieldError>,
}

impl HttpError {
    pub fn new(status: StatusCode, message: String) -> Self {
        assert!(status != StatusCode::OK, "Error status cannot be 200");
        assert!(!message.is_empty(), "Error message cannot be empty");
        Self {
            status,
            message,
            errors: Vec::new(),
        }
    }

    fn with_error(mut self, field: &str, message: String) -> Self {
        self.errors.push(FieldError {
            field: field.to_string(),
            message,
        });
        self
    }
}

impl From<ServiceError> for HttpError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation { field, message } => {
                HttpError::new(StatusCode::BAD_REQUEST, "Invalid input data".to_string())
                    .with_error(field, message)
            }
            ServiceError::DuplicateUsername => HttpError::new(
                StatusCode::BAD_REQUEST,
                "Username already taken".to_string(),
            ),
            ServiceError::DuplicateWallet => HttpError::new(
                StatusCode::BAD_REQUEST,
                "Wallet address already registered".to_string(),
            ),
            ServiceError::UserNotFound => {
                HttpError::new(StatusCode::NOT_FOUND, "USER_NOT_FOUND".to_string())
            }
            ServiceError::TrackNotFound => {
                HttpError::new(StatusCode::NOT_FOUND, "Track not found".to_string())
            }
            ServiceError::GemAlreadyGiven => HttpError::new(
                StatusCode::CONFLICT,
                "Gem already given to this track".to_string(),
            ),
            ServiceError::GemAllowanceExhausted { .. } => {
                HttpError::new(StatusCode::BAD_REQUEST, "No gems remaining".to_string())
            }
            ServiceError::Internal(cause) => {
                error!("Internal error: {cause:#}");
                HttpError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        info!("HTTP error: {}", self.message);
        let body = Json(ErrorBody {
            message: self.message,
            errors: self.errors,
        });
        (self.status, body).into_response()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<FieldError>,
}

#[derive(Debug, Serialize)]
struct FieldError {
    field: String,
    message: String,
}

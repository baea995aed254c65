//! HTTP routes of the movies API.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use stratus_core::Error;
use tracing::{error, warn};

use crate::service::MovieService;

/// Build the router serving every route under `/api`.
pub fn router(service: MovieService) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/getmovies", get(get_movies))
        .route("/api/getmoviesbyyear", get(missing_year))
        .route("/api/getmoviesbyyear/", get(missing_year))
        .route("/api/getmoviesbyyear/{year}", get(get_movies_by_year))
        .route("/api/getmoviesummary", get(missing_movie_name))
        .route("/api/getmoviesummary/", get(missing_movie_name))
        .route("/api/getmoviesummary/{movie_name}", get(get_movie_summary))
        .with_state(service)
}

/// Error crossing the HTTP boundary.
#[derive(Debug)]
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            // Usage hints go back as plain text.
            Error::ValidationError(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            err => {
                let status = err.http_status();
                if err.should_log() || status.is_server_error() {
                    error!("request failed: {err}");
                } else {
                    warn!("request failed: {err}");
                }
                (status, Json(err.into_error_response())).into_response()
            }
        }
    }
}

fn json_body(body: String) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

async fn get_movies(State(service): State<MovieService>) -> Result<Response, ApiError> {
    Ok(json_body(service.list_movies().await?))
}

async fn get_movies_by_year(
    State(service): State<MovieService>,
    Path(year): Path<String>,
) -> Result<Response, ApiError> {
    Ok(json_body(service.movies_by_year(&year).await?))
}

// An empty last segment reaches the service as "" so it answers with the usage text.
async fn missing_year(State(service): State<MovieService>) -> Result<Response, ApiError> {
    Ok(json_body(service.movies_by_year("").await?))
}

async fn missing_movie_name(State(service): State<MovieService>) -> Result<Response, ApiError> {
    Ok(json_body(service.movie_summary("").await?))
}

async fn get_movie_summary(
    State(service): State<MovieService>,
    Path(movie_name): Path<String>,
) -> Result<Response, ApiError> {
    Ok(json_body(service.movie_summary(&movie_name).await?))
}

//! # Movie Handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use cinema_core::{Movie, MovieUpdate, NewMovie};
use tracing::info;

use crate::error::{ApiError, ApiJson, ApiPath};
use crate::AppState;

/// `POST /movies`
pub async fn create_movie(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewMovie>,
) -> Result<(StatusCode, Json<Movie>), ApiError> {
    let movie = state.db.movies().create(input).await?;
    info!(id = movie.id, title = %movie.title, "Movie created");
    Ok((StatusCode::CREATED, Json(movie)))
}

/// `GET /movies`
pub async fn list_movies(State(state): State<AppState>) -> Result<Json<Vec<Movie>>, ApiError> {
    Ok(Json(state.db.movies().find_all().await?))
}

/// `GET /movies/{id}`
pub async fn get_movie(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Movie>, ApiError> {
    Ok(Json(state.db.movies().find_one(id).await?))
}

/// `PUT /movies/{id}`
pub async fn update_movie(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(update): ApiJson<MovieUpdate>,
) -> Result<Json<Movie>, ApiError> {
    let movie = state.db.movies().update(id, update).await?;
    info!(id, "Movie updated");
    Ok(Json(movie))
}

/// `DELETE /movies/{id}`
pub async fn delete_movie(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    state.db.movies().delete(id).await?;
    info!(id, "Movie deleted");
    Ok(StatusCode::NO_CONTENT)
}

//! # Showtime Handlers
//!
//! Responses carry the resolved movie (`ShowtimeDetails`).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use cinema_core::{NewShowtime, ShowtimeDetails, ShowtimeUpdate, TicketDetails};
use tracing::info;

use crate::error::{ApiError, ApiJson, ApiPath};
use crate::AppState;

/// `POST /showtimes`
pub async fn create_showtime(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewShowtime>,
) -> Result<(StatusCode, Json<ShowtimeDetails>), ApiError> {
    let showtime = state.db.showtimes().create(input).await?;
    info!(
        id = showtime.showtime.id,
        theater = %showtime.showtime.theater,
        "Showtime scheduled"
    );
    Ok((StatusCode::CREATED, Json(showtime)))
}

/// `GET /showtimes`
pub async fn list_showtimes(
    State(state): State<AppState>,
) -> Result<Json<Vec<ShowtimeDetails>>, ApiError> {
    Ok(Json(state.db.showtimes().find_all().await?))
}

/// `GET /showtimes/{id}`
pub async fn get_showtime(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ShowtimeDetails>, ApiError> {
    Ok(Json(state.db.showtimes().find_one(id).await?))
}

/// `PUT /showtimes/{id}`
pub async fn update_showtime(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(update): ApiJson<ShowtimeUpdate>,
) -> Result<Json<ShowtimeDetails>, ApiError> {
    let showtime = state.db.showtimes().update(id, update).await?;
    info!(id, "Showtime updated");
    Ok(Json(showtime))
}

/// `DELETE /showtimes/{id}`
pub async fn delete_showtime(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    state.db.showtimes().delete(id).await?;
    info!(id, "Showtime deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /showtimes/{id}/tickets`
///
/// Empty list for a showtime without bookings, including unknown ids.
pub async fn list_showtime_tickets(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Vec<TicketDetails>>, ApiError> {
    Ok(Json(state.db.tickets().find_by_showtime(id).await?))
}

//! # Ticket Handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use cinema_core::{NewTicket, TicketDetails};
use tracing::info;

use crate::error::{ApiError, ApiJson, ApiPath};
use crate::AppState;

/// `POST /tickets`
pub async fn create_ticket(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewTicket>,
) -> Result<(StatusCode, Json<TicketDetails>), ApiError> {
    let ticket = state.db.tickets().create(input).await?;
    info!(
        id = ticket.ticket.id,
        showtime_id = ticket.ticket.showtime_id,
        seat = %ticket.ticket.seat_number,
        "Ticket booked"
    );
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// `GET /tickets`
pub async fn list_tickets(
    State(state): State<AppState>,
) -> Result<Json<Vec<TicketDetails>>, ApiError> {
    Ok(Json(state.db.tickets().find_all().await?))
}

/// `GET /tickets/{id}`
pub async fn get_ticket(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<TicketDetails>, ApiError> {
    Ok(Json(state.db.tickets().find_one(id).await?))
}

/// `DELETE /tickets/{id}`
pub async fn delete_ticket(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    state.db.tickets().delete(id).await?;
    info!(id, "Ticket cancelled");
    Ok(StatusCode::NO_CONTENT)
}

//! Router assembly.
//!
//! ## Routes
//! ```text
//! POST   /movies                  GET /movies            GET /movies/{id}
//! PUT    /movies/{id}             DELETE /movies/{id}
//! POST   /showtimes               GET /showtimes         GET /showtimes/{id}
//! PUT    /showtimes/{id}          DELETE /showtimes/{id}
//! GET    /showtimes/{id}/tickets
//! POST   /tickets                 GET /tickets           GET /tickets/{id}
//! DELETE /tickets/{id}
//! GET    /health                  GET /ready
//! ```

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{health, movie, showtime, ticket};
use crate::middleware::request_id_layer;
use crate::AppState;

/// Builds the application router with its middleware stack.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/movies", get(movie::list_movies).post(movie::create_movie))
        .route(
            "/movies/{id}",
            get(movie::get_movie)
                .put(movie::update_movie)
                .delete(movie::delete_movie),
        )
        .route(
            "/showtimes",
            get(showtime::list_showtimes).post(showtime::create_showtime),
        )
        .route(
            "/showtimes/{id}",
            get(showtime::get_showtime)
                .put(showtime::update_showtime)
                .delete(showtime::delete_showtime),
        )
        .route(
            "/showtimes/{id}/tickets",
            get(showtime::list_showtime_tickets),
        )
        .route("/tickets", get(ticket::list_tickets).post(ticket::create_ticket))
        .route(
            "/tickets/{id}",
            get(ticket::get_ticket).delete(ticket::delete_ticket),
        )
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .layer(TraceLayer::new_for_http())
        // Outermost, so the trace layer runs inside the request span
        .layer(request_id_layer())
        .with_state(state)
}

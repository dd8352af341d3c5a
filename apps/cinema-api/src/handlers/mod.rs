//! # HTTP Handlers
//!
//! One module per resource. Handlers stay thin: extract, call the store,
//! wrap the result. Every rule lives in the stores and `cinema-core`.
//!
//! | Module        | Routes                                        |
//! |---------------|-----------------------------------------------|
//! | [`movie`]     | `/movies`, `/movies/{id}`                     |
//! | [`showtime`]  | `/showtimes`, `/showtimes/{id}`, `.../tickets`|
//! | [`ticket`]    | `/tickets`, `/tickets/{id}`                   |
//! | [`health`]    | `/health`, `/ready`                           |

pub mod health;
pub mod movie;
pub mod showtime;
pub mod ticket;

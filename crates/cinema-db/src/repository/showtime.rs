//! # Showtime Repository
//!
//! Scheduling of screenings.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  create / update (under the write gate)                 │
//! │                                                                         │
//! │  1. Shape       theater length, price range, positive movie id         │
//! │  2. Reference   MovieLookup::find_movie         → 404 MovieNotFound    │
//! │  3. Window      start < end, at most 5 hours     → 400                  │
//! │  4. Overlap     SELECT same theater (minus self)                        │
//! │                 then intervals_overlap per row   → 409 ShowtimeOverlap  │
//! │  5. Write       INSERT / UPDATE                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The overlap scan is linear in the number of showtimes of one theater and
//! uses the `(theater, start_time)` index to find them.

use chrono::NaiveDateTime;
use cinema_core::schedule::intervals_overlap;
use cinema_core::{
    CoreError, Money, Movie, NewShowtime, Showtime, ShowtimeDetails, ShowtimeUpdate, TimeWindow,
};
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::DbResult;
use crate::pool::WriteGate;
use crate::repository::movie::MovieRepository;
use crate::repository::{MovieLookup, ShowtimeLookup};

const SELECT_SHOWTIME: &str =
    "SELECT id, movie_id, theater, start_time, end_time, price_cents FROM showtimes";

/// Showtime columns joined with their movie. Reused by the ticket queries.
pub(crate) const SHOWTIME_DETAILS_COLUMNS: &str = r#"
    s.id, s.movie_id, s.theater, s.start_time, s.end_time, s.price_cents,
    m.title, m.genre, m.duration, m.rating, m.release_year
"#;

/// One row of `showtimes JOIN movies`.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ShowtimeRow {
    id: i64,
    movie_id: i64,
    theater: String,
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
    price_cents: i64,
    title: String,
    genre: String,
    duration: i64,
    rating: f64,
    release_year: i32,
}

impl From<ShowtimeRow> for ShowtimeDetails {
    fn from(row: ShowtimeRow) -> Self {
        ShowtimeDetails {
            showtime: Showtime {
                id: row.id,
                movie_id: row.movie_id,
                theater: row.theater,
                start_time: row.start_time,
                end_time: row.end_time,
                price: Money::from_cents(row.price_cents),
            },
            movie: Movie {
                id: row.movie_id,
                title: row.title,
                genre: row.genre,
                duration: row.duration,
                rating: row.rating,
                release_year: row.release_year,
            },
        }
    }
}

/// Repository for showtime database operations.
///
/// Movie references are resolved through `M`, which is the movie store in
/// production.
#[derive(Debug, Clone)]
pub struct ShowtimeRepository<M = MovieRepository> {
    pool: SqlitePool,
    gate: WriteGate,
    movies: M,
}

impl<M: MovieLookup> ShowtimeRepository<M> {
    /// Creates a new showtime repository.
    pub fn new(pool: SqlitePool, gate: WriteGate, movies: M) -> Self {
        ShowtimeRepository { pool, gate, movies }
    }

    async fn require_movie(&self, movie_id: i64) -> DbResult<Movie> {
        self.movies
            .find_movie(movie_id)
            .await?
            .ok_or_else(|| CoreError::MovieNotFound(movie_id).into())
    }

    /// Schedules a showtime.
    ///
    /// ## Returns
    /// * `Ok(ShowtimeDetails)` - Stored showtime with its movie
    /// * `Err(Rule(MovieNotFound))` - Referenced movie doesn't exist
    /// * `Err(Rule(InvalidTimeWindow | ShowtimeTooLong))` - Bad window
    /// * `Err(Rule(ShowtimeOverlap))` - Theater already busy in that window
    pub async fn create(&self, input: NewShowtime) -> DbResult<ShowtimeDetails> {
        input.validate()?;
        let input = input.normalized();

        let _gate = self.gate.lock().await;

        let movie = self.require_movie(input.movie_id).await?;
        let window = input.window()?;
        self.ensure_free(&input.theater, &window, None).await?;

        debug!(
            movie_id = input.movie_id,
            theater = %input.theater,
            start = %window.start(),
            "Inserting showtime"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO showtimes (movie_id, theater, start_time, end_time, price_cents)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(input.movie_id)
        .bind(&input.theater)
        .bind(window.start())
        .bind(window.end())
        .bind(input.price.cents())
        .execute(&self.pool)
        .await?;

        Ok(ShowtimeDetails {
            showtime: Showtime {
                id: result.last_insert_rowid(),
                movie_id: input.movie_id,
                theater: input.theater,
                start_time: window.start(),
                end_time: window.end(),
                price: input.price,
            },
            movie,
        })
    }

    /// Lists all showtimes with their movies, in start order.
    pub async fn find_all(&self) -> DbResult<Vec<ShowtimeDetails>> {
        let rows = sqlx::query_as::<_, ShowtimeRow>(&format!(
            "SELECT {SHOWTIME_DETAILS_COLUMNS}
             FROM showtimes s JOIN movies m ON m.id = s.movie_id
             ORDER BY s.start_time, s.id"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Listed showtimes");
        Ok(rows.into_iter().map(ShowtimeDetails::from).collect())
    }

    /// Gets a showtime with its movie.
    pub async fn find_by_id(&self, id: i64) -> DbResult<Option<ShowtimeDetails>> {
        let row = sqlx::query_as::<_, ShowtimeRow>(&format!(
            "SELECT {SHOWTIME_DETAILS_COLUMNS}
             FROM showtimes s JOIN movies m ON m.id = s.movie_id
             WHERE s.id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ShowtimeDetails::from))
    }

    /// Gets a showtime with its movie, failing with `ShowtimeNotFound`.
    pub async fn find_one(&self, id: i64) -> DbResult<ShowtimeDetails> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::ShowtimeNotFound(id).into())
    }

    async fn find_record(&self, id: i64) -> DbResult<Showtime> {
        sqlx::query_as::<_, Showtime>(&format!("{SELECT_SHOWTIME} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| CoreError::ShowtimeNotFound(id).into())
    }

    /// Applies a partial update.
    ///
    /// When a bound or the theater changes, the merged window is validated
    /// again and checked for overlap against the other showtimes.
    pub async fn update(&self, id: i64, update: ShowtimeUpdate) -> DbResult<ShowtimeDetails> {
        update.validate()?;

        let _gate = self.gate.lock().await;

        let current = self.find_record(id).await?;

        if let Some(movie_id) = update.movie_id {
            self.require_movie(movie_id).await?;
        }

        let merged = update.apply(&current);

        if update.changes_slot() {
            let window = TimeWindow::new(merged.start_time, merged.end_time)?;
            self.ensure_free(&merged.theater, &window, Some(id)).await?;
        }

        debug!(id, "Updating showtime");

        sqlx::query(
            r#"
            UPDATE showtimes SET
                movie_id = ?2,
                theater = ?3,
                start_time = ?4,
                end_time = ?5,
                price_cents = ?6
            WHERE id = ?1
            "#,
        )
        .bind(merged.id)
        .bind(merged.movie_id)
        .bind(&merged.theater)
        .bind(merged.start_time)
        .bind(merged.end_time)
        .bind(merged.price.cents())
        .execute(&self.pool)
        .await?;

        let movie = self.require_movie(merged.movie_id).await?;
        Ok(ShowtimeDetails {
            showtime: merged,
            movie,
        })
    }

    /// Removes a showtime.
    ///
    /// ## Returns
    /// * `Err(Rule(ShowtimeNotFound))` - No showtime with that id
    /// * `Err(Rule(ShowtimeHasTickets))` - Tickets are booked for it
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let _gate = self.gate.lock().await;

        self.find_record(id).await?;

        let booked: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tickets WHERE showtime_id = ?1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        if booked > 0 {
            warn!(id, booked, "Rejected delete of a showtime with tickets");
            return Err(CoreError::ShowtimeHasTickets(id).into());
        }

        debug!(id, "Deleting showtime");

        sqlx::query("DELETE FROM showtimes WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Fails with `ShowtimeOverlap` if another showtime in `theater`
    /// intersects `window`. `exclude` skips the showtime being updated.
    async fn ensure_free(
        &self,
        theater: &str,
        window: &TimeWindow,
        exclude: Option<i64>,
    ) -> DbResult<()> {
        let candidates = sqlx::query_as::<_, Showtime>(&format!(
            "{SELECT_SHOWTIME} WHERE theater = ?1 AND (?2 IS NULL OR id != ?2) ORDER BY start_time"
        ))
        .bind(theater)
        .bind(exclude)
        .fetch_all(&self.pool)
        .await?;

        let clash = candidates.into_iter().find(|existing| {
            intervals_overlap(
                existing.start_time,
                existing.end_time,
                window.start(),
                window.end(),
            )
        });

        if let Some(existing) = clash {
            warn!(
                theater,
                existing_id = existing.id,
                "Rejected overlapping showtime"
            );
            return Err(CoreError::ShowtimeOverlap {
                theater: existing.theater,
                start: existing.start_time,
                end: existing.end_time,
            }
            .into());
        }

        Ok(())
    }
}

impl<M: MovieLookup> ShowtimeLookup for ShowtimeRepository<M> {
    async fn find_showtime(&self, id: i64) -> DbResult<Option<ShowtimeDetails>> {
        self.find_by_id(id).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::repository::test_support::{new_movie, new_showtime, test_db, ts};
    use cinema_core::{ErrorKind, NewTicket};

    /// A movie lookup that knows no movies.
    struct NoMovies;

    impl MovieLookup for NoMovies {
        async fn find_movie(&self, _id: i64) -> DbResult<Option<Movie>> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_create_resolves_movie() {
        let db = test_db().await;
        let dune = db.movies().create(new_movie("Dune")).await.unwrap();

        let created = db
            .showtimes()
            .create(new_showtime(
                dune.id,
                "T1",
                "2024-03-20T14:00",
                "2024-03-20T16:00",
            ))
            .await
            .unwrap();

        assert!(created.showtime.id > 0);
        assert_eq!(created.movie, dune);
        assert_eq!(created.showtime.price.cents(), 1299);

        let found = db.showtimes().find_one(created.showtime.id).await.unwrap();
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn test_create_unknown_movie_is_not_found() {
        let db = test_db().await;
        let showtimes = ShowtimeRepository::new(db.pool().clone(), WriteGate::default(), NoMovies);

        let err = showtimes
            .create(new_showtime(1, "T1", "2024-03-20T14:00", "2024-03-20T16:00"))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Rule(CoreError::MovieNotFound(1))));
        assert_eq!(err.kind(), Some(ErrorKind::NotFound));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_windows() {
        let db = test_db().await;
        let dune = db.movies().create(new_movie("Dune")).await.unwrap();
        let showtimes = db.showtimes();

        let reversed = showtimes
            .create(new_showtime(
                dune.id,
                "T1",
                "2024-03-20T16:00",
                "2024-03-20T14:00",
            ))
            .await
            .unwrap_err();
        assert!(matches!(reversed, DbError::Rule(CoreError::InvalidTimeWindow)));

        let too_long = showtimes
            .create(new_showtime(
                dune.id,
                "T1",
                "2024-03-20T14:00",
                "2024-03-20T19:30",
            ))
            .await
            .unwrap_err();
        assert!(matches!(
            too_long,
            DbError::Rule(CoreError::ShowtimeTooLong { .. })
        ));
        assert_eq!(too_long.kind(), Some(ErrorKind::BadRequest));

        assert!(showtimes.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_overlap_in_same_theater_is_conflict() {
        let db = test_db().await;
        let dune = db.movies().create(new_movie("Dune")).await.unwrap();
        let showtimes = db.showtimes();

        showtimes
            .create(new_showtime(
                dune.id,
                "T1",
                "2024-03-20T14:00",
                "2024-03-20T16:00",
            ))
            .await
            .unwrap();

        let err = showtimes
            .create(new_showtime(
                dune.id,
                "T1",
                "2024-03-20T15:00",
                "2024-03-20T17:00",
            ))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Rule(CoreError::ShowtimeOverlap { ref theater, .. }) if theater == "T1"
        ));
        assert_eq!(err.kind(), Some(ErrorKind::Conflict));

        // Touching boundaries count as overlap
        let touching = showtimes
            .create(new_showtime(
                dune.id,
                "T1",
                "2024-03-20T16:00",
                "2024-03-20T18:00",
            ))
            .await;
        assert!(touching.is_err());

        // Same window in another theater is fine
        showtimes
            .create(new_showtime(
                dune.id,
                "T2",
                "2024-03-20T15:00",
                "2024-03-20T17:00",
            ))
            .await
            .unwrap();

        // Right after the first one ends is fine
        showtimes
            .create(new_showtime(
                dune.id,
                "T1",
                "2024-03-20T16:01",
                "2024-03-20T18:00",
            ))
            .await
            .unwrap();

        assert_eq!(showtimes.find_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_update_excludes_itself_from_overlap() {
        let db = test_db().await;
        let dune = db.movies().create(new_movie("Dune")).await.unwrap();
        let showtimes = db.showtimes();

        let first = showtimes
            .create(new_showtime(
                dune.id,
                "T1",
                "2024-03-20T14:00",
                "2024-03-20T16:00",
            ))
            .await
            .unwrap();

        let moved = showtimes
            .update(
                first.showtime.id,
                ShowtimeUpdate {
                    end_time: Some(ts("2024-03-20T16:30")),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(moved.showtime.start_time, ts("2024-03-20T14:00"));
        assert_eq!(moved.showtime.end_time, ts("2024-03-20T16:30"));
        assert_eq!(moved.movie, dune);
    }

    #[tokio::test]
    async fn test_update_into_busy_slot_is_conflict() {
        let db = test_db().await;
        let dune = db.movies().create(new_movie("Dune")).await.unwrap();
        let showtimes = db.showtimes();

        showtimes
            .create(new_showtime(
                dune.id,
                "T1",
                "2024-03-20T14:00",
                "2024-03-20T16:00",
            ))
            .await
            .unwrap();
        let later = showtimes
            .create(new_showtime(
                dune.id,
                "T1",
                "2024-03-20T18:00",
                "2024-03-20T20:00",
            ))
            .await
            .unwrap();

        let err = showtimes
            .update(
                later.showtime.id,
                ShowtimeUpdate {
                    start_time: Some(ts("2024-03-20T15:30")),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Rule(CoreError::ShowtimeOverlap { .. })));

        // Unchanged in storage
        let stored = showtimes.find_one(later.showtime.id).await.unwrap();
        assert_eq!(stored.showtime.start_time, ts("2024-03-20T18:00"));
    }

    #[tokio::test]
    async fn test_theater_change_rechecks_overlap() {
        let db = test_db().await;
        let dune = db.movies().create(new_movie("Dune")).await.unwrap();
        let showtimes = db.showtimes();

        showtimes
            .create(new_showtime(
                dune.id,
                "T1",
                "2024-03-20T14:00",
                "2024-03-20T16:00",
            ))
            .await
            .unwrap();
        let other = showtimes
            .create(new_showtime(
                dune.id,
                "T2",
                "2024-03-20T14:00",
                "2024-03-20T16:00",
            ))
            .await
            .unwrap();

        let err = showtimes
            .update(
                other.showtime.id,
                ShowtimeUpdate {
                    theater: Some("T1".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Rule(CoreError::ShowtimeOverlap { .. })));
    }

    #[tokio::test]
    async fn test_update_window_uses_stored_bounds() {
        let db = test_db().await;
        let dune = db.movies().create(new_movie("Dune")).await.unwrap();
        let showtimes = db.showtimes();

        let created = showtimes
            .create(new_showtime(
                dune.id,
                "T1",
                "2024-03-20T14:00",
                "2024-03-20T16:00",
            ))
            .await
            .unwrap();

        // New start after the stored end
        let err = showtimes
            .update(
                created.showtime.id,
                ShowtimeUpdate {
                    start_time: Some(ts("2024-03-20T17:00")),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Rule(CoreError::InvalidTimeWindow)));
    }

    #[tokio::test]
    async fn test_update_unknown_movie_or_showtime() {
        let db = test_db().await;
        let dune = db.movies().create(new_movie("Dune")).await.unwrap();
        let showtimes = db.showtimes();
        let created = showtimes
            .create(new_showtime(
                dune.id,
                "T1",
                "2024-03-20T14:00",
                "2024-03-20T16:00",
            ))
            .await
            .unwrap();

        let err = showtimes
            .update(
                created.showtime.id,
                ShowtimeUpdate {
                    movie_id: Some(99),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Rule(CoreError::MovieNotFound(99))));

        let err = showtimes
            .update(404, ShowtimeUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Rule(CoreError::ShowtimeNotFound(404))));
    }

    #[tokio::test]
    async fn test_update_price_only() {
        let db = test_db().await;
        let dune = db.movies().create(new_movie("Dune")).await.unwrap();
        let showtimes = db.showtimes();
        let created = showtimes
            .create(new_showtime(
                dune.id,
                "T1",
                "2024-03-20T14:00",
                "2024-03-20T16:00",
            ))
            .await
            .unwrap();

        let updated = showtimes
            .update(
                created.showtime.id,
                ShowtimeUpdate {
                    price: Some(Money::from_cents(899)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.showtime.price.cents(), 899);
        assert_eq!(updated.showtime.theater, "T1");
    }

    #[tokio::test]
    async fn test_delete() {
        let db = test_db().await;
        let dune = db.movies().create(new_movie("Dune")).await.unwrap();
        let showtimes = db.showtimes();
        let created = showtimes
            .create(new_showtime(
                dune.id,
                "T1",
                "2024-03-21T14:00",
                "2024-03-21T16:00",
            ))
            .await
            .unwrap();

        showtimes.delete(created.showtime.id).await.unwrap();
        assert!(showtimes
            .find_by_id(created.showtime.id)
            .await
            .unwrap()
            .is_none());
        assert!(matches!(
            showtimes.delete(created.showtime.id).await,
            Err(DbError::Rule(CoreError::ShowtimeNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_delete_with_tickets_is_conflict() {
        let db = test_db().await;
        let dune = db.movies().create(new_movie("Dune")).await.unwrap();
        let created = db
            .showtimes()
            .create(new_showtime(
                dune.id,
                "T1",
                "2024-03-21T14:00",
                "2024-03-21T16:00",
            ))
            .await
            .unwrap();
        db.tickets()
            .create(NewTicket {
                showtime_id: created.showtime.id,
                seat_number: "A1".to_string(),
                customer_name: "Alice".to_string(),
            })
            .await
            .unwrap();

        let err = db.showtimes().delete(created.showtime.id).await.unwrap_err();
        assert!(matches!(err, DbError::Rule(CoreError::ShowtimeHasTickets(_))));
    }
}

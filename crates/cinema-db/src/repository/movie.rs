//! # Movie Repository
//!
//! Database operations for the movie catalogue.
//!
//! ## Key Operations
//! - CRUD with merge-style partial updates
//! - Title uniqueness (checked under the write gate, backed by a UNIQUE index)
//! - Delete guard: a movie with scheduled showtimes cannot be removed

use std::sync::Arc;

use chrono::Datelike;
use cinema_core::{Clock, CoreError, Movie, MovieUpdate, NewMovie};
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::DbResult;
use crate::pool::WriteGate;
use crate::repository::MovieLookup;

const SELECT_MOVIE: &str = "SELECT id, title, genre, duration, rating, release_year FROM movies";

/// Repository for movie database operations.
///
/// ## Usage
/// ```rust,ignore
/// let movies = db.movies();
///
/// let dune = movies.create(new_movie).await?;
/// let same = movies.find_one(dune.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct MovieRepository {
    pool: SqlitePool,
    gate: WriteGate,
    clock: Arc<dyn Clock>,
}

impl MovieRepository {
    /// Creates a new movie repository.
    pub fn new(pool: SqlitePool, gate: WriteGate, clock: Arc<dyn Clock>) -> Self {
        MovieRepository { pool, gate, clock }
    }

    fn current_year(&self) -> i32 {
        self.clock.now().year()
    }

    /// Adds a movie to the catalogue.
    ///
    /// ## Returns
    /// * `Ok(Movie)` - Stored movie with its generated id
    /// * `Err(Rule(Validation))` - Field shape violation
    /// * `Err(Rule(DuplicateTitle))` - Title already used
    pub async fn create(&self, input: NewMovie) -> DbResult<Movie> {
        input.validate(self.current_year())?;
        let input = input.normalized();

        let _gate = self.gate.lock().await;

        if self.find_by_title(&input.title).await?.is_some() {
            warn!(title = %input.title, "Rejected duplicate movie title");
            return Err(CoreError::DuplicateTitle { title: input.title }.into());
        }

        debug!(title = %input.title, "Inserting movie");

        let result = sqlx::query(
            r#"
            INSERT INTO movies (title, genre, duration, rating, release_year)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&input.title)
        .bind(&input.genre)
        .bind(input.duration)
        .bind(input.rating)
        .bind(input.release_year)
        .execute(&self.pool)
        .await?;

        Ok(Movie {
            id: result.last_insert_rowid(),
            title: input.title,
            genre: input.genre,
            duration: input.duration,
            rating: input.rating,
            release_year: input.release_year,
        })
    }

    /// Lists all movies, oldest first.
    pub async fn find_all(&self) -> DbResult<Vec<Movie>> {
        let movies = sqlx::query_as::<_, Movie>(&format!("{SELECT_MOVIE} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;

        debug!(count = movies.len(), "Listed movies");
        Ok(movies)
    }

    /// Gets a movie by its id.
    ///
    /// ## Returns
    /// * `Ok(Some(Movie))` - Movie found
    /// * `Ok(None)` - No movie with that id
    pub async fn find_by_id(&self, id: i64) -> DbResult<Option<Movie>> {
        let movie = sqlx::query_as::<_, Movie>(&format!("{SELECT_MOVIE} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(movie)
    }

    /// Gets a movie by its id, failing with `MovieNotFound`.
    pub async fn find_one(&self, id: i64) -> DbResult<Movie> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::MovieNotFound(id).into())
    }

    /// Gets a movie by its exact title.
    pub async fn find_by_title(&self, title: &str) -> DbResult<Option<Movie>> {
        let movie = sqlx::query_as::<_, Movie>(&format!("{SELECT_MOVIE} WHERE title = ?1"))
            .bind(title)
            .fetch_optional(&self.pool)
            .await?;

        Ok(movie)
    }

    /// Applies a partial update.
    ///
    /// ## Returns
    /// * `Ok(Movie)` - The merged record as stored
    /// * `Err(Rule(MovieNotFound))` - No movie with that id
    /// * `Err(Rule(DuplicateTitle))` - New title belongs to another movie
    pub async fn update(&self, id: i64, update: MovieUpdate) -> DbResult<Movie> {
        update.validate(self.current_year())?;

        let _gate = self.gate.lock().await;

        let current = self.find_one(id).await?;

        if let Some(title) = update.changed_title(&current) {
            if self.find_by_title(title).await?.is_some() {
                warn!(id, title = %title, "Rejected rename to an existing title");
                return Err(CoreError::DuplicateTitle {
                    title: title.to_string(),
                }
                .into());
            }
        }

        let merged = update.apply(&current);

        debug!(id, "Updating movie");

        sqlx::query(
            r#"
            UPDATE movies SET
                title = ?2,
                genre = ?3,
                duration = ?4,
                rating = ?5,
                release_year = ?6
            WHERE id = ?1
            "#,
        )
        .bind(merged.id)
        .bind(&merged.title)
        .bind(&merged.genre)
        .bind(merged.duration)
        .bind(merged.rating)
        .bind(merged.release_year)
        .execute(&self.pool)
        .await?;

        Ok(merged)
    }

    /// Removes a movie.
    ///
    /// ## Returns
    /// * `Err(Rule(MovieNotFound))` - No movie with that id
    /// * `Err(Rule(MovieHasShowtimes))` - Showtimes still reference it
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let _gate = self.gate.lock().await;

        self.find_one(id).await?;

        let scheduled: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM showtimes WHERE movie_id = ?1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        if scheduled > 0 {
            warn!(id, "Rejected delete of a movie with showtimes");
            return Err(CoreError::MovieHasShowtimes(id).into());
        }

        debug!(id, "Deleting movie");

        sqlx::query("DELETE FROM movies WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Counts movies (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movies")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

impl MovieLookup for MovieRepository {
    async fn find_movie(&self, id: i64) -> DbResult<Option<Movie>> {
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
    use crate::repository::test_support::{new_movie, new_showtime, test_db};
    use cinema_core::{ErrorKind, ValidationError};

    #[tokio::test]
    async fn test_create_and_find() {
        let db = test_db().await;
        let movies = db.movies();

        let dune = movies.create(new_movie("Dune")).await.unwrap();
        assert!(dune.id > 0);
        assert_eq!(dune.title, "Dune");

        let found = movies.find_one(dune.id).await.unwrap();
        assert_eq!(found, dune);
        assert_eq!(movies.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_title_is_conflict() {
        let db = test_db().await;
        let movies = db.movies();

        movies.create(new_movie("Dune")).await.unwrap();
        let err = movies.create(new_movie("Dune")).await.unwrap_err();

        assert!(matches!(
            err,
            DbError::Rule(CoreError::DuplicateTitle { ref title }) if title == "Dune"
        ));
        assert_eq!(err.kind(), Some(ErrorKind::Conflict));

        // A different title still goes through
        movies.create(new_movie("Arrival")).await.unwrap();
        assert_eq!(movies.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_create_trims_and_rounds() {
        let db = test_db().await;

        let mut input = new_movie("  Dune  ");
        input.rating = 8.46;
        let dune = db.movies().create(input).await.unwrap();

        assert_eq!(dune.title, "Dune");
        assert_eq!(dune.rating, 8.5);
    }

    #[tokio::test]
    async fn test_release_year_bounded_by_clock() {
        let db = test_db().await;

        let mut input = new_movie("Next Year");
        input.release_year = 2025;
        let err = db.movies().create(input).await.unwrap_err();

        assert!(matches!(
            err,
            DbError::Rule(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
    }

    #[tokio::test]
    async fn test_find_missing_is_not_found() {
        let db = test_db().await;
        let movies = db.movies();

        assert!(movies.find_by_id(42).await.unwrap().is_none());
        assert!(matches!(
            movies.find_one(42).await,
            Err(DbError::Rule(CoreError::MovieNotFound(42)))
        ));
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let db = test_db().await;
        let movies = db.movies();
        let dune = movies.create(new_movie("Dune")).await.unwrap();

        let updated = movies
            .update(
                dune.id,
                MovieUpdate {
                    rating: Some(9.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.rating, 9.0);
        assert_eq!(updated.title, "Dune");
        assert_eq!(movies.find_one(dune.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_title_conflicts() {
        let db = test_db().await;
        let movies = db.movies();
        let dune = movies.create(new_movie("Dune")).await.unwrap();
        movies.create(new_movie("Arrival")).await.unwrap();

        let err = movies
            .update(
                dune.id,
                MovieUpdate {
                    title: Some("Arrival".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Rule(CoreError::DuplicateTitle { .. })));

        // Keeping its own title is not a conflict
        movies
            .update(
                dune.id,
                MovieUpdate {
                    title: Some("Dune".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let db = test_db().await;

        let err = db
            .movies()
            .update(9, MovieUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Rule(CoreError::MovieNotFound(9))));
    }

    #[tokio::test]
    async fn test_delete() {
        let db = test_db().await;
        let movies = db.movies();
        let dune = movies.create(new_movie("Dune")).await.unwrap();

        movies.delete(dune.id).await.unwrap();
        assert!(movies.find_by_id(dune.id).await.unwrap().is_none());

        assert!(matches!(
            movies.delete(dune.id).await,
            Err(DbError::Rule(CoreError::MovieNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_delete_with_showtimes_is_conflict() {
        let db = test_db().await;
        let dune = db.movies().create(new_movie("Dune")).await.unwrap();
        db.showtimes()
            .create(new_showtime(
                dune.id,
                "T1",
                "2024-03-21T14:00",
                "2024-03-21T16:00",
            ))
            .await
            .unwrap();

        let err = db.movies().delete(dune.id).await.unwrap_err();
        assert!(matches!(err, DbError::Rule(CoreError::MovieHasShowtimes(_))));
        assert!(db.movies().find_by_id(dune.id).await.unwrap().is_some());
    }
}

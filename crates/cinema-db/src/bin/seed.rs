//! # Seed Data Generator
//!
//! Populates the database with a movie catalogue and a screening schedule
//! for development.
//!
//! ## Usage
//! ```bash
//! # Seven days of showtimes (default)
//! cargo run -p cinema-db --bin seed
//!
//! # Custom schedule length
//! cargo run -p cinema-db --bin seed -- --days 14
//!
//! # Specify database path
//! cargo run -p cinema-db --bin seed -- --db ./data/cinema.db
//! ```
//!
//! ## Generated Schedule
//! Starting tomorrow, each theater plays back-to-back screenings from 12:00,
//! with a 30 minute turnaround between them. Every record goes through the
//! stores, so the overlap and length rules hold for seeded data too.
//!
//! Stop the API server before seeding its database file: the stores' write
//! gate only serializes writers inside one process.

use std::env;

use anyhow::{bail, Context, Result};
use chrono::{Duration, Local, NaiveDateTime, NaiveTime};
use cinema_core::{Money, NewMovie, NewShowtime};
use cinema_db::{Database, DbConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// (title, genre, duration, rating, release_year)
const MOVIES: &[(&str, &str, i64, f64, i32)] = &[
    ("Dune", "Sci-Fi", 155, 8.0, 2021),
    ("Dune: Part Two", "Sci-Fi", 166, 8.6, 2024),
    ("Arrival", "Sci-Fi", 116, 7.9, 2016),
    ("Spirited Away", "Animation", 125, 8.6, 2001),
    ("Parasite", "Thriller", 132, 8.5, 2019),
    ("The Grand Budapest Hotel", "Comedy", 99, 8.1, 2014),
    ("Mad Max: Fury Road", "Action", 120, 8.1, 2015),
    ("Whiplash", "Drama", 106, 8.5, 2014),
    ("Coco", "Animation", 105, 8.4, 2017),
    ("Oppenheimer", "Drama", 180, 8.3, 2023),
];

const THEATERS: &[&str] = &["Theater 1", "Theater 2", "Theater 3"];

/// Screenings per theater per day.
const SHOWS_PER_DAY: usize = 4;

/// Cleaning / ads between screenings.
const TURNAROUND_MINUTES: i64 = 30;

/// Price tiers in cents, cycled through.
const PRICES: &[i64] = &[999, 1299, 1499];

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut days: i64 = 7;
    let mut db_path = String::from("./cinema_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--days" | "-n" => {
                if i + 1 < args.len() {
                    days = args[i + 1]
                        .parse()
                        .with_context(|| format!("invalid --days value: {}", args[i + 1]))?;
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Cinema Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -n, --days <N>     Days of showtimes to schedule (default: 7)");
                println!("  -d, --db <PATH>    Database file path (default: ./cinema_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => bail!("unknown argument: {other}"),
        }
        i += 1;
    }

    if days < 1 {
        bail!("--days must be at least 1");
    }

    info!(db = %db_path, days, "Seeding cinema database");

    let db = Database::new(DbConfig::new(&db_path))
        .await
        .context("failed to open database")?;

    let existing = db.movies().count().await?;
    if existing > 0 {
        warn!(
            existing,
            "Database already has movies; skipping seed. Delete the file to regenerate."
        );
        return Ok(());
    }

    let mut movies = Vec::with_capacity(MOVIES.len());
    for (title, genre, duration, rating, release_year) in MOVIES {
        let movie = db
            .movies()
            .create(NewMovie {
                title: title.to_string(),
                genre: genre.to_string(),
                duration: *duration,
                rating: *rating,
                release_year: *release_year,
            })
            .await
            .with_context(|| format!("failed to insert movie {title}"))?;
        movies.push(movie);
    }
    info!(count = movies.len(), "Inserted movies");

    let tomorrow = Local::now().date_naive() + Duration::days(1);
    let opening = NaiveTime::from_hms_opt(12, 0, 0).context("invalid opening time")?;

    let showtimes = db.showtimes();
    let mut scheduled = 0usize;

    for day in 0..days {
        let date = tomorrow + Duration::days(day);

        for (theater_idx, theater) in THEATERS.iter().enumerate() {
            let mut start: NaiveDateTime = date.and_time(opening);

            for show in 0..SHOWS_PER_DAY {
                let pick = (day as usize * 7 + theater_idx * SHOWS_PER_DAY + show) % movies.len();
                let movie = &movies[pick];
                let end = start + Duration::minutes(movie.duration);

                showtimes
                    .create(NewShowtime {
                        movie_id: movie.id,
                        theater: theater.to_string(),
                        start_time: start,
                        end_time: end,
                        price: Money::from_cents(PRICES[(show + theater_idx) % PRICES.len()]),
                    })
                    .await
                    .with_context(|| format!("failed to schedule {} in {theater}", movie.title))?;

                scheduled += 1;
                start = end + Duration::minutes(TURNAROUND_MINUTES);
            }
        }
    }

    info!(scheduled, "Seed complete");
    db.close().await;

    Ok(())
}

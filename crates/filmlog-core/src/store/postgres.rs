//! Postgres-backed store for the `watch_events` table.

use async_trait::async_trait;
use chrono::NaiveDate;
use filmlog_config::DatabaseConfig;
use filmlog_models::{MovieMetadata, MovieWatchEvent};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info};

use super::{StoreError, WatchStore};

/// Column list for `watch_events` queries.
const COLUMNS: &str = "\
    id, guid, title, year, watched_date, member_rating, description, tmdb_id, \
    plot, genre, director, rating, runtime, release_date, budget, revenue, \
    tagline, status, original_language, production_companies, spoken_languages, \
    poster_path, backdrop_path, homepage";

#[derive(Debug, sqlx::FromRow)]
struct EventRow {
    id: i64,
    guid: String,
    title: String,
    year: String,
    watched_date: Option<NaiveDate>,
    member_rating: String,
    description: String,
    tmdb_id: Option<String>,
    plot: String,
    genre: String,
    director: String,
    rating: String,
    runtime: i32,
    release_date: Option<NaiveDate>,
    budget: i64,
    revenue: i64,
    tagline: String,
    status: String,
    original_language: String,
    production_companies: String,
    spoken_languages: String,
    poster_path: String,
    backdrop_path: String,
    homepage: String,
}

impl From<EventRow> for MovieWatchEvent {
    fn from(row: EventRow) -> Self {
        MovieWatchEvent {
            id: Some(row.id),
            guid: row.guid,
            title: row.title,
            year: row.year,
            watched_date: row.watched_date,
            member_rating: row.member_rating,
            description: row.description,
            tmdb_id: row.tmdb_id,
            metadata: MovieMetadata {
                plot: row.plot,
                genre: row.genre,
                director: row.director,
                rating: row.rating,
                runtime: row.runtime,
                release_date: row.release_date,
                budget: row.budget,
                revenue: row.revenue,
                tagline: row.tagline,
                status: row.status,
                original_language: row.original_language,
                production_companies: row.production_companies,
                spoken_languages: row.spoken_languages,
                poster_path: row.poster_path,
                backdrop_path: row.backdrop_path,
                homepage: row.homepage,
            },
        }
    }
}

pub struct PgWatchStore {
    pool: PgPool,
    timeout: Duration,
    list_timeout: Duration,
}

impl PgWatchStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            timeout: Duration::from_secs(5),
            list_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeouts(mut self, timeout: Duration, list_timeout: Duration) -> Self {
        self.timeout = timeout;
        self.list_timeout = list_timeout;
        self
    }

    /// Open a pool, apply pending migrations and return the store
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.timeout_secs))
            .connect(&config.url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        info!(
            operation = "store_connect",
            max_connections = config.max_connections,
            "Connected to Postgres and applied migrations"
        );

        Ok(Self::new(pool).with_timeouts(
            Duration::from_secs(config.timeout_secs),
            Duration::from_secs(config.list_timeout_secs),
        ))
    }

    async fn bounded<T, F>(&self, operation: &'static str, limit: Duration, query: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(limit, query).await {
            Ok(result) => result.map_err(StoreError::from),
            Err(_) => Err(StoreError::Timeout {
                operation,
                seconds: limit.as_secs(),
            }),
        }
    }
}

#[async_trait]
impl WatchStore for PgWatchStore {
    fn store_name(&self) -> &str {
        "postgres"
    }

    async fn exists(&self, guid: &str) -> Result<bool, StoreError> {
        let query = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM watch_events WHERE guid = $1)",
        )
        .bind(guid)
        .fetch_one(&self.pool);

        self.bounded("exists", self.timeout, query).await
    }

    async fn insert(&self, event: &MovieWatchEvent) -> Result<(), StoreError> {
        let m = &event.metadata;
        let query = sqlx::query(
            "INSERT INTO watch_events (\
                guid, title, year, watched_date, member_rating, description, tmdb_id, \
                plot, genre, director, rating, runtime, release_date, budget, revenue, \
                tagline, status, original_language, production_companies, spoken_languages, \
                poster_path, backdrop_path, homepage) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, \
                     $16, $17, $18, $19, $20, $21, $22, $23) \
             ON CONFLICT (guid) DO NOTHING",
        )
        .bind(&event.guid)
        .bind(&event.title)
        .bind(&event.year)
        .bind(event.watched_date)
        .bind(&event.member_rating)
        .bind(&event.description)
        .bind(event.tmdb_id.as_deref().filter(|id| !id.is_empty()))
        .bind(&m.plot)
        .bind(&m.genre)
        .bind(&m.director)
        .bind(&m.rating)
        .bind(m.runtime)
        .bind(m.release_date)
        .bind(m.budget)
        .bind(m.revenue)
        .bind(&m.tagline)
        .bind(&m.status)
        .bind(&m.original_language)
        .bind(&m.production_companies)
        .bind(&m.spoken_languages)
        .bind(&m.poster_path)
        .bind(&m.backdrop_path)
        .bind(&m.homepage)
        .execute(&self.pool);

        let result = self.bounded("insert", self.timeout, query).await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::Duplicate {
                guid: event.guid.clone(),
            });
        }

        debug!(guid = %event.guid, "Inserted watch event");
        Ok(())
    }

    async fn find_by_guid(&self, guid: &str) -> Result<MovieWatchEvent, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM watch_events WHERE guid = $1");
        let query = sqlx::query_as::<_, EventRow>(&sql)
            .bind(guid)
            .fetch_optional(&self.pool);

        self.bounded("find_by_guid", self.timeout, query)
            .await?
            .map(MovieWatchEvent::from)
            .ok_or_else(|| StoreError::NotFound {
                guid: guid.to_string(),
            })
    }

    async fn list_all(&self) -> Result<Vec<MovieWatchEvent>, StoreError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM watch_events \
             ORDER BY watched_date DESC NULLS LAST, id ASC"
        );
        let query = sqlx::query_as::<_, EventRow>(&sql).fetch_all(&self.pool);

        let rows = self.bounded("list_all", self.list_timeout, query).await?;
        Ok(rows.into_iter().map(MovieWatchEvent::from).collect())
    }
}

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

use super::model::*;
use super::repo::*;
use crate::catalog::Movie;

pub struct SqliteRepository {
    pool: SqlitePool,
    image_base_url: String,
}

impl SqliteRepository {
    pub async fn new(db_path: &str, image_base_url: &str) -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str(db_path)?.create_if_missing(true);

        // Every connection to an in-memory database gets its own empty
        // database, so those must stay on one connection that never expires.
        let pool = if db_path.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?
        };

        let repo = Self {
            pool,
            image_base_url: image_base_url.to_string(),
        };

        repo.init_schema().await?;

        info!("Database initialized at {}", db_path);

        Ok(repo)
    }

    async fn init_schema(&self) -> DbResult<()> {
        let schema = include_str!("schema.sql");
        sqlx::raw_sql(schema).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn get_search_count(&self, term: &str) -> DbResult<SearchCount> {
        let key = normalize_term(term);
        sqlx::query_as::<_, SearchCount>(
            "SELECT id, searchterm, count, movieid, title, posterurl, updated
             FROM searchcounts WHERE searchterm = ?",
        )
        .bind(&key)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => DbError::NotFound(format!("Search term not found: {}", key)),
            _ => DbError::Sqlx(e),
        })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl SearchCounter for SqliteRepository {
    async fn record_search(&self, term: &str, movie: &Movie) -> DbResult<()> {
        let key = normalize_term(term);
        if key.is_empty() {
            return Err(DbError::InvalidTerm(term.to_string()));
        }

        let movie_id = i64::try_from(movie.id)
            .map_err(|_| DbError::InvalidTerm(format!("{} (movie id {} out of range)", term, movie.id)))?;

        sqlx::query(
            "INSERT INTO searchcounts (id, searchterm, count, movieid, title, posterurl, updated)
             VALUES (?, ?, 1, ?, ?, ?, ?)
             ON CONFLICT(searchterm) DO UPDATE SET
                count = searchcounts.count + 1,
                movieid = excluded.movieid,
                title = excluded.title,
                posterurl = excluded.posterurl,
                updated = excluded.updated",
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(&key)
        .bind(movie_id)
        .bind(&movie.title)
        .bind(movie.poster_url(&self.image_base_url))
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        debug!("Recorded search for {:?} (top result {})", key, movie.id);
        Ok(())
    }

    async fn list_trending(&self, limit: u32) -> DbResult<Vec<TrendingEntry>> {
        let rows = sqlx::query_as::<_, SearchCount>(
            "SELECT id, searchterm, count, movieid, title, posterurl, updated
             FROM searchcounts ORDER BY count DESC, updated DESC LIMIT ?",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| row.into_trending(i + 1))
            .collect())
    }
}

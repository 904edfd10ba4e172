use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SearchCount {
    pub id: String,
    pub searchterm: String,
    pub count: i64,
    pub movieid: i64,
    pub title: String,
    pub posterurl: Option<String>,
    pub updated: Option<String>,
}

/// One row of the trending strip, ranked from 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingEntry {
    pub rank: usize,
    pub id: String,
    pub search_term: String,
    pub title: String,
    pub poster_url: Option<String>,
    pub movie_id: i64,
}

impl SearchCount {
    pub fn into_trending(self, rank: usize) -> TrendingEntry {
        TrendingEntry {
            rank,
            id: self.id,
            search_term: self.searchterm,
            title: self.title,
            poster_url: self.posterurl,
            movie_id: self.movieid,
        }
    }
}

/// Key under which a search term is counted: trimmed, inner whitespace
/// collapsed to single spaces, lowercased.
pub fn normalize_term(term: &str) -> String {
    term.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid search term: {0:?}")]
    InvalidTerm(String),
}

pub type DbResult<T> = Result<T, DbError>;

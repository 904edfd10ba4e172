use async_trait::async_trait;

use super::model::*;
use crate::catalog::Movie;

/// Store that counts how often each search term produced results and serves
/// the most popular terms back as the trending list.
#[async_trait]
pub trait SearchCounter: Send + Sync {
    /// Bumps the counter for `term`, creating it with count 1 when new, and
    /// refreshes the movie shown for it.
    async fn record_search(&self, term: &str, movie: &Movie) -> DbResult<()>;
    async fn list_trending(&self, limit: u32) -> DbResult<Vec<TrendingEntry>>;
}

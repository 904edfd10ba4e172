use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{error, info};

use super::state::StateHandle;
use crate::db::{SearchCounter, TrendingEntry};

/// Loads the trending list into the view, once per application lifetime.
pub struct TrendingLoader {
    counter: Arc<dyn SearchCounter>,
    state: Arc<StateHandle>,
    limit: u32,
    loaded: AtomicBool,
}

impl TrendingLoader {
    pub fn new(counter: Arc<dyn SearchCounter>, state: Arc<StateHandle>, limit: u32) -> Self {
        Self {
            counter,
            state,
            limit,
            loaded: AtomicBool::new(false),
        }
    }

    /// Fetches and publishes the trending list. Failures are logged and leave
    /// the list empty. Calls after the first one do nothing and return `None`.
    pub async fn load_once(&self) -> Option<Vec<TrendingEntry>> {
        if self.loaded.swap(true, Ordering::SeqCst) {
            return None;
        }

        let trending = match self.counter.list_trending(self.limit).await {
            Ok(trending) => {
                info!("Loaded {} trending searches", trending.len());
                trending
            }
            Err(e) => {
                error!("Error fetching trending movies: {}", e);
                Vec::new()
            }
        };

        self.state.set_trending(trending.clone());
        Some(trending)
    }
}

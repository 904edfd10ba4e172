use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

use super::state::{RequestState, StateHandle};
use crate::catalog::{CatalogError, CatalogPayload, Endpoint, Movie, MovieCatalog};
use crate::db::SearchCounter;

pub const FETCH_FAILED: &str = "Failed to fetch movies";
pub const FETCH_ERROR: &str = "Error fetching movies. Please try again later.";

/// Runs one catalog lookup per committed query and drives the request state.
pub struct SearchOrchestrator {
    catalog: Arc<dyn MovieCatalog>,
    counter: Arc<dyn SearchCounter>,
    state: Arc<StateHandle>,
    tasks: TaskTracker,
    shutdown: CancellationToken,
    inflight: Mutex<Option<CancellationToken>>,
}

impl SearchOrchestrator {
    pub fn new(
        catalog: Arc<dyn MovieCatalog>,
        counter: Arc<dyn SearchCounter>,
        state: Arc<StateHandle>,
        tasks: TaskTracker,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            catalog,
            counter,
            state,
            tasks,
            shutdown,
            inflight: Mutex::new(None),
        }
    }

    /// Searches for `query`, or lists popular movies when it is empty.
    ///
    /// Starting a search cancels the one still in flight. Returns the state
    /// this request ended in, or `None` when it was superseded (or the app
    /// shut down) before its result could be applied.
    pub async fn search(&self, query: &str) -> Option<RequestState> {
        let (token, generation) = {
            let mut inflight = self.inflight.lock().unwrap_or_else(|e| e.into_inner());
            let token = self.shutdown.child_token();
            if let Some(previous) = inflight.replace(token.clone()) {
                previous.cancel();
            }
            (token, self.state.begin_request(query))
        };

        let endpoint = Endpoint::for_query(query);
        let result = tokio::select! {
            _ = token.cancelled() => {
                debug!("Search for {:?} superseded before completion", query);
                return None;
            }
            result = self.catalog.fetch(&endpoint) => result,
        };

        let outcome = Self::normalize(result);
        if !self.state.finish_request(generation, outcome.clone()) {
            debug!("Discarding stale result for {:?}", query);
            return None;
        }

        if let RequestState::Success(ref movies) = outcome {
            info!("Search {:?} returned {} movies", query, movies.len());
            if let Some(top) = movies.first().filter(|_| !query.is_empty()) {
                self.record_in_background(query, top.clone());
            }
        }

        Some(outcome)
    }

    /// Maps a catalog reply onto the final request state. The error detail is
    /// logged; the user only ever sees one of the fixed messages or the
    /// catalog's own error text.
    pub fn normalize(result: Result<CatalogPayload, CatalogError>) -> RequestState {
        match result {
            Err(CatalogError::Status(status)) => {
                warn!("Catalog request failed with HTTP {}", status);
                RequestState::Failure(FETCH_FAILED.to_string())
            }
            Err(e) => {
                error!("Error fetching movies: {}", e);
                RequestState::Failure(FETCH_ERROR.to_string())
            }
            Ok(payload) if payload.is_api_failure() => {
                let message = payload
                    .error
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(|| FETCH_FAILED.to_string());
                warn!("Catalog reported failure: {}", message);
                RequestState::Failure(message)
            }
            Ok(payload) => RequestState::Success(payload.results.unwrap_or_default()),
        }
    }

    fn record_in_background(&self, query: &str, top: Movie) {
        let counter = Arc::clone(&self.counter);
        let term = query.to_string();
        self.tasks.spawn(async move {
            if let Err(e) = counter.record_search(&term, &top).await {
                error!("Failed to update search count for {:?}: {}", term, e);
            }
        });
    }
}

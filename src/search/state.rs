use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

use crate::catalog::Movie;
use crate::db::TrendingEntry;

/// Lifecycle of the most recent search.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Success(Vec<Movie>),
    Failure(String),
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn movies(&self) -> &[Movie] {
        match self {
            RequestState::Success(movies) => movies,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RequestState::Failure(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Everything the view renders.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    /// Raw input as typed.
    pub query: String,
    /// Query of the request that currently owns `request`.
    pub debounced_query: String,
    pub request: RequestState,
    pub trending: Vec<TrendingEntry>,
}

/// Sole owner of the [`ViewState`]. All changes go through the transition
/// methods below and are published to subscribers through a watch channel.
///
/// Each search is tagged with a generation number when it starts; a result is
/// only applied while its generation is still the newest one, so a slow
/// response can never overwrite the outcome of a later search.
pub struct StateHandle {
    tx: watch::Sender<ViewState>,
    generation: AtomicU64,
}

impl Default for StateHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl StateHandle {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(ViewState::default());
        Self {
            tx,
            generation: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> ViewState {
        self.tx.borrow().clone()
    }

    pub fn set_query(&self, query: &str) {
        self.tx.send_if_modified(|view| {
            if view.query == query {
                return false;
            }
            view.query = query.to_string();
            true
        });
    }

    pub fn set_trending(&self, trending: Vec<TrendingEntry>) {
        self.tx.send_modify(|view| view.trending = trending);
    }

    /// Enters `Loading` for `query` and returns the tag of the new request.
    pub fn begin_request(&self, query: &str) -> u64 {
        let mut generation = 0;
        self.tx.send_modify(|view| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            view.debounced_query = query.to_string();
            view.request = RequestState::Loading;
        });
        generation
    }

    /// Applies the outcome of request `generation`. Returns `false`, leaving
    /// the state untouched, when a newer request has started since.
    pub fn finish_request(&self, generation: u64, outcome: RequestState) -> bool {
        self.tx.send_if_modified(|view| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            view.request = outcome;
            true
        })
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_request_lifecycle() {
        let state = StateHandle::new();
        assert_eq!(state.snapshot().request, RequestState::Idle);

        let generation = state.begin_request("alien");
        let view = state.snapshot();
        assert!(view.request.is_loading());
        assert_eq!(view.debounced_query, "alien");

        assert!(state.finish_request(generation, RequestState::Success(vec![Movie::new(348, "Alien")])));
        let view = state.snapshot();
        assert!(!view.request.is_loading());
        assert_eq!(view.request.movies().len(), 1);
    }

    #[test]
    fn test_new_request_clears_error() {
        let state = StateHandle::new();
        let first = state.begin_request("x");
        state.finish_request(first, RequestState::Failure("boom".to_string()));
        assert_eq!(state.snapshot().request.error(), Some("boom"));

        state.begin_request("y");
        assert_eq!(state.snapshot().request.error(), None);
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let state = StateHandle::new();
        let q1 = state.begin_request("q1");
        let q2 = state.begin_request("q2");
        assert!(!state.is_current(q1));

        assert!(state.finish_request(q2, RequestState::Success(vec![Movie::new(2, "Two")])));
        assert!(!state.finish_request(q1, RequestState::Success(vec![Movie::new(1, "One")])));

        let view = state.snapshot();
        assert_eq!(view.debounced_query, "q2");
        assert_matches!(view.request, RequestState::Success(ref movies) if movies[0].id == 2);
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let state = StateHandle::new();
        let mut rx = state.subscribe();

        state.set_query("heat");
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().query, "heat");

        state.set_query("heat");
        assert!(!rx.has_changed().unwrap());
    }
}

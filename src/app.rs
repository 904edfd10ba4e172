use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info};

use crate::catalog::MovieCatalog;
use crate::config::Config;
use crate::db::SearchCounter;
use crate::search::{Debouncer, SearchOrchestrator, StateHandle, TrendingLoader, ViewState};

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub debounce: Duration,
    pub trending_limit: u32,
}

impl From<&Config> for AppSettings {
    fn from(config: &Config) -> Self {
        Self {
            debounce: config.debounce_interval(),
            trending_limit: config.trending.limit,
        }
    }
}

/// Controller tying input, debouncing, searching and the trending list
/// together. The view is observed through [`App::subscribe`].
pub struct App {
    state: Arc<StateHandle>,
    debouncer: Debouncer<String>,
    tasks: TaskTracker,
    shutdown: CancellationToken,
}

impl App {
    /// Loads the trending list, runs the initial (empty query) search and
    /// starts reacting to input.
    pub fn start(
        catalog: Arc<dyn MovieCatalog>,
        counter: Arc<dyn SearchCounter>,
        settings: AppSettings,
    ) -> Self {
        let state = Arc::new(StateHandle::new());
        let tasks = TaskTracker::new();
        let shutdown = CancellationToken::new();

        let orchestrator = Arc::new(SearchOrchestrator::new(
            catalog,
            counter.clone(),
            state.clone(),
            tasks.clone(),
            shutdown.child_token(),
        ));

        let trending = TrendingLoader::new(counter, state.clone(), settings.trending_limit);
        tasks.spawn(async move {
            trending.load_once().await;
        });

        let (debouncer, committed) = Debouncer::spawn(settings.debounce);
        tasks.spawn(commit_loop(
            committed,
            orchestrator,
            tasks.clone(),
            shutdown.child_token(),
        ));

        info!("Search started, debounce {:?}", settings.debounce);

        Self {
            state,
            debouncer,
            tasks,
            shutdown,
        }
    }

    /// Replaces the raw query text.
    pub fn input(&self, text: &str) {
        self.state.set_query(text);
        self.debouncer.push(text.to_string());
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ViewState {
        self.state.snapshot()
    }

    /// Drops pending input, cancels searches in flight and waits for the
    /// background search-count updates to finish.
    pub async fn shutdown(self) {
        debug!("Shutting down search");
        self.debouncer.cancel();
        self.shutdown.cancel();
        self.tasks.close();
        self.tasks.wait().await;
    }
}

async fn commit_loop(
    mut committed: mpsc::UnboundedReceiver<String>,
    orchestrator: Arc<SearchOrchestrator>,
    tasks: TaskTracker,
    shutdown: CancellationToken,
) {
    let mut last = String::new();
    spawn_search(&tasks, &orchestrator, last.clone());

    loop {
        let query = tokio::select! {
            _ = shutdown.cancelled() => break,
            query = committed.recv() => match query {
                Some(query) => query,
                None => break,
            },
        };

        if query == last {
            continue;
        }
        last = query;
        spawn_search(&tasks, &orchestrator, last.clone());
    }
}

fn spawn_search(tasks: &TaskTracker, orchestrator: &Arc<SearchOrchestrator>, query: String) {
    let orchestrator = Arc::clone(orchestrator);
    tasks.spawn(async move {
        orchestrator.search(&query).await;
    });
}

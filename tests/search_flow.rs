mod common;

use std::sync::Arc;

use common::CannedServer;
use reelsearch_rs::catalog::CatalogClient;
use reelsearch_rs::config::CatalogConfig;
use reelsearch_rs::db::{SearchCounter, SqliteRepository};
use reelsearch_rs::render::render;
use reelsearch_rs::search::{
    RequestState, SearchOrchestrator, StateHandle, TrendingLoader, FETCH_ERROR, FETCH_FAILED,
};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";

struct Flow {
    orchestrator: SearchOrchestrator,
    state: Arc<StateHandle>,
    db: Arc<SqliteRepository>,
    tasks: TaskTracker,
}

async fn flow(base_url: &str) -> Flow {
    let config = CatalogConfig {
        base_url: base_url.to_string(),
        ..Default::default()
    };
    let catalog = Arc::new(CatalogClient::new(&config, "token").unwrap());
    let db = Arc::new(SqliteRepository::new("sqlite::memory:", IMAGE_BASE).await.unwrap());
    let state = Arc::new(StateHandle::new());
    let tasks = TaskTracker::new();
    let orchestrator = SearchOrchestrator::new(
        catalog,
        db.clone(),
        state.clone(),
        tasks.clone(),
        CancellationToken::new(),
    );
    Flow {
        orchestrator,
        state,
        db,
        tasks,
    }
}

#[tokio::test]
async fn test_search_updates_counter_and_trending() {
    let server = CannedServer::start(
        "200 OK",
        r#"{"results":[{"id":949,"title":"Heat","poster_path":"/heat.jpg","release_date":"1995-12-15"},
                       {"id":950,"title":"Heat 2"}]}"#,
    )
    .await;
    let f = flow(&server.base_url).await;

    f.orchestrator.search("Heat").await;
    f.orchestrator.search("heat").await;
    f.tasks.close();
    f.tasks.wait().await;

    let view = f.state.snapshot();
    assert_eq!(view.request.movies().len(), 2);
    assert!(render(&view).contains("Heat  [N/A | ? | 1995]"));

    let counted = f.db.get_search_count("heat").await.unwrap();
    assert_eq!(counted.count, 2);
    assert_eq!(counted.posterurl.as_deref(), Some("https://image.tmdb.org/t/p/w500/heat.jpg"));

    let loader = TrendingLoader::new(f.db.clone(), f.state.clone(), 5);
    let trending = loader.load_once().await.unwrap();
    assert_eq!(trending.len(), 1);
    assert_eq!(trending[0].rank, 1);
    assert_eq!(trending[0].movie_id, 949);
    assert!(render(&f.state.snapshot()).contains("Trending Movies"));
}

#[tokio::test]
async fn test_discover_is_not_counted() {
    let server = CannedServer::start("200 OK", r#"{"results":[{"id":1,"title":"Popular"}]}"#).await;
    let f = flow(&server.base_url).await;

    f.orchestrator.search("").await;
    f.tasks.close();
    f.tasks.wait().await;

    assert_eq!(f.state.snapshot().request.movies()[0].title, "Popular");
    assert!(f.db.list_trending(5).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failures_end_loading() {
    let server = CannedServer::start("500 Internal Server Error", "{}").await;
    let f = flow(&server.base_url).await;
    assert_eq!(
        f.orchestrator.search("x").await,
        Some(RequestState::Failure(FETCH_FAILED.to_string()))
    );
    assert!(!f.state.snapshot().request.is_loading());

    let server = CannedServer::start("200 OK", "not json").await;
    let f = flow(&server.base_url).await;
    assert_eq!(
        f.orchestrator.search("x").await,
        Some(RequestState::Failure(FETCH_ERROR.to_string()))
    );
    assert!(!f.state.snapshot().request.is_loading());
}

#[tokio::test]
async fn test_empty_store_renders_no_trending() {
    let server = CannedServer::start("200 OK", r#"{"results":[]}"#).await;
    let f = flow(&server.base_url).await;

    let loader = TrendingLoader::new(f.db.clone(), f.state.clone(), 5);
    assert_eq!(loader.load_once().await, Some(vec![]));
    assert!(!render(&f.state.snapshot()).contains("Trending Movies"));
}

pub mod app;
pub mod catalog;
pub mod config;
pub mod db;
pub mod render;
pub mod search;

use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Database error: {0}")]
    Database(#[from] db::DbError),
    #[error("Catalog error: {0}")]
    Catalog(#[from] catalog::CatalogError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Runs the interactive search: every line read from stdin replaces the
/// query, and the view is printed to stdout whenever it changes.
pub async fn run(config_path: Option<&str>, debug_logs: bool) -> Result<(), AppError> {
    let mut config = config::Config::load(config_path)?;
    config.debug_logs = debug_logs;

    match config_path {
        Some(path) => info!("Using config file: {}", path),
        None => info!("No config file given, using defaults"),
    }
    if debug_logs {
        info!("Debug logging enabled");
    }

    let token = config.catalog.resolve_token()?;
    let catalog = Arc::new(catalog::CatalogClient::new(&config.catalog, &token)?);
    info!("Catalog API at {}", catalog.base_url());

    let db_path = config.get_database_path();
    info!("Opening database at {}", db_path);
    let db = Arc::new(db::SqliteRepository::new(&db_path, &config.catalog.image_base_url).await?);

    let app = app::App::start(catalog, db.clone(), app::AppSettings::from(&config));

    let mut view = app.subscribe();
    let printer = tokio::spawn(async move {
        loop {
            let text = render::render(&view.borrow_and_update());
            println!("{}", text);
            if view.changed().await.is_err() {
                break;
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let result = loop {
        tokio::select! {
            _ = &mut ctrl_c => break Ok(()),
            line = lines.next_line() => match line {
                Ok(Some(line)) => app.input(line.trim_end_matches('\r')),
                Ok(None) => break Ok(()),
                Err(e) => break Err(AppError::Io(e)),
            },
        }
    };

    app.shutdown().await;
    printer.abort();
    db.close().await;
    info!("Bye");

    result
}

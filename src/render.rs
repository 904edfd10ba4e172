use std::fmt::Write;

use crate::catalog::Movie;
use crate::search::{RequestState, ViewState};

/// Renders the whole view as plain text.
pub fn render(view: &ViewState) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Search: {}", view.query);

    if !view.trending.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Trending Movies");
        for entry in &view.trending {
            let _ = writeln!(out, "  {:>2}. {}", entry.rank, entry.title);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "All Movies");
    match &view.request {
        RequestState::Idle => {}
        RequestState::Loading => {
            let _ = writeln!(out, "  Loading...");
        }
        RequestState::Failure(message) => {
            let _ = writeln!(out, "  {}", message);
        }
        RequestState::Success(movies) => {
            for movie in movies {
                let _ = writeln!(out, "  {}", movie_line(movie));
            }
        }
    }

    out
}

fn movie_line(movie: &Movie) -> String {
    let rating = movie
        .vote_average
        .map(|r| format!("{:.1}", r))
        .unwrap_or_else(|| "N/A".to_string());
    let year = movie.year().unwrap_or("N/A");
    let language = movie.original_language.as_deref().unwrap_or("?");
    format!("{}  [{} | {} | {}]", movie.title, rating, language, year)
}

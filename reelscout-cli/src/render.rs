//! Plain-text rendering of the search view

use reelscout_search::{MovieSummary, TrendingSearch, View};

const MISSING: &str = "N/A";

/// Renders whichever view the state selected.
pub fn render_view(view: &View<'_>, image_base_url: &str) -> String {
    match view {
        View::Loading => "Loading...".to_string(),
        View::Error(message) => format!("Error: {message}"),
        View::Results(movies) if movies.is_empty() => "No movies found.".to_string(),
        View::Results(movies) => movies
            .iter()
            .map(|movie| render_card(movie, image_base_url))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// One result card: title, then rating, language and year, then the poster.
pub fn render_card(movie: &MovieSummary, image_base_url: &str) -> String {
    // A zero average means nobody has voted yet.
    let rating = movie
        .vote_average
        .filter(|rating| *rating > 0.0)
        .map_or_else(|| MISSING.to_string(), |rating| format!("{rating:.1}"));
    let language = movie
        .original_language
        .as_deref()
        .filter(|language| !language.is_empty())
        .unwrap_or(MISSING);
    let year = movie
        .release_year()
        .map_or_else(|| MISSING.to_string(), |year| year.to_string());

    let mut card = format!("{}\n  * {rating} | {language} | {year}", movie.title);
    match movie.poster_url(image_base_url) {
        Some(url) => card.push_str(&format!("\n  {url}")),
        None => card.push_str("\n  (no poster)"),
    }
    card
}

/// Numbered trending list, most searched first.
pub fn render_trending(entries: &[TrendingSearch]) -> String {
    if entries.is_empty() {
        return "No searches recorded yet.".to_string();
    }

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let noun = if entry.count == 1 { "search" } else { "searches" };
            format!(
                "{:>2}. {} ({} {noun})",
                index + 1,
                entry.search_term,
                entry.count
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

//! Search-count tracking as seen from the search cycle.

use std::sync::Arc;
use std::time::Duration;

use reelscout_core::DebounceConfig;
use reelscout_search::providers::MockProvider;
use reelscout_search::providers::mock::sample_movie;
use reelscout_search::{
    InMemoryTracker, MovieEndpoint, SearchCycle, SearchCycleHandle, SearchTracker,
};
use tokio_test::assert_ok;

async fn search(handle: &SearchCycleHandle, text: &str) {
    let quiet = DebounceConfig::default().quiet_interval;
    assert_ok!(handle.set_search_text(text).await);
    tokio::time::sleep(quiet + Duration::from_millis(100)).await;
    assert_ok!(handle.wait_until_settled().await);
}

fn catalogue() -> MockProvider {
    MockProvider::new()
        .with_movies(MovieEndpoint::for_query("batman"), vec![sample_movie(268, "Batman")])
        .with_movies(MovieEndpoint::for_query("dune"), vec![sample_movie(438631, "Dune")])
        .with_movies(MovieEndpoint::for_query("heat"), vec![sample_movie(949, "Heat")])
}

#[tokio::test(start_paused = true)]
async fn test_repeated_searches_rank_trending() {
    let tracker = Arc::new(InMemoryTracker::new("https://img"));
    let handle = SearchCycle::new(
        Arc::new(catalogue()),
        Some(tracker.clone()),
        DebounceConfig::default().quiet_interval,
    )
    .spawn();

    for text in ["batman", "dune", "batman", "heat", "", "batman", "dune"] {
        search(&handle, text).await;
    }

    let trending = tracker.trending(2).await.unwrap();
    let ranked: Vec<(&str, u64)> = trending
        .iter()
        .map(|entry| (entry.search_term.as_str(), entry.count))
        .collect();
    assert_eq!(ranked, vec![("batman", 3), ("dune", 2)]);
    assert_eq!(trending[0].poster_url.as_deref(), Some("https://img/268.jpg"));
    // Clearing the text lists popular movies without counting a search.
    assert_eq!(tracker.calls().len(), 6);
}

#[tokio::test(start_paused = true)]
async fn test_unsettled_text_is_never_counted() {
    let quiet = DebounceConfig::default().quiet_interval;
    let tracker = Arc::new(InMemoryTracker::default());
    let handle =
        SearchCycle::new(Arc::new(catalogue()), Some(tracker.clone()), quiet).spawn();

    assert_ok!(handle.set_search_text("heat").await);
    tokio::time::sleep(quiet / 2).await;
    search(&handle, "dune").await;

    assert_eq!(tracker.count("heat"), 0);
    assert_eq!(tracker.count("dune"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_backend_outage_keeps_search_working() {
    let tracker = Arc::new(InMemoryTracker::default());
    tracker.fail_with("collection unavailable");
    let handle = SearchCycle::new(
        Arc::new(catalogue()),
        Some(tracker.clone()),
        DebounceConfig::default().quiet_interval,
    )
    .spawn();

    search(&handle, "heat").await;
    let state = handle.state();

    assert_eq!(state.error, None);
    assert_eq!(state.view().keys(), vec![949]);
    assert_eq!(tracker.calls(), vec![("heat".to_string(), 949)]);
    assert!(tracker.trending(5).await.unwrap().is_empty());
}

//! End-to-end behavior of the debounced search cycle.

use std::sync::Arc;
use std::time::Duration;

use reelscout_core::ReelscoutConfig;
use reelscout_search::providers::MockProvider;
use reelscout_search::providers::mock::sample_movie;
use reelscout_search::{
    DemoProvider, InMemoryTracker, MovieEndpoint, MovieListPayload, MovieSearchError, SearchCycle,
    View,
};
use tokio_test::assert_ok;

fn config() -> ReelscoutConfig {
    ReelscoutConfig::from_lookup(|_| None).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_keystrokes_within_quiet_interval_issue_one_search() {
    let quiet = config().debounce.quiet_interval;
    let api = Arc::new(MockProvider::new().with_movies(
        MovieEndpoint::for_query("batman"),
        vec![sample_movie(268, "Batman"), sample_movie(364, "Batman Returns")],
    ));
    let tracker = Arc::new(InMemoryTracker::default());
    let handle = SearchCycle::new(api.clone(), Some(tracker.clone()), quiet).spawn();
    assert_ok!(handle.wait_until_settled().await);

    for text in ["b", "ba", "bat", "batm", "batma", "batman"] {
        assert_ok!(handle.set_search_text(text).await);
        tokio::time::sleep(quiet / 4).await;
    }
    tokio::time::sleep(quiet + Duration::from_millis(100)).await;
    let state = assert_ok!(handle.wait_until_settled().await);

    assert_eq!(
        api.requests(),
        vec![MovieEndpoint::Discover, MovieEndpoint::for_query("batman")]
    );
    assert_eq!(state.view().keys(), vec![268, 364]);
    assert_eq!(tracker.calls(), vec![("batman".to_string(), 268)]);
}

#[tokio::test(start_paused = true)]
async fn test_pause_between_words_searches_each_settled_text() {
    let quiet = config().debounce.quiet_interval;
    let api = Arc::new(
        MockProvider::new()
            .with_movies(MovieEndpoint::for_query("heat"), vec![sample_movie(949, "Heat")])
            .with_movies(MovieEndpoint::for_query("heat 2"), vec![sample_movie(2, "Heat 2")]),
    );
    let handle = SearchCycle::new(api.clone(), None, quiet).spawn();

    assert_ok!(handle.set_search_text("heat").await);
    tokio::time::sleep(quiet * 2).await;
    assert_eq!(
        assert_ok!(handle.wait_until_settled().await).view().keys(),
        vec![949]
    );

    assert_ok!(handle.set_search_text("heat 2").await);
    tokio::time::sleep(quiet * 2).await;
    let state = assert_ok!(handle.wait_until_settled().await);

    assert_eq!(state.view().keys(), vec![2]);
    let requests = api.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(
        requests[2].url("https://api.test"),
        "https://api.test/search/movie?query=heat%202"
    );
}

#[tokio::test(start_paused = true)]
async fn test_application_failure_shows_message_instead_of_results() {
    let quiet = config().debounce.quiet_interval;
    let api = Arc::new(
        MockProvider::new()
            .with_movies(MovieEndpoint::Discover, vec![sample_movie(1, "Popular")])
            .with_response(
                MovieEndpoint::for_query("zz"),
                Ok(MovieListPayload::failure("Movie not found!")),
            ),
    );
    let handle = SearchCycle::new(api, None, quiet).spawn();
    assert_eq!(
        assert_ok!(handle.wait_until_settled().await).view().keys(),
        vec![1]
    );

    assert_ok!(handle.set_search_text("zz").await);
    tokio::time::sleep(quiet * 2).await;
    let state = assert_ok!(handle.wait_until_settled().await);

    assert_eq!(state.view(), View::Error("Movie not found!"));
    assert!(state.movies.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_transport_failure_recovers_on_next_search() {
    let quiet = config().debounce.quiet_interval;
    let api = Arc::new(
        MockProvider::new()
            .with_response(
                MovieEndpoint::for_query("down"),
                Err(MovieSearchError::Network {
                    reason: "connection refused".to_string(),
                }),
            )
            .with_movies(MovieEndpoint::for_query("up"), vec![sample_movie(5, "Up")]),
    );
    let handle = SearchCycle::new(api, None, quiet).spawn();

    assert_ok!(handle.set_search_text("down").await);
    tokio::time::sleep(quiet * 2).await;
    let failed = assert_ok!(handle.wait_until_settled().await);
    assert_eq!(
        failed.view(),
        View::Error("Error fetching movies. Please try again later.")
    );

    assert_ok!(handle.set_search_text("up").await);
    tokio::time::sleep(quiet * 2).await;
    let recovered = assert_ok!(handle.wait_until_settled().await);

    assert_eq!(recovered.error, None);
    assert_eq!(recovered.view().keys(), vec![5]);
}

#[tokio::test(start_paused = true)]
async fn test_slow_older_response_never_overwrites_newer_results() {
    let quiet = config().debounce.quiet_interval;
    let api = Arc::new(
        MockProvider::new()
            .with_movies(MovieEndpoint::for_query("old"), vec![sample_movie(1, "Old")])
            .with_delay(MovieEndpoint::for_query("old"), Duration::from_secs(10))
            .with_movies(MovieEndpoint::for_query("new"), vec![sample_movie(2, "New")]),
    );
    let handle = SearchCycle::new(api.clone(), None, quiet).spawn();

    assert_ok!(handle.set_search_text("old").await);
    tokio::time::sleep(quiet + Duration::from_millis(100)).await;
    assert_ok!(handle.set_search_text("new").await);
    tokio::time::sleep(quiet + Duration::from_millis(100)).await;
    assert_eq!(
        assert_ok!(handle.wait_until_settled().await).view().keys(),
        vec![2]
    );

    // Let the stale response land.
    tokio::time::sleep(Duration::from_secs(15)).await;

    let state = handle.state();
    assert!(!state.loading);
    assert_eq!(state.view().keys(), vec![2]);
    assert_eq!(state.debounced_text, "new");
    assert_eq!(api.requests().len(), 3);
    assert_ok!(handle.shutdown().await);
}

#[tokio::test(start_paused = true)]
async fn test_demo_catalogue_through_cycle() {
    let config = config();
    let tracker = Arc::new(InMemoryTracker::new(config.api.image_base_url.clone()));
    let handle = SearchCycle::new(
        Arc::new(DemoProvider::new()),
        Some(tracker.clone()),
        config.debounce.quiet_interval,
    )
    .spawn();

    let initial = assert_ok!(handle.wait_until_settled().await);
    assert_eq!(initial.movies.len(), 10);

    assert_ok!(handle.set_search_text("interstellar").await);
    tokio::time::sleep(config.debounce.quiet_interval * 2).await;
    let state = assert_ok!(handle.wait_until_settled().await);

    assert_eq!(state.movies[0].title, "Interstellar");
    assert_eq!(tracker.count("interstellar"), 1);
}

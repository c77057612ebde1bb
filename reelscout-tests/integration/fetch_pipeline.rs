//! Fetch stage against realistic payloads and the offline catalogue.

use reelscout_core::ApiConfig;
use reelscout_search::providers::MockProvider;
use reelscout_search::{
    DemoProvider, FetchOutcome, InMemoryTracker, MovieEndpoint, MovieListPayload, SearchTracker,
    fetch_movies,
};

const TMDB_SEARCH_PAGE: &str = r#"{
    "page": 1,
    "results": [
        {
            "adult": false,
            "id": 603,
            "title": "The Matrix",
            "original_language": "en",
            "poster_path": "/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg",
            "release_date": "1999-03-30",
            "vote_average": 8.2,
            "popularity": 80.4
        },
        {
            "id": 604,
            "title": "The Matrix Reloaded",
            "original_language": "en",
            "poster_path": null,
            "release_date": "",
            "vote_average": 7.0
        }
    ],
    "total_pages": 1,
    "total_results": 2
}"#;

#[test]
fn test_endpoint_urls_follow_movie_api_layout() {
    let base = ApiConfig::default().base_url;

    assert_eq!(
        MovieEndpoint::for_query("").url(&base),
        "https://api.themoviedb.org/3/discover/movie?sort_by=popularity.desc"
    );
    assert_eq!(
        MovieEndpoint::for_query("the dark knight").url(&base),
        "https://api.themoviedb.org/3/search/movie?query=the%20dark%20knight"
    );
    assert_eq!(
        MovieEndpoint::for_query("amélie & co").url(&base),
        "https://api.themoviedb.org/3/search/movie?query=am%C3%A9lie%20%26%20co"
    );
}

#[tokio::test]
async fn test_tmdb_payload_flows_to_results_and_tracking() {
    let payload: MovieListPayload = serde_json::from_str(TMDB_SEARCH_PAGE).unwrap();
    let endpoint = MovieEndpoint::for_query("matrix");
    let api = MockProvider::new().with_response(endpoint, Ok(payload));
    let tracker = InMemoryTracker::new(ApiConfig::default().image_base_url);

    let outcome = fetch_movies(&api, Some(&tracker), "matrix").await;

    let movies = outcome.movies();
    assert_eq!(movies.len(), 2);
    assert_eq!(movies[0].release_year(), Some(1999));
    assert_eq!(movies[1].release_year(), None);
    assert_eq!(movies[1].poster_url("https://img"), None);

    let trending = tracker.trending(1).await.unwrap();
    assert_eq!(trending[0].movie_id, 603);
    assert_eq!(
        trending[0].poster_url.as_deref(),
        Some("https://image.tmdb.org/t/p/w500/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg")
    );
}

#[tokio::test]
async fn test_status_message_failure_is_application_error() {
    let payload: MovieListPayload = serde_json::from_str(
        r#"{"success": false, "status_code": 7, "status_message": "Invalid API key: You must be granted a valid key."}"#,
    )
    .unwrap();
    let api = MockProvider::new().with_response(MovieEndpoint::Discover, Ok(payload));

    let outcome = fetch_movies(&api, None, "").await;

    let FetchOutcome::Failed(error) = outcome else {
        panic!("expected a failed fetch, got {outcome:?}");
    };
    assert_eq!(
        error.user_message(),
        "Invalid API key: You must be granted a valid key."
    );
}

#[tokio::test]
async fn test_demo_search_tolerates_typos() {
    let tracker = InMemoryTracker::default();

    let outcome = fetch_movies(&DemoProvider::new(), Some(&tracker), "intersteller").await;

    assert_eq!(outcome.movies()[0].id, 157336);
    assert_eq!(tracker.calls(), vec![("intersteller".to_string(), 157336)]);
}

#[tokio::test]
async fn test_whitespace_query_is_searched_not_discovered() {
    let api = MockProvider::new();

    let outcome = fetch_movies(&api, None, "  ").await;

    assert_eq!(outcome, FetchOutcome::Loaded(Vec::new()));
    assert_eq!(api.requests(), vec![MovieEndpoint::for_query("  ")]);
    assert_eq!(api.requests()[0].query(), Some("  "));
}

//! Debounced search cycle.
//!
//! An actor task owns the search state. Text updates go through the debounce
//! stage; each settled value issues a new request id and spawns the fetch
//! stage. Completions are applied only when they belong to the latest
//! request, so the most recently issued search always wins regardless of
//! which response arrives last.

use std::sync::Arc;
use std::time::Duration;

use reelscout_core::{Debouncer, RequestId, RequestSequence};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{Instant, sleep_until};

use crate::errors::MovieSearchError;
use crate::fetch::{FetchOutcome, fetch_movies};
use crate::providers::MovieApi;
use crate::state::SearchState;
use crate::tracking::SearchTracker;

const COMMAND_BUFFER: usize = 64;

enum CycleCommand {
    SetSearchText {
        text: String,
        responder: oneshot::Sender<()>,
    },
    Shutdown,
}

struct Completion {
    id: RequestId,
    term: String,
    outcome: FetchOutcome,
}

/// Builder for the search cycle actor.
#[derive(Debug)]
pub struct SearchCycle {
    api: Arc<dyn MovieApi>,
    tracker: Option<Arc<dyn SearchTracker>>,
    quiet_interval: Duration,
}

impl SearchCycle {
    /// Creates a cycle over `api`, reporting searches to `tracker`.
    pub fn new(
        api: Arc<dyn MovieApi>,
        tracker: Option<Arc<dyn SearchTracker>>,
        quiet_interval: Duration,
    ) -> Self {
        Self {
            api,
            tracker,
            quiet_interval,
        }
    }

    /// Starts the actor on the current tokio runtime.
    ///
    /// The initial fetch for empty text is issued immediately.
    pub fn spawn(self) -> SearchCycleHandle {
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_BUFFER);
        let (state_tx, state_rx) = watch::channel(SearchState::default());

        tokio::spawn(self.run(commands_rx, state_tx));

        SearchCycleHandle {
            commands: commands_tx,
            state: state_rx,
        }
    }

    async fn run(self, mut commands: mpsc::Receiver<CycleCommand>, state: watch::Sender<SearchState>) {
        let mut debouncer = Debouncer::new(String::new(), self.quiet_interval);
        let mut sequence = RequestSequence::default();
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completion>();

        self.start_fetch(String::new(), &mut sequence, &state, &done_tx);

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(CycleCommand::SetSearchText { text, responder }) => {
                        state.send_modify(|s| s.search_text = text.clone());
                        debouncer.push(text, Instant::now());
                        let _ = responder.send(());
                    }
                    Some(CycleCommand::Shutdown) | None => break,
                },
                () = wait_until(debouncer.deadline()) => {
                    if let Some(term) = debouncer.poll(Instant::now()) {
                        self.start_fetch(term, &mut sequence, &state, &done_tx);
                    }
                }
                Some(done) = done_rx.recv() => {
                    if sequence.is_latest(done.id) {
                        state.send_modify(|s| s.settle(done.outcome));
                    } else {
                        tracing::debug!(request = %done.id, term = %done.term, "Discarding stale search result");
                    }
                }
            }
        }

        tracing::debug!("Search cycle stopped");
    }

    fn start_fetch(
        &self,
        term: String,
        sequence: &mut RequestSequence,
        state: &watch::Sender<SearchState>,
        done: &mpsc::UnboundedSender<Completion>,
    ) {
        let id = sequence.issue();
        tracing::debug!(request = %id, term = %term, "Starting search");
        state.send_modify(|s| s.begin_fetch(id, &term));

        let api = Arc::clone(&self.api);
        let tracker = self.tracker.clone();
        let done = done.clone();
        tokio::spawn(async move {
            let outcome = fetch_movies(api.as_ref(), tracker.as_deref(), &term).await;
            // The receiver only goes away when the cycle itself has stopped.
            let _ = done.send(Completion { id, term, outcome });
        });
    }
}

/// Sleeps until `deadline`, or forever when there is none.
async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Handle for driving a running search cycle.
///
/// Cheap to clone; every clone talks to the same actor.
#[derive(Debug, Clone)]
pub struct SearchCycleHandle {
    commands: mpsc::Sender<CycleCommand>,
    state: watch::Receiver<SearchState>,
}

impl SearchCycleHandle {
    /// Replaces the raw search text, restarting the debounce timer.
    ///
    /// Returns once the cycle has recorded the text, so the next state
    /// snapshot already carries it.
    ///
    /// # Errors
    /// - `MovieSearchError::CycleClosed` - The cycle has shut down
    pub async fn set_search_text(&self, text: impl Into<String>) -> Result<(), MovieSearchError> {
        let (responder, rx) = oneshot::channel();
        let cmd = CycleCommand::SetSearchText {
            text: text.into(),
            responder,
        };

        self.commands
            .send(cmd)
            .await
            .map_err(|_| MovieSearchError::CycleClosed)?;

        rx.await.map_err(|_| MovieSearchError::CycleClosed)
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.clone()
    }

    /// Waits until the current search text has been fetched and no fetch is
    /// in flight, then returns that state.
    ///
    /// Text still inside its quiet interval counts as unsettled, so calling
    /// this right after [`set_search_text`](Self::set_search_text) waits for
    /// the debounce to fire and the resulting fetch to finish.
    ///
    /// # Errors
    /// - `MovieSearchError::CycleClosed` - The cycle stopped before settling
    pub async fn wait_until_settled(&self) -> Result<SearchState, MovieSearchError> {
        let mut receiver = self.state.clone();
        let settled = receiver
            .wait_for(SearchState::is_settled)
            .await
            .map_err(|_| MovieSearchError::CycleClosed)?;
        Ok(settled.clone())
    }

    /// Stops the actor. In-flight fetches finish but are no longer applied.
    ///
    /// # Errors
    /// - `MovieSearchError::CycleClosed` - The cycle had already shut down
    pub async fn shutdown(&self) -> Result<(), MovieSearchError> {
        self.commands
            .send(CycleCommand::Shutdown)
            .await
            .map_err(|_| MovieSearchError::CycleClosed)
    }
}

#[cfg(test)]
mod tests {
    use tokio_test::assert_ok;

    use super::*;
    use crate::endpoint::MovieEndpoint;
    use crate::errors::GENERIC_FETCH_ERROR;
    use crate::providers::MockProvider;
    use crate::providers::mock::sample_movie;
    use crate::state::View;
    use crate::tracking::{InMemoryTracker, TrendingSearch};
    use crate::types::{MovieListPayload, MovieSummary};

    const QUIET: Duration = Duration::from_millis(1000);

    /// Tracker that takes `delay` before every recorded search.
    #[derive(Debug)]
    struct SlowTracker {
        inner: InMemoryTracker,
        delay: Duration,
    }

    #[async_trait::async_trait]
    impl SearchTracker for SlowTracker {
        async fn record_search(&self, term: &str, top_movie: &MovieSummary) -> Result<(), MovieSearchError> {
            tokio::time::sleep(self.delay).await;
            self.inner.record_search(term, top_movie).await
        }

        async fn trending(&self, limit: usize) -> Result<Vec<TrendingSearch>, MovieSearchError> {
            self.inner.trending(limit).await
        }
    }

    fn spawn_cycle(api: Arc<MockProvider>, tracker: Option<Arc<InMemoryTracker>>) -> SearchCycleHandle {
        let tracker: Option<Arc<dyn SearchTracker>> = tracker.map(|t| t as Arc<dyn SearchTracker>);
        SearchCycle::new(api, tracker, QUIET).spawn()
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_fetch_discovers() {
        let api = Arc::new(
            MockProvider::new().with_movies(MovieEndpoint::Discover, vec![sample_movie(1, "Popular")]),
        );
        let handle = spawn_cycle(Arc::clone(&api), None);

        let state = assert_ok!(handle.wait_until_settled().await);

        assert_eq!(state.view().keys(), vec![1]);
        assert_eq!(api.requests(), vec![MovieEndpoint::Discover]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_burst_fetches_final_text_once() {
        let api = Arc::new(MockProvider::new().with_movies(
            MovieEndpoint::for_query("dark"),
            vec![sample_movie(155, "The Dark Knight")],
        ));
        let tracker = Arc::new(InMemoryTracker::default());
        let handle = spawn_cycle(Arc::clone(&api), Some(Arc::clone(&tracker)));
        assert_ok!(handle.wait_until_settled().await);

        for text in ["d", "da", "dar", "dark"] {
            assert_ok!(handle.set_search_text(text).await);
            tokio::time::sleep(Duration::from_millis(300)).await;
        }
        assert_eq!(api.requests().len(), 1);

        tokio::time::sleep(QUIET).await;
        let state = assert_ok!(handle.wait_until_settled().await);

        assert_eq!(
            api.requests(),
            vec![MovieEndpoint::Discover, MovieEndpoint::for_query("dark")]
        );
        assert_eq!(state.search_text, "dark");
        assert_eq!(state.debounced_text, "dark");
        assert_eq!(state.view().keys(), vec![155]);
        assert_eq!(tracker.calls(), vec![("dark".to_string(), 155)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_text_reverting_before_settle_does_not_refetch() {
        let api = Arc::new(MockProvider::new());
        let handle = spawn_cycle(Arc::clone(&api), None);
        assert_ok!(handle.wait_until_settled().await);

        assert_ok!(handle.set_search_text("x").await);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_ok!(handle.set_search_text("").await);
        tokio::time::sleep(QUIET * 3).await;

        assert_eq!(api.requests(), vec![MovieEndpoint::Discover]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_spans_the_whole_fetch() {
        let api = Arc::new(
            MockProvider::new()
                .with_movies(MovieEndpoint::Discover, vec![sample_movie(1, "Popular")])
                .with_delay(MovieEndpoint::Discover, Duration::from_secs(2)),
        );
        let handle = spawn_cycle(api, None);

        tokio::time::sleep(Duration::from_millis(1900)).await;
        assert_eq!(handle.state().view(), View::Loading);

        let state = assert_ok!(handle.wait_until_settled().await);
        assert!(!state.loading);
        assert_eq!(state.movies.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_holds_through_failed_fetch() {
        let api = Arc::new(
            MockProvider::new()
                .with_response(
                    MovieEndpoint::Discover,
                    Err(MovieSearchError::HttpStatus {
                        status: 500,
                        url: "https://api.test/3/discover/movie".to_string(),
                    }),
                )
                .with_delay(MovieEndpoint::Discover, Duration::from_secs(2)),
        );
        let handle = spawn_cycle(api, None);

        tokio::time::sleep(Duration::from_millis(1900)).await;
        assert_eq!(handle.state().view(), View::Loading);

        let state = assert_ok!(handle.wait_until_settled().await);
        assert_eq!(state.view(), View::Error(GENERIC_FETCH_ERROR));
        assert!(state.movies.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_holds_through_application_failure() {
        let endpoint = MovieEndpoint::for_query("zz");
        let api = Arc::new(
            MockProvider::new()
                .with_movies(MovieEndpoint::Discover, vec![sample_movie(1, "Popular")])
                .with_response(endpoint.clone(), Ok(MovieListPayload::failure("Movie not found!")))
                .with_delay(endpoint, Duration::from_secs(2)),
        );
        let handle = spawn_cycle(api, None);
        assert_ok!(handle.wait_until_settled().await);

        assert_ok!(handle.set_search_text("zz").await);
        tokio::time::sleep(QUIET + Duration::from_secs(1)).await;
        assert_eq!(handle.state().view(), View::Loading);

        let state = assert_ok!(handle.wait_until_settled().await);
        assert_eq!(state.view(), View::Error("Movie not found!"));
        assert!(state.movies.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_holds_until_tracking_returns() {
        let api = Arc::new(MockProvider::new().with_movies(
            MovieEndpoint::for_query("dark"),
            vec![sample_movie(155, "The Dark Knight")],
        ));
        let tracker = Arc::new(SlowTracker {
            inner: InMemoryTracker::default(),
            delay: Duration::from_secs(3),
        });
        let handle = SearchCycle::new(
            Arc::clone(&api) as Arc<dyn MovieApi>,
            Some(Arc::clone(&tracker) as Arc<dyn SearchTracker>),
            QUIET,
        )
        .spawn();
        assert_ok!(handle.wait_until_settled().await);

        assert_ok!(handle.set_search_text("dark").await);
        tokio::time::sleep(QUIET + Duration::from_secs(1)).await;

        // Results are in but the tracker has not answered yet.
        assert_eq!(api.requests().len(), 2);
        assert!(tracker.inner.calls().is_empty());
        assert_eq!(handle.state().view(), View::Loading);

        let state = assert_ok!(handle.wait_until_settled().await);
        assert_eq!(state.view().keys(), vec![155]);
        assert_eq!(tracker.inner.calls(), vec![("dark".to_string(), 155)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_wait_covers_text_still_debouncing() {
        let api = Arc::new(MockProvider::new().with_movies(
            MovieEndpoint::for_query("heat"),
            vec![sample_movie(949, "Heat")],
        ));
        let handle = spawn_cycle(Arc::clone(&api), None);
        assert_ok!(handle.wait_until_settled().await);

        assert_ok!(handle.set_search_text("heat").await);
        assert_eq!(handle.state().search_text, "heat");
        let state = assert_ok!(handle.wait_until_settled().await);

        assert_eq!(state.debounced_text, "heat");
        assert_eq!(state.view().keys(), vec![949]);
        assert_eq!(
            api.requests(),
            vec![MovieEndpoint::Discover, MovieEndpoint::for_query("heat")]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_latest_issued_search_wins() {
        let slow = MovieEndpoint::for_query("slow");
        let fast = MovieEndpoint::for_query("fast");
        let api = Arc::new(
            MockProvider::new()
                .with_movies(slow.clone(), vec![sample_movie(1, "Slow Movie")])
                .with_delay(slow, Duration::from_secs(5))
                .with_movies(fast, vec![sample_movie(2, "Fast Movie")]),
        );
        let handle = spawn_cycle(Arc::clone(&api), None);
        assert_ok!(handle.wait_until_settled().await);

        assert_ok!(handle.set_search_text("slow").await);
        tokio::time::sleep(QUIET + Duration::from_millis(100)).await;
        assert!(handle.state().loading);

        assert_ok!(handle.set_search_text("fast").await);
        tokio::time::sleep(QUIET + Duration::from_millis(100)).await;
        assert_eq!(handle.state().view().keys(), vec![2]);

        // The slow response lands afterwards and must be ignored.
        tokio::time::sleep(Duration::from_secs(10)).await;
        let state = handle.state();
        assert_eq!(state.view().keys(), vec![2]);
        assert_eq!(state.debounced_text, "fast");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_completion_keeps_loading() {
        let first = MovieEndpoint::for_query("first");
        let second = MovieEndpoint::for_query("second");
        let api = Arc::new(
            MockProvider::new()
                .with_movies(first.clone(), vec![sample_movie(1, "First")])
                .with_delay(first, Duration::from_secs(3))
                .with_movies(second.clone(), vec![sample_movie(2, "Second")])
                .with_delay(second, Duration::from_secs(4)),
        );
        let handle = spawn_cycle(api, None);
        assert_ok!(handle.wait_until_settled().await);

        assert_ok!(handle.set_search_text("first").await);
        tokio::time::sleep(QUIET + Duration::from_millis(100)).await;
        assert_ok!(handle.set_search_text("second").await);
        tokio::time::sleep(Duration::from_millis(3400)).await;

        // "first" has completed but "second" is still in flight.
        let state = handle.state();
        assert_eq!(state.view(), View::Loading);
        assert!(state.movies.is_empty());

        let state = assert_ok!(handle.wait_until_settled().await);
        assert_eq!(state.view().keys(), vec![2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_closes_handle() {
        let handle = spawn_cycle(Arc::new(MockProvider::new()), None);
        assert_ok!(handle.shutdown().await);
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(
            handle.set_search_text("late").await,
            Err(MovieSearchError::CycleClosed)
        );
    }
}

//! CLI command implementations

use std::sync::Arc;
use std::time::Duration;

use clap::Subcommand;
use reelscout_core::{ReelscoutConfig, ReelscoutError, RequestSequence, Result};
use reelscout_search::{
    AppwriteTracker, DemoProvider, FetchOutcome, InMemoryTracker, MovieApi, SearchCycle,
    SearchState, SearchTracker, TmdbProvider, fetch_movies,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::render::{render_trending, render_view};

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Search movies by title
    Search {
        /// Search text
        query: String,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// List popular movies
    Discover {
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search as you type; every stdin line replaces the search text
    Interactive,
    /// Show the most searched terms
    Trending {
        /// Number of entries to show
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },
}

/// Provider and tracker selected for this run.
struct Services {
    api: Arc<dyn MovieApi>,
    tracker: Arc<dyn SearchTracker>,
    image_base_url: String,
}

impl Services {
    fn from_config(config: &ReelscoutConfig, demo: bool) -> Result<Self> {
        let image_base_url = config.api.image_base_url.clone();

        let api: Arc<dyn MovieApi> = if demo {
            tracing::info!("Using offline demo catalogue");
            Arc::new(DemoProvider::new())
        } else {
            if config.api.bearer_token.is_none() {
                tracing::warn!("TMDB_API_KEY is not set; requests will likely be rejected");
            }
            Arc::new(TmdbProvider::new(&config.api).map_err(ReelscoutError::from_search_error)?)
        };

        let tracker: Arc<dyn SearchTracker> = match (&config.tracking, demo) {
            (Some(tracking), false) => {
                tracing::info!(endpoint = %tracking.endpoint, "Recording searches in Appwrite");
                Arc::new(AppwriteTracker::new(tracking.clone(), image_base_url.clone()))
            }
            _ => {
                tracing::debug!("Recording searches in memory for this run");
                Arc::new(InMemoryTracker::new(image_base_url.clone()))
            }
        };

        Ok(Self {
            api,
            tracker,
            image_base_url,
        })
    }
}

/// Handle the CLI command
///
/// # Errors
/// - `ReelscoutError::Search` - Fetch or tracking backend failed
/// - `ReelscoutError::Io` - Reading stdin or writing output failed
pub async fn handle_command(command: Commands, config: &ReelscoutConfig, demo: bool) -> Result<()> {
    let services = Services::from_config(config, demo)?;

    match command {
        Commands::Search { query, json } => run_once(&services, &query, json).await,
        Commands::Discover { json } => run_once(&services, "", json).await,
        Commands::Interactive => run_interactive(&services, config.debounce.quiet_interval).await,
        Commands::Trending { limit } => show_trending(&services, limit).await,
    }
}

/// Fetch once for `query` and print the resulting view
///
/// # Errors
/// - `ReelscoutError::Search` - The fetch failed
async fn run_once(services: &Services, query: &str, json: bool) -> Result<()> {
    let mut sequence = RequestSequence::default();
    let mut state = SearchState::default();
    state.begin_fetch(sequence.issue(), query);

    let outcome = fetch_movies(
        services.api.as_ref(),
        Some(services.tracker.as_ref()),
        query,
    )
    .await;
    let failure = outcome.error().cloned();

    if json && let FetchOutcome::Loaded(movies) = &outcome {
        let rendered = serde_json::to_string_pretty(movies).map_err(|e| {
            ReelscoutError::from_search_error(format!("Failed to encode results: {e}"))
        })?;
        println!("{rendered}");
    }

    state.settle(outcome);
    if !json && failure.is_none() {
        println!("{}", render_view(&state.view(), &services.image_base_url));
    }

    match failure {
        Some(error) => Err(ReelscoutError::Search {
            reason: error.user_message(),
        }),
        None => Ok(()),
    }
}

/// Drive the debounced search cycle from stdin
///
/// # Errors
/// - `ReelscoutError::Io` - Reading stdin failed
/// - `ReelscoutError::Search` - The search cycle stopped unexpectedly
async fn run_interactive(services: &Services, quiet_interval: Duration) -> Result<()> {
    let cycle = SearchCycle::new(
        Arc::clone(&services.api),
        Some(Arc::clone(&services.tracker)),
        quiet_interval,
    );
    let handle = cycle.spawn();

    let mut states = handle.subscribe();
    let image_base_url = services.image_base_url.clone();
    let printer = tokio::spawn(async move {
        let mut last_rendered = String::new();
        loop {
            let rendered = {
                let state = states.borrow_and_update();
                render_view(&state.view(), &image_base_url)
            };
            if rendered != last_rendered {
                println!("{rendered}\n");
                last_rendered = rendered;
            }
            if states.changed().await.is_err() {
                break;
            }
        }
    });

    println!("Type to search; an empty line lists popular movies. Ctrl-D quits.\n");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        tracing::trace!(text = %line, "Search text changed");
        handle
            .set_search_text(line.trim_end())
            .await
            .map_err(ReelscoutError::from_search_error)?;
    }

    // Let the last line debounce and finish before quitting.
    handle
        .wait_until_settled()
        .await
        .map_err(ReelscoutError::from_search_error)?;
    handle
        .shutdown()
        .await
        .map_err(ReelscoutError::from_search_error)?;

    if let Err(e) = printer.await {
        tracing::warn!(error = %e, "Renderer task ended abnormally");
    }
    Ok(())
}

/// Show the most searched terms
///
/// # Errors
/// - `ReelscoutError::Search` - Tracking backend failed
async fn show_trending(services: &Services, limit: usize) -> Result<()> {
    let entries = services
        .tracker
        .trending(limit)
        .await
        .map_err(ReelscoutError::from_search_error)?;

    println!("Trending searches");
    println!("{:-<40}", "");
    println!("{}", render_trending(&entries));

    Ok(())
}

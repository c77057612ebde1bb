//! Integration tests for Reelscout
//!
//! These tests drive the search pipeline through the public API of the
//! workspace crates: configuration feeding the cycle, the cycle feeding the
//! fetch stage, and the fetch stage feeding search tracking.

#[path = "integration/fetch_pipeline.rs"]
mod fetch_pipeline;
#[path = "integration/search_cycle.rs"]
mod search_cycle;
#[path = "integration/search_tracking.rs"]
mod search_tracking;

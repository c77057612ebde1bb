//! Style Enforcement Tests
//!
//! Scans the production sources of every workspace crate for patterns clippy
//! does not reject on its own.
//!
//! - `production_code` - No dead code allowances and no panicking unwraps
//!   outside test modules

#[path = "style/production_code.rs"]
mod production_code;

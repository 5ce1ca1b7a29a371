#![forbid(unsafe_code)]

//! Core domain model and business logic for the Gymlog tracker.
//!
//! This crate provides:
//! - Domain types (workout entries, body parts, routines, foods, diet logs)
//! - The persistent slot store
//! - Workout log filtering and views
//! - Routine expansion and weekly scheduling
//! - Diet aggregation
//! - Snapshot import/export and CSV export

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod store;
pub mod log_engine;
pub mod schedule;
pub mod diet;
pub mod snapshot;
pub mod csv_export;
pub mod state;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{defaults, Defaults, PLACEHOLDER_IMAGE};
pub use config::Config;
pub use store::Store;
pub use schedule::{expand_routine, resolve_scheduled_routine, AUTO_LOG_COMMENT};
pub use diet::daily_totals;
pub use snapshot::SnapshotDocument;
pub use state::AppState;

//! Core domain logic for ecolog.
//! This crate is the single source of truth for business invariants.

pub mod chart;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use chart::series::{aggregate, ChartBucket};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::activity::{
    now_epoch_ms, Activity, ActivityId, ActivityValidationError, Category,
};
pub use repo::activity_repo::{
    ActivityRepository, RepoError, RepoResult, SqliteActivityRepository,
};
pub use service::activity_service::ActivityService;
pub use service::live_query::{ActivityLiveQuery, SubscriptionHandle};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

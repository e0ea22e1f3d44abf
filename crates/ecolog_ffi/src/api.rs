//! FFI use-case API for Flutter-facing dashboard calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Restate the input-widget constraints (category set, impact range) so
//!   the boundary never trusts UI-side checks alone.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Responses are deterministic envelopes with `ok`/`message` semantics.

use ecolog_core::db::open_db;
use ecolog_core::{
    aggregate, core_version as core_version_inner, init_logging as init_logging_inner,
    ping as ping_inner, Activity, ActivityService, Category, ChartBucket, RepoResult,
    SqliteActivityRepository,
};
use std::path::PathBuf;
use std::sync::OnceLock;
use uuid::Uuid;

/// Impact slider lower bound in kg CO2e.
const IMPACT_MIN_KG: f64 = 0.1;
/// Impact slider upper bound in kg CO2e.
const IMPACT_MAX_KG: f64 = 30.0;
const DASHBOARD_DB_FILE_NAME: &str = "ecolog.sqlite3";
static DASHBOARD_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on
///   failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One list row of the dashboard, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityListItem {
    /// Stable activity ID in string form.
    pub id: String,
    pub name: String,
    /// Category label (`transport|food|home|energy`).
    pub category: String,
    pub carbon_kg: f64,
    /// Impact pre-formatted for display, e.g. `"12.5 kg"`.
    pub impact_label: String,
    pub created_at_ms: i64,
}

/// One summed chart bar segment.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    /// UTC calendar day as `YYYY-MM-DD`.
    pub day: String,
    /// Category label (`transport|food|home|energy`).
    pub category: String,
    pub total_kg: f64,
}

/// Full dashboard render state for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub items: Vec<ActivityListItem>,
    pub chart: Vec<ChartPoint>,
    /// True when the empty-state message should render instead of the list.
    pub is_empty: bool,
    /// Human-readable status for diagnostics/UI.
    pub message: String,
}

/// Generic action response envelope for dashboard mutations.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Affected activity ID, when one applies.
    pub activity_id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl DashboardActionResponse {
    fn success(message: impl Into<String>, activity_id: Option<String>) -> Self {
        Self {
            ok: true,
            activity_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            activity_id: None,
            message: message.into(),
        }
    }
}

/// Returns the current dashboard state: list rows plus chart series.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; storage failures surface in `message` with empty content.
#[flutter_rust_bridge::frb(sync)]
pub fn dashboard_snapshot() -> DashboardSnapshot {
    match with_activity_service(|service| service.list_activities()) {
        Ok(activities) => {
            let chart = aggregate(&activities)
                .into_iter()
                .map(to_chart_point)
                .collect();
            let items: Vec<ActivityListItem> =
                activities.into_iter().map(to_list_item).collect();
            let is_empty = items.is_empty();
            let message = if is_empty {
                "No activities logged yet.".to_string()
            } else {
                format!("{} activity(ies) logged.", items.len())
            };
            DashboardSnapshot {
                items,
                chart,
                is_empty,
                message,
            }
        }
        Err(err) => DashboardSnapshot {
            items: Vec::new(),
            chart: Vec::new(),
            is_empty: true,
            message: format!("dashboard_snapshot failed: {err}"),
        },
    }
}

/// Logs a new activity from the input form.
///
/// # FFI contract
/// - Rejects unknown category labels and impacts outside the slider range
///   before touching storage; the core store re-validates name/finiteness.
/// - Never panics; returns the created activity ID on success.
#[flutter_rust_bridge::frb(sync)]
pub fn dashboard_add_activity(
    name: String,
    category: String,
    impact_kg: f64,
) -> DashboardActionResponse {
    let Some(category) = parse_category_label(&category) else {
        return DashboardActionResponse::failure(format!(
            "unknown category `{category}`; expected transport|food|home|energy"
        ));
    };
    if !(IMPACT_MIN_KG..=IMPACT_MAX_KG).contains(&impact_kg) {
        return DashboardActionResponse::failure(format!(
            "impact must be between {IMPACT_MIN_KG} and {IMPACT_MAX_KG} kg, got {impact_kg}"
        ));
    }

    match with_activity_service(|service| {
        service.add_activity(name.trim().to_string(), category, impact_kg)
    }) {
        Ok(activity) => DashboardActionResponse::success(
            "Activity logged.",
            Some(activity.uuid.to_string()),
        ),
        Err(err) => {
            DashboardActionResponse::failure(format!("dashboard_add_activity failed: {err}"))
        }
    }
}

/// Deletes one activity by stable ID.
///
/// # FFI contract
/// - Deleting an ID that is already gone still reports `ok`; the live view
///   the user swiped on may trail the store by one refresh.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn dashboard_delete_activity(activity_id: String) -> DashboardActionResponse {
    let Ok(id) = Uuid::parse_str(activity_id.trim()) else {
        return DashboardActionResponse::failure(format!(
            "malformed activity id `{activity_id}`"
        ));
    };

    match with_activity_service(|service| service.delete_activity(id)) {
        Ok(true) => DashboardActionResponse::success("Activity removed.", Some(id.to_string())),
        Ok(false) => DashboardActionResponse::success("Activity was already removed.", None),
        Err(err) => {
            DashboardActionResponse::failure(format!("dashboard_delete_activity failed: {err}"))
        }
    }
}

/// Deletes the activity at `index` in the newest-first dashboard list.
///
/// # FFI contract
/// - The index is resolved to a stable ID inside one call, so swipe-to-delete
///   removes the row the user saw or nothing at all.
/// - Out-of-range indices report `ok` with no removal.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn dashboard_delete_at(index: u32) -> DashboardActionResponse {
    let outcome = with_activity_service(|service| {
        let view = service.list_activities()?;
        match view.get(index as usize) {
            Some(target) => {
                let removed = service.delete_activity(target.uuid)?;
                Ok(removed.then_some(target.uuid))
            }
            None => Ok(None),
        }
    });

    match outcome {
        Ok(Some(id)) => DashboardActionResponse::success("Activity removed.", Some(id.to_string())),
        Ok(None) => DashboardActionResponse::success("Nothing to remove at that position.", None),
        Err(err) => DashboardActionResponse::failure(format!("dashboard_delete_at failed: {err}")),
    }
}

/// Removes every logged activity.
///
/// # FFI contract
/// - Storage failures surface as `ok=false` rather than being swallowed.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn dashboard_clear() -> DashboardActionResponse {
    match with_activity_service(|service| service.clear_activities()) {
        Ok(removed) => {
            DashboardActionResponse::success(format!("Removed {removed} activity(ies)."), None)
        }
        Err(err) => DashboardActionResponse::failure(format!("dashboard_clear failed: {err}")),
    }
}

fn resolve_dashboard_db_path() -> PathBuf {
    DASHBOARD_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("ECOLOG_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DASHBOARD_DB_FILE_NAME)
        })
        .clone()
}

fn with_activity_service<T>(
    f: impl FnOnce(&ActivityService<SqliteActivityRepository<'_>>) -> RepoResult<T>,
) -> Result<T, String> {
    let db_path = resolve_dashboard_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("dashboard DB open failed: {err}"))?;
    let repo = SqliteActivityRepository::try_new(&conn)
        .map_err(|err| format!("dashboard repo init failed: {err}"))?;
    let service = ActivityService::new(repo);
    f(&service).map_err(|err| err.to_string())
}

fn to_list_item(activity: Activity) -> ActivityListItem {
    ActivityListItem {
        id: activity.uuid.to_string(),
        name: activity.name,
        category: category_label(activity.category).to_string(),
        carbon_kg: activity.carbon_kg,
        impact_label: format!("{:.1} kg", activity.carbon_kg),
        created_at_ms: activity.created_at_ms,
    }
}

fn to_chart_point(bucket: ChartBucket) -> ChartPoint {
    ChartPoint {
        day: bucket.day.format("%Y-%m-%d").to_string(),
        category: category_label(bucket.category).to_string(),
        total_kg: bucket.total_kg,
    }
}

fn category_label(category: Category) -> &'static str {
    match category {
        Category::Transport => "transport",
        Category::Food => "food",
        Category::Home => "home",
        Category::Energy => "energy",
    }
}

fn parse_category_label(value: &str) -> Option<Category> {
    match value.trim().to_ascii_lowercase().as_str() {
        "transport" => Some(Category::Transport),
        "food" => Some(Category::Food),
        "home" => Some(Category::Home),
        "energy" => Some(Category::Energy),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, dashboard_add_activity, dashboard_clear, dashboard_delete_activity,
        dashboard_delete_at, dashboard_snapshot, init_logging, ping,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn add_rejects_unknown_category_label() {
        let response =
            dashboard_add_activity("Sailing".to_string(), "aviation".to_string(), 2.0);
        assert!(!response.ok);
        assert!(response.message.contains("unknown category"));
    }

    #[test]
    fn add_rejects_impact_outside_slider_range() {
        let too_small = dashboard_add_activity("Walk".to_string(), "transport".to_string(), 0.05);
        assert!(!too_small.ok);

        let too_large =
            dashboard_add_activity("Rocket".to_string(), "transport".to_string(), 30.5);
        assert!(!too_large.ok);

        let not_a_number =
            dashboard_add_activity("Glitch".to_string(), "transport".to_string(), f64::NAN);
        assert!(!not_a_number.ok);
    }

    #[test]
    fn delete_rejects_malformed_activity_id() {
        let response = dashboard_delete_activity("not-a-uuid".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("malformed"));
    }

    // DB-touching flows share one process-wide database file, so they run as
    // a single scenario instead of racing each other across test threads.
    #[test]
    fn dashboard_round_trip_scenario() {
        let cleared = dashboard_clear();
        assert!(cleared.ok, "{}", cleared.message);

        let token = unique_token("dashboard");
        let flight = dashboard_add_activity(
            format!("Flight {token}"),
            "transport".to_string(),
            12.5,
        );
        assert!(flight.ok, "{}", flight.message);
        let flight_id = flight.activity_id.expect("created flight should return id");

        let lunch =
            dashboard_add_activity(format!("Lunch {token}"), "food".to_string(), 3.2);
        assert!(lunch.ok, "{}", lunch.message);

        let snapshot = dashboard_snapshot();
        assert!(!snapshot.is_empty);
        assert_eq!(snapshot.items.len(), 2);
        assert!(snapshot.items[0].name.starts_with("Lunch"), "newest first");
        assert_eq!(snapshot.items[0].impact_label, "3.2 kg");
        assert_eq!(snapshot.items[1].impact_label, "12.5 kg");

        let categories: Vec<&str> = snapshot
            .chart
            .iter()
            .map(|point| point.category.as_str())
            .collect();
        assert_eq!(categories, vec!["transport", "food"]);

        let removed = dashboard_delete_activity(flight_id);
        assert!(removed.ok, "{}", removed.message);
        let snapshot = dashboard_snapshot();
        assert_eq!(snapshot.items.len(), 1);

        let swiped = dashboard_delete_at(0);
        assert!(swiped.ok, "{}", swiped.message);
        assert!(swiped.activity_id.is_some());

        let snapshot = dashboard_snapshot();
        assert!(snapshot.is_empty);
        assert!(snapshot.chart.is_empty());

        let out_of_range = dashboard_delete_at(42);
        assert!(out_of_range.ok);
        assert!(out_of_range.activity_id.is_none());
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}

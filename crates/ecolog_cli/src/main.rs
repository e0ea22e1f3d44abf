//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `ecolog_core` linkage.
//! - Drive the live query end-to-end against an in-memory store so the
//!   reactive path can be checked without the Flutter runtime.

use ecolog_core::db::open_db_in_memory;
use ecolog_core::{
    aggregate, ActivityLiveQuery, ActivityService, Category, SqliteActivityRepository,
};

fn main() {
    println!("ecolog_core ping={}", ecolog_core::ping());
    println!("ecolog_core version={}", ecolog_core::core_version());

    if let Err(err) = run_live_demo() {
        eprintln!("live demo failed: {err}");
        std::process::exit(1);
    }
}

fn run_live_demo() -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_db_in_memory()?;
    let repo = SqliteActivityRepository::try_new(&conn)?;
    let live = ActivityLiveQuery::new(ActivityService::new(repo));

    let subscription = live.subscribe(|view| {
        println!("live view: {} record(s)", view.len());
    })?;

    live.add_activity("Commute by bus", Category::Transport, 1.8)?;
    live.add_activity("Vegetarian lunch", Category::Food, 0.9)?;

    for bucket in aggregate(&live.snapshot()?) {
        println!(
            "chart: {} {:?} {:.1} kg",
            bucket.day, bucket.category, bucket.total_kg
        );
    }

    live.unsubscribe(subscription);
    live.clear_activities()?;
    Ok(())
}

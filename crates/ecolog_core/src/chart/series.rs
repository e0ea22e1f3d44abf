//! Day/category bucket aggregation for the dashboard chart.
//!
//! # Responsibility
//! - Sum carbon impact per (calendar day, category) bucket.
//! - Emit buckets in stable render order: day ascending, then canonical
//!   category order.
//!
//! # Invariants
//! - Days are bucketed on the UTC calendar, so buckets do not shift when the
//!   device changes time zones.
//! - Empty input yields an empty series, never an error.

use crate::model::activity::{Activity, Category};
use chrono::{DateTime, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// One summed (day, category) chart bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBucket {
    /// UTC calendar day derived from record creation time.
    pub day: NaiveDate,
    pub category: Category,
    /// Sum of `carbon_kg` over all records in the bucket.
    pub total_kg: f64,
}

/// Aggregates records into summed chart buckets.
///
/// Buckets are summed rather than emitted per record: a day with five
/// transport entries renders as one bar segment, which is the useful
/// analytic view for a personal dashboard.
pub fn aggregate(activities: &[Activity]) -> Vec<ChartBucket> {
    let mut totals: BTreeMap<(NaiveDate, Category), f64> = BTreeMap::new();

    for activity in activities {
        // Store-assigned timestamps are always representable; anything else
        // came from outside and is skipped rather than mis-bucketed.
        let Some(day) = bucket_day(activity.created_at_ms) else {
            continue;
        };
        *totals.entry((day, activity.category)).or_insert(0.0) += activity.carbon_kg;
    }

    totals
        .into_iter()
        .map(|((day, category), total_kg)| ChartBucket {
            day,
            category,
            total_kg,
        })
        .collect()
}

/// UTC calendar day containing the given epoch-milliseconds instant.
fn bucket_day(epoch_ms: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(epoch_ms).map(|instant| instant.date_naive())
}

//! Chart series derivation from logged activities.
//!
//! # Responsibility
//! - Transform record sequences into day/category bucketed chart data.
//!
//! # Invariants
//! - Aggregation is pure: no storage access, no clock reads.

pub mod series;

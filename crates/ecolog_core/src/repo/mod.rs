//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `Activity::validate()` before persistence.
//! - Deleting an absent record is a successful no-op, never an error: deletes
//!   arrive from a live view that may trail the store by one notification.

pub mod activity_repo;

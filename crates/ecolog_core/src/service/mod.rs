//! Use-case services orchestrating repositories and the live view.
//!
//! # Responsibility
//! - Provide storage-agnostic entry points for activity use-cases.
//! - Host the observer layer that keeps UI consumers current.

pub mod activity_service;
pub mod live_query;

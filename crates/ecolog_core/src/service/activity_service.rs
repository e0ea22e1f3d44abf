//! Activity use-case service.
//!
//! # Responsibility
//! - Provide stable add/delete/clear/list entry points for core callers.
//! - Own record construction: callers never supply ids or timestamps.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::activity::{Activity, ActivityId, Category};
use crate::repo::activity_repo::{ActivityRepository, RepoResult};
use log::info;

/// Use-case service wrapper for activity store operations.
pub struct ActivityService<R: ActivityRepository> {
    repo: R,
}

impl<R: ActivityRepository> ActivityService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Logs a new activity.
    ///
    /// # Contract
    /// - Generates a fresh stable ID and creation timestamp.
    /// - Rejects empty names and non-finite or non-positive impacts before
    ///   any storage write.
    /// - The record is durable when this returns `Ok`.
    pub fn add_activity(
        &self,
        name: impl Into<String>,
        category: Category,
        carbon_kg: f64,
    ) -> RepoResult<Activity> {
        let activity = Activity::new(name, category, carbon_kg)?;
        self.repo.create_activity(&activity)?;
        info!(
            "event=activity_add module=service status=ok category={:?} carbon_kg={:.1}",
            activity.category, activity.carbon_kg
        );
        Ok(activity)
    }

    /// Deletes one activity by stable ID.
    ///
    /// Deleting an already-absent ID succeeds and returns `false`.
    pub fn delete_activity(&self, id: ActivityId) -> RepoResult<bool> {
        self.repo.delete_activity(id)
    }

    /// Removes every logged activity.
    ///
    /// Storage failures propagate; a partial clear is never reported as
    /// success.
    pub fn clear_activities(&self) -> RepoResult<usize> {
        let removed = self.repo.delete_all_activities()?;
        info!("event=activity_clear module=service status=ok removed={removed}");
        Ok(removed)
    }

    /// Lists all activities, newest first.
    pub fn list_activities(&self) -> RepoResult<Vec<Activity>> {
        self.repo.list_activities()
    }
}

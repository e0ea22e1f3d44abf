//! Live query over the activity store.
//!
//! # Responsibility
//! - Maintain an always-current, newest-first view of all activities.
//! - Notify subscribers synchronously after every mutation.
//!
//! # Invariants
//! - Every delivered view is fully re-read from storage and sorted newest
//!   first; subscribers never observe a torn intermediate state.
//! - Mutations and their notification fan-out are serialized behind one lock.
//! - Subscribers receive the current view once at subscription time, before
//!   `subscribe` returns.

use crate::model::activity::{Activity, ActivityId, Category};
use crate::repo::activity_repo::{ActivityRepository, RepoResult};
use crate::service::activity_service::ActivityService;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Opaque subscription identity returned by `subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

type SubscriberCallback = Box<dyn FnMut(&[Activity]) + Send>;

/// Observer layer delivering whole-view snapshots on every store change.
///
/// Deliveries recompute the full sorted view rather than diffing; the
/// expected dataset is a personal log of at most a few hundred records.
pub struct ActivityLiveQuery<R: ActivityRepository> {
    inner: Mutex<LiveQueryInner<R>>,
}

struct LiveQueryInner<R: ActivityRepository> {
    service: ActivityService<R>,
    subscribers: BTreeMap<u64, SubscriberCallback>,
    next_handle: u64,
}

impl<R: ActivityRepository> ActivityLiveQuery<R> {
    /// Wraps a service so every mutation flows through this layer.
    pub fn new(service: ActivityService<R>) -> Self {
        Self {
            inner: Mutex::new(LiveQueryInner {
                service,
                subscribers: BTreeMap::new(),
                next_handle: 1,
            }),
        }
    }

    /// Registers a callback for view updates.
    ///
    /// The callback runs once with the current view before this returns, and
    /// again after every mutation until `unsubscribe`.
    pub fn subscribe(
        &self,
        callback: impl FnMut(&[Activity]) + Send + 'static,
    ) -> RepoResult<SubscriptionHandle> {
        let mut inner = self.lock_inner();
        let snapshot = inner.service.list_activities()?;

        let mut callback: SubscriberCallback = Box::new(callback);
        callback(&snapshot);

        let handle = inner.next_handle;
        inner.next_handle += 1;
        inner.subscribers.insert(handle, callback);
        Ok(SubscriptionHandle(handle))
    }

    /// Stops notifications for a subscription.
    ///
    /// Unknown or already-removed handles are a no-op.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) {
        self.lock_inner().subscribers.remove(&handle.0);
    }

    /// Number of active subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.lock_inner().subscribers.len()
    }

    /// Logs a new activity and notifies all subscribers.
    pub fn add_activity(
        &self,
        name: impl Into<String>,
        category: Category,
        carbon_kg: f64,
    ) -> RepoResult<Activity> {
        let mut inner = self.lock_inner();
        let created = inner.service.add_activity(name, category, carbon_kg)?;
        inner.notify_all()?;
        Ok(created)
    }

    /// Deletes one activity by stable ID and notifies all subscribers.
    pub fn delete_activity(&self, id: ActivityId) -> RepoResult<bool> {
        let mut inner = self.lock_inner();
        let removed = inner.service.delete_activity(id)?;
        inner.notify_all()?;
        Ok(removed)
    }

    /// Deletes the record at `index` in the current newest-first view.
    ///
    /// The index is resolved to a stable ID before deletion, so a view that
    /// trails the store by one notification deletes the intended record or
    /// nothing at all. Out-of-range indices return `false` without
    /// notification.
    pub fn delete_activity_at(&self, index: usize) -> RepoResult<bool> {
        let mut inner = self.lock_inner();
        let snapshot = inner.service.list_activities()?;
        let Some(target) = snapshot.get(index) else {
            return Ok(false);
        };

        let removed = inner.service.delete_activity(target.uuid)?;
        inner.notify_all()?;
        Ok(removed)
    }

    /// Removes every activity and notifies all subscribers.
    pub fn clear_activities(&self) -> RepoResult<usize> {
        let mut inner = self.lock_inner();
        let removed = inner.service.clear_activities()?;
        inner.notify_all()?;
        Ok(removed)
    }

    /// Returns the current newest-first view without subscribing.
    pub fn snapshot(&self) -> RepoResult<Vec<Activity>> {
        self.lock_inner().service.list_activities()
    }

    fn lock_inner(&self) -> MutexGuard<'_, LiveQueryInner<R>> {
        // A poisoned lock only means a subscriber panicked mid-delivery; the
        // durable store state is still consistent, so keep serving.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<R: ActivityRepository> LiveQueryInner<R> {
    fn notify_all(&mut self) -> RepoResult<()> {
        let snapshot = self.service.list_activities()?;
        for callback in self.subscribers.values_mut() {
            callback(&snapshot);
        }
        Ok(())
    }
}

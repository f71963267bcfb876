//! # Notification State
//!
//! The header bell: fetched notifications plus the unread badge.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pharmacy_core::{Notification, NotificationCount, NotificationFeed};
use tracing::debug;

#[derive(Debug, Default)]
pub struct NotificationState {
    feed: Arc<Mutex<NotificationFeed>>,
}

impl NotificationState {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, NotificationFeed> {
        self.feed.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn load(&self, notifications: Vec<Notification>) {
        debug!(count = notifications.len(), "Loading notifications");
        let mut feed = self.lock();
        *feed = feed.load(notifications);
    }

    pub fn set_unread_count(&self, count: NotificationCount) {
        let mut feed = self.lock();
        *feed = feed.set_unread_count(count);
    }

    /// Applied once the backend confirms mark-all-read.
    pub fn mark_all_read(&self) {
        let mut feed = self.lock();
        debug!(cleared = feed.unread_count(), "Marking notifications read");
        *feed = feed.mark_all_read();
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.lock().notifications().to_vec()
    }

    pub fn unread_count(&self) -> u64 {
        self.lock().unread_count()
    }
}

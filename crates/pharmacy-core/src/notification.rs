//! # Notification Feed
//!
//! Header bell contents: the fetched notifications and the unread badge.
//!
//! The badge count comes from its own endpoint, so loading the list does
//! not recount it. Only [`NotificationFeed::mark_all_read`] touches both.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One notification, e.g. a low-stock or expiry alert raised by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Notification {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub is_read: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<FixedOffset>>,
}

/// Body of the unread-count endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NotificationCount {
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationFeed {
    notifications: Vec<Notification>,
    unread_count: u64,
}

impl NotificationFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the list. The badge count is left as it was.
    pub fn load(&self, notifications: Vec<Notification>) -> Self {
        NotificationFeed {
            notifications,
            unread_count: self.unread_count,
        }
    }

    pub fn set_unread_count(&self, count: NotificationCount) -> Self {
        NotificationFeed {
            unread_count: count.count,
            ..self.clone()
        }
    }

    /// Zeroes the badge and flags every notification as read.
    ///
    /// ## Example
    /// ```rust
    /// use pharmacy_core::notification::{Notification, NotificationCount, NotificationFeed};
    ///
    /// let feed = NotificationFeed::new()
    ///     .load(vec![Notification::default()])
    ///     .set_unread_count(NotificationCount { count: 1 })
    ///     .mark_all_read();
    /// assert_eq!(feed.unread_count(), 0);
    /// assert!(feed.notifications()[0].is_read);
    /// ```
    pub fn mark_all_read(&self) -> Self {
        NotificationFeed {
            notifications: self
                .notifications
                .iter()
                .map(|n| Notification {
                    is_read: true,
                    ..n.clone()
                })
                .collect(),
            unread_count: 0,
        }
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn unread_count(&self) -> u64 {
        self.unread_count
    }

    /// Loaded notifications not yet read, in list order.
    pub fn unread(&self) -> Vec<&Notification> {
        self.notifications.iter().filter(|n| !n.is_read).collect()
    }
}

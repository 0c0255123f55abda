//! Subscription log: newsletter and event sign-ups for the admin dashboard.
//!
//! DESIGN
//! ======
//! An append-only list kept in memory and mirrored to its own JSON file,
//! independent of the settings store. Insertion order is the listing order.
//! Only the dashboard mutates entries: it flips `read` or deletes them.
//!
//! ERROR HANDLING
//! ==============
//! Persistence failures are logged; the in-memory log stays authoritative.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::store::persist;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Event the visitor signed up for, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    /// Milliseconds since the Unix epoch.
    pub subscribed_at: i64,
    pub read: bool,
}

/// Public sign-up form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewSubscription {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub event: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubscriptionError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("subscription not found: {0}")]
    NotFound(Uuid),
}

// =============================================================================
// LOG
// =============================================================================

#[derive(Clone)]
pub struct SubscriptionLog {
    entries: Arc<RwLock<Vec<Subscription>>>,
    path: Option<Arc<PathBuf>>,
}

impl SubscriptionLog {
    #[must_use]
    pub fn in_memory() -> Self {
        Self { entries: Arc::new(RwLock::new(Vec::new())), path: None }
    }

    #[must_use]
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries: Vec<Subscription> = persist::load_json(&path);
        Self { entries: Arc::new(RwLock::new(entries)), path: Some(Arc::new(path)) }
    }

    /// Append a new unread subscription and return its id.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` when name or email is blank.
    pub fn add_subscription(&self, form: NewSubscription) -> Result<Uuid, SubscriptionError> {
        let name = form.name.trim();
        if name.is_empty() {
            return Err(SubscriptionError::MissingField("name"));
        }
        let email = form.email.trim();
        if email.is_empty() {
            return Err(SubscriptionError::MissingField("email"));
        }

        let subscription = Subscription {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            email: email.to_owned(),
            phone: non_blank(form.phone),
            event: non_blank(form.event),
            subscribed_at: now_ms(),
            read: false,
        };
        let id = subscription.id;

        let mut entries = self.write_entries();
        entries.push(subscription);
        self.persist_locked(&entries);
        info!(%id, event = ?entries.last().and_then(|s| s.event.as_deref()), "subscription received");
        Ok(id)
    }

    /// Mark a subscription read. Marking it again changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub fn mark_as_read(&self, id: Uuid) -> Result<(), SubscriptionError> {
        let mut entries = self.write_entries();
        let entry = entries
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(SubscriptionError::NotFound(id))?;
        if entry.read {
            return Ok(());
        }
        entry.read = true;
        self.persist_locked(&entries);
        Ok(())
    }

    /// Remove a subscription permanently.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub fn delete_subscription(&self, id: Uuid) -> Result<(), SubscriptionError> {
        let mut entries = self.write_entries();
        let before = entries.len();
        entries.retain(|s| s.id != id);
        if entries.len() == before {
            return Err(SubscriptionError::NotFound(id));
        }
        self.persist_locked(&entries);
        info!(%id, "subscription deleted");
        Ok(())
    }

    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<Subscription> {
        self.read_entries().iter().find(|s| s.id == id).cloned()
    }

    /// All subscriptions in insertion order.
    #[must_use]
    pub fn list(&self) -> Vec<Subscription> {
        self.read_entries().clone()
    }

    /// The first `limit` subscriptions in insertion order.
    #[must_use]
    pub fn recent(&self, limit: usize) -> Vec<Subscription> {
        self.read_entries().iter().take(limit).cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read_entries().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read_entries().is_empty()
    }

    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.read_entries().iter().filter(|s| !s.read).count()
    }

    fn persist_locked(&self, entries: &[Subscription]) {
        let Some(path) = &self.path else {
            return;
        };
        if let Err(e) = persist::write_json(path, entries) {
            warn!(error = %e, path = %path.display(), "subscription persist failed; keeping in-memory log");
        }
    }

    fn read_entries(&self) -> std::sync::RwLockReadGuard<'_, Vec<Subscription>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_entries(&self) -> std::sync::RwLockWriteGuard<'_, Vec<Subscription>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SubscriptionLog {
    fn default() -> Self {
        Self::in_memory()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Current time as milliseconds since Unix epoch.
fn now_ms() -> i64 {
    i64::try_from(time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000).unwrap_or(0)
}

#[cfg(test)]
#[path = "subscriptions_test.rs"]
mod tests;

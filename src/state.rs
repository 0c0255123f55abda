//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the settings store, the live listings subscribed to it, the
//! subscription log and the read-only configuration handlers need. There is
//! no global store: everything reaches handlers through this value.

use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::loader::Listings;
use crate::services::auth::AdminCredentials;
use crate::services::contacts::ContactInfo;
use crate::services::subscriptions::SubscriptionLog;
use crate::store::SettingsStore;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub store: SettingsStore,
    /// Live listings attached to `store`.
    pub listings: Listings,
    pub subscriptions: SubscriptionLog,
    pub credentials: Arc<AdminCredentials>,
    pub contacts: Arc<ContactInfo>,
    pub sync_delay: Duration,
}

impl AppState {
    /// Attach live listings to `store` and bundle the rest.
    #[must_use]
    pub fn new(
        store: SettingsStore,
        subscriptions: SubscriptionLog,
        credentials: AdminCredentials,
        contacts: ContactInfo,
        sync_delay: Duration,
    ) -> Self {
        let listings = Listings::attach(&store);
        Self {
            store,
            listings,
            subscriptions,
            credentials: Arc::new(credentials),
            contacts: Arc::new(contacts),
            sync_delay,
        }
    }

    /// Open file-backed store and log at the configured paths.
    #[must_use]
    pub fn from_config(config: AppConfig) -> Self {
        Self::new(
            SettingsStore::open(&config.settings_path),
            SubscriptionLog::open(&config.subscriptions_path),
            config.credentials,
            config.contacts,
            config.sync_delay,
        )
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;

//! Record loader: rebuilds typed listings from the flat settings map.
//!
//! DESIGN
//! ======
//! A load scans ids `1..=D::MAX_ID` in ascending order and emits a record
//! for every id whose presence rule holds. Missing ids are skipped, never
//! renumbered. `LiveListing` keeps one domain's listing current by re-running
//! the full scan on every store mutation; the bounded id range keeps that
//! cheap, so there is no incremental diffing. Each rebuild is tagged with
//! the store revision it came from and never replaces a newer one.

use std::marker::PhantomData;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::trace;

use crate::schema::{self, Domain, EventRecord, EventSchema, IdOrder, NewsRecord, NewsSchema, RecordFields};
use crate::store::{SettingChange, SettingsObserver, SettingsStore, Snapshot};

/// Present records in ascending id order.
#[must_use]
pub fn scan<D: Domain>(snapshot: &Snapshot) -> Vec<D::Record> {
    (1..=D::MAX_ID)
        .filter_map(|id| {
            let fields = RecordFields::new(snapshot, D::PREFIX, id);
            D::is_present(&fields).then(|| D::decode(&fields))
        })
        .collect()
}

/// Present records in the domain's admin order.
#[must_use]
pub fn load_records<D: Domain>(snapshot: &Snapshot) -> Vec<D::Record> {
    let mut records = scan::<D>(snapshot);
    if D::ADMIN_ORDER == IdOrder::Descending {
        records.sort_by_key(|r| std::cmp::Reverse(D::record_id(r)));
    }
    records
}

/// Ids that currently hold a present record, ascending.
#[must_use]
pub fn existing_ids<D: Domain>(snapshot: &Snapshot) -> Vec<u32> {
    (1..=D::MAX_ID)
        .filter(|id| D::is_present(&RecordFields::new(snapshot, D::PREFIX, *id)))
        .collect()
}

/// Single record by id, if present.
#[must_use]
pub fn load_one<D: Domain>(snapshot: &Snapshot, id: u32) -> Option<D::Record> {
    if !(1..=D::MAX_ID).contains(&id) {
        return None;
    }
    let fields = RecordFields::new(snapshot, D::PREFIX, id);
    D::is_present(&fields).then(|| D::decode(&fields))
}

// =============================================================================
// PUBLIC PAGE ORDERINGS
// =============================================================================

/// Events page: present events with the page's own defaults, newest id first.
#[must_use]
pub fn public_events(snapshot: &Snapshot) -> Vec<EventRecord> {
    (1..=EventSchema::MAX_ID)
        .rev()
        .filter_map(|id| {
            let fields = RecordFields::new(snapshot, EventSchema::PREFIX, id);
            EventSchema::is_present(&fields).then(|| schema::event::decode_public(&fields))
        })
        .collect()
}

/// News page: newest publication date first.
#[must_use]
pub fn public_news(records: &[NewsRecord]) -> Vec<NewsRecord> {
    let mut records = records.to_vec();
    schema::news::sort_by_date_desc(&mut records);
    records
}

// =============================================================================
// LIVE LISTING
// =============================================================================

/// Cached listing for one domain, recomputed on every store change.
///
/// The cache remembers the store revision it was built from. Notifications
/// can arrive out of commit order when writers race, so a snapshot older
/// than the cached one is ignored instead of overwriting newer state.
pub struct LiveListing<D: Domain> {
    cache: RwLock<Cached<D::Record>>,
    _domain: PhantomData<D>,
}

struct Cached<T> {
    revision: u64,
    records: Vec<T>,
}

impl<D: Domain> LiveListing<D> {
    /// Subscribe to `store` and load the current listing.
    #[must_use]
    pub fn attach(store: &SettingsStore) -> Arc<Self> {
        let listing = Arc::new(Self {
            cache: RwLock::new(Cached { revision: 0, records: Vec::new() }),
            _domain: PhantomData,
        });
        store.subscribe(listing.clone());
        let (snapshot, revision) = store.versioned_snapshot();
        listing.reload(&snapshot, revision);
        listing
    }

    #[must_use]
    pub fn records(&self) -> Vec<D::Record> {
        self.read_cache().records.clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read_cache().records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Store revision the cached listing reflects.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.read_cache().revision
    }

    fn reload(&self, snapshot: &Snapshot, revision: u64) {
        let records = load_records::<D>(snapshot);
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        if revision < cache.revision {
            trace!(domain = D::PREFIX, revision, cached = cache.revision, "stale snapshot ignored");
            return;
        }
        *cache = Cached { revision, records };
    }

    fn read_cache(&self) -> std::sync::RwLockReadGuard<'_, Cached<D::Record>> {
        self.cache.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<D: Domain> SettingsObserver for LiveListing<D> {
    fn settings_changed(&self, change: &SettingChange, snapshot: &Snapshot, revision: u64) {
        trace!(domain = D::PREFIX, key = change.key(), revision, "reloading listing");
        self.reload(snapshot, revision);
    }
}

/// Live listings for every content domain.
#[derive(Clone)]
pub struct Listings {
    pub events: Arc<LiveListing<EventSchema>>,
    pub portfolio: Arc<LiveListing<schema::PortfolioSchema>>,
    pub news: Arc<LiveListing<NewsSchema>>,
}

impl Listings {
    #[must_use]
    pub fn attach(store: &SettingsStore) -> Self {
        Self {
            events: LiveListing::attach(store),
            portfolio: LiveListing::attach(store),
            news: LiveListing::attach(store),
        }
    }

    #[must_use]
    pub fn get<D: Domain>(&self) -> &Arc<LiveListing<D>>
    where
        Self: ListingFor<D>,
    {
        <Self as ListingFor<D>>::listing(self)
    }
}

/// Lets generic handlers pick the listing for their domain.
pub trait ListingFor<D: Domain> {
    fn listing(&self) -> &Arc<LiveListing<D>>;
}

impl ListingFor<EventSchema> for Listings {
    fn listing(&self) -> &Arc<LiveListing<EventSchema>> {
        &self.events
    }
}

impl ListingFor<schema::PortfolioSchema> for Listings {
    fn listing(&self) -> &Arc<LiveListing<schema::PortfolioSchema>> {
        &self.portfolio
    }
}

impl ListingFor<NewsSchema> for Listings {
    fn listing(&self) -> &Arc<LiveListing<NewsSchema>> {
        &self.news
    }
}

#[cfg(test)]
#[path = "loader_test.rs"]
mod tests;

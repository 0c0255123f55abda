use super::*;
use crate::schema::PortfolioSchema;

fn news_snapshot(entries: &[(u32, &str, &str)]) -> Snapshot {
    let mut snap = Snapshot::new();
    for (id, title, date) in entries {
        snap.insert(format!("news_{id}_title"), (*title).to_owned());
        snap.insert(format!("news_{id}_date"), (*date).to_owned());
    }
    snap
}

#[test]
fn scan_skips_absent_ids_without_placeholders() {
    let mut snap = Snapshot::new();
    snap.insert("event_1_title".into(), "A".into());
    snap.insert("event_3_title".into(), "C".into());
    snap.insert("event_2_date".into(), "2024-01-01".into());

    let ids: Vec<u32> = scan::<EventSchema>(&snap).iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 3]);
}

#[test]
fn scan_ignores_ids_past_the_range() {
    let mut snap = Snapshot::new();
    snap.insert("portfolio_11_title".into(), "Hidden".into());
    snap.insert("news_20_title".into(), "Visible".into());
    snap.insert("news_21_title".into(), "Hidden".into());

    assert!(scan::<PortfolioSchema>(&snap).is_empty());
    assert_eq!(existing_ids::<NewsSchema>(&snap), vec![20]);
}

#[test]
fn events_and_portfolio_load_ascending() {
    let mut snap = Snapshot::new();
    for id in [5, 2, 9] {
        snap.insert(format!("event_{id}_title"), format!("E{id}"));
    }
    let ids: Vec<u32> = load_records::<EventSchema>(&snap).iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![2, 5, 9]);
}

#[test]
fn news_admin_listing_is_newest_id_first() {
    let snap = news_snapshot(&[(1, "a", "2024-01-01"), (2, "b", "2024-03-01"), (3, "c", "2024-02-01")]);
    let ids: Vec<u32> = load_records::<NewsSchema>(&snap).iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);
}

#[test]
fn news_public_listing_sorts_by_date_descending() {
    let snap = news_snapshot(&[(1, "a", "2024-01-01"), (2, "b", "2024-03-01"), (3, "c", "2024-02-01")]);

    let scanned: Vec<String> = scan::<NewsSchema>(&snap).into_iter().map(|r| r.date).collect();
    assert_eq!(scanned, vec!["2024-01-01", "2024-03-01", "2024-02-01"]);

    let public: Vec<String> = public_news(&scan::<NewsSchema>(&snap))
        .into_iter()
        .map(|r| r.date)
        .collect();
    assert_eq!(public, vec!["2024-03-01", "2024-02-01", "2024-01-01"]);
}

#[test]
fn news_public_listing_puts_unparseable_dates_last() {
    let snap = news_snapshot(&[(1, "a", "2024-02-01"), (2, "b", "em breve"), (3, "c", "05/01/2024")]);
    let ids: Vec<u32> = public_news(&load_records::<NewsSchema>(&snap))
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec![1, 3, 2]);
}

#[test]
fn public_events_are_newest_id_first() {
    let mut snap = Snapshot::new();
    for id in [1, 4, 2] {
        snap.insert(format!("event_{id}_title"), format!("E{id}"));
    }
    snap.insert("event_2_location".into(), "Huambo".into());
    let events = public_events(&snap);
    let ids: Vec<u32> = events.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![4, 2, 1]);
    assert_eq!(events[1].location, "Huambo");
    assert_eq!(events[0].location, "Luanda");
    assert_eq!(events[0].date, "Em breve");
}

#[test]
fn load_one_respects_presence_and_range() {
    let mut snap = Snapshot::new();
    snap.insert("event_2_title".into(), "Meetup".into());
    assert_eq!(load_one::<EventSchema>(&snap, 2).map(|r| r.title), Some("Meetup".to_owned()));
    assert!(load_one::<EventSchema>(&snap, 1).is_none());
    assert!(load_one::<EventSchema>(&snap, 0).is_none());
}

#[test]
fn live_listing_tracks_every_write() {
    let store = SettingsStore::in_memory();
    store.set("event_1_title", "Antes");
    let listing = LiveListing::<EventSchema>::attach(&store);
    assert_eq!(listing.len(), 1);
    assert_eq!(listing.revision(), 1);

    store.set("event_2_title", "Novo");
    assert_eq!(listing.len(), 2);
    assert_eq!(listing.revision(), 2);

    store.set("event_1_title", "");
    let titles: Vec<String> = listing.records().into_iter().map(|r| r.title).collect();
    assert_eq!(titles, vec!["Novo"]);
    assert_eq!(listing.revision(), store.revision());
}

#[test]
fn live_listing_ignores_older_snapshots() {
    let store = SettingsStore::in_memory();
    let listing = LiveListing::<EventSchema>::attach(&store);
    store.set("event_1_title", "Atual");

    let mut old = Snapshot::new();
    old.insert("event_9_title".into(), "Antigo".into());
    let change = SettingChange::Set { key: "event_9_title".into(), value: "Antigo".into() };
    listing.settings_changed(&change, &old, 0);

    let titles: Vec<String> = listing.records().into_iter().map(|r| r.title).collect();
    assert_eq!(titles, vec!["Atual"]);
    assert_eq!(listing.revision(), 1);
}

#[test]
fn live_listing_matches_store_after_concurrent_writes() {
    for _ in 0..100 {
        let store = SettingsStore::in_memory();
        let listing = LiveListing::<EventSchema>::attach(&store);
        std::thread::scope(|scope| {
            for i in 1..=4 {
                let store = store.clone();
                scope.spawn(move || store.set(format!("event_{i}_title"), format!("Evento {i}")));
            }
        });

        assert_eq!(listing.len(), 4);
        assert_eq!(listing.records(), load_records::<EventSchema>(&store.snapshot()));
        assert_eq!(listing.revision(), store.revision());
    }
}

#[test]
fn listings_attach_all_domains() {
    let store = SettingsStore::in_memory();
    let listings = Listings::attach(&store);
    store.set("portfolio_1_title", "Site");
    store.set("news_1_excerpt", "Resumo");

    assert!(listings.events.is_empty());
    assert_eq!(listings.get::<PortfolioSchema>().len(), 1);
    assert_eq!(listings.get::<NewsSchema>().len(), 1);
}

use super::*;
use crate::schema::{EventDraft, EventSchema, NewsDraft, NewsSchema, PortfolioDraft, PortfolioSchema};

fn event_draft(title: &str, date: &str) -> EventDraft {
    EventDraft { title: Some(title.into()), date: Some(date.into()), ..EventDraft::default() }
}

#[test]
fn first_record_gets_id_one() {
    let store = SettingsStore::in_memory();
    assert_eq!(next_id::<EventSchema>(&store), 1);
    let id = add_record::<EventSchema>(&store, event_draft("Workshop", "2024-06-01")).unwrap();
    assert_eq!(id, 1);
    assert_eq!(store.get("event_1_title").as_deref(), Some("Workshop"));
    assert_eq!(store.get("event_1_participants").as_deref(), Some("50+"));
}

#[test]
fn add_then_load_then_delete_round_trip() {
    let store = SettingsStore::in_memory();
    let id = add_record::<EventSchema>(
        &store,
        EventDraft {
            title: Some("Feira".into()),
            date: Some("2024-07-10".into()),
            time: Some("14:00 - 18:00".into()),
            location: Some("Luanda, Talatona".into()),
            description: Some("Feira anual".into()),
            participants: Some("200+".into()),
        },
    )
    .unwrap();

    let loaded = loader::load_one::<EventSchema>(&store.snapshot(), id).unwrap();
    assert_eq!(loaded.title, "Feira");
    assert_eq!(loaded.time, "14:00 - 18:00");
    assert_eq!(loaded.location, "Luanda, Talatona");
    assert_eq!(loaded.participants, "200+");

    delete_record::<EventSchema>(&store, id).unwrap();
    assert!(loader::load_one::<EventSchema>(&store.snapshot(), id).is_none());
    assert_eq!(store.get("event_1_title").as_deref(), Some(""));
}

#[test]
fn id_allocation_uses_max_plus_one_not_gaps() {
    let store = SettingsStore::in_memory();
    store.set("event_1_title", "A");
    store.set("event_3_title", "C");

    let id = add_record::<EventSchema>(&store, event_draft("D", "2024-01-01")).unwrap();
    assert_eq!(id, 4);
}

#[test]
fn deleting_the_highest_id_lets_it_be_reused() {
    let store = SettingsStore::in_memory();
    store.set("portfolio_1_title", "A");
    store.set("portfolio_2_title", "B");
    delete_record::<PortfolioSchema>(&store, 2).unwrap();

    assert_eq!(add_record::<PortfolioSchema>(&store, PortfolioDraft::default()).unwrap(), 2);
}

#[test]
fn invalid_draft_writes_nothing() {
    let store = SettingsStore::in_memory();
    let err = add_record::<EventSchema>(&store, event_draft("Sem data", "")).unwrap_err();
    assert_eq!(err, WriteError::Invalid(SchemaError::MissingField("date")));
    assert!(store.is_empty());
}

#[test]
fn full_domain_rejects_add() {
    let store = SettingsStore::in_memory();
    store.set("event_10_title", "Last slot");
    let err = add_record::<EventSchema>(&store, event_draft("Overflow", "2024-01-01")).unwrap_err();
    assert_eq!(err, WriteError::CapacityExhausted { domain: "event", next_id: 11, max: 10 });
    assert_eq!(store.len(), 1);
}

#[test]
fn update_field_writes_single_key() {
    let store = SettingsStore::in_memory();
    store.set("news_2_title", "Antigo");
    update_field::<NewsSchema>(&store, 2, "title", "Novo").unwrap();
    update_field::<NewsSchema>(&store, 2, "featured", "true").unwrap();

    let record = loader::load_one::<NewsSchema>(&store.snapshot(), 2).unwrap();
    assert_eq!(record.title, "Novo");
    assert!(record.featured);
    assert_eq!(store.len(), 2);
}

#[test]
fn update_field_rejects_unknown_field_and_range() {
    let store = SettingsStore::in_memory();
    assert!(matches!(
        update_field::<EventSchema>(&store, 1, "tags", "x"),
        Err(WriteError::Invalid(SchemaError::UnknownField { .. }))
    ));
    assert!(matches!(
        update_field::<NewsSchema>(&store, 21, "title", "x"),
        Err(WriteError::Invalid(SchemaError::IdOutOfRange { .. }))
    ));
    assert!(store.is_empty());
}

#[test]
fn update_record_rewrites_every_field() {
    let store = SettingsStore::in_memory();
    let id = add_record::<PortfolioSchema>(&store, PortfolioDraft::default()).unwrap();
    let mut record = loader::load_one::<PortfolioSchema>(&store.snapshot(), id).unwrap();
    record.technologies = vec!["Rust".into(), "Axum".into()];
    record.client = "Banco X".into();

    update_record::<PortfolioSchema>(&store, id, &record).unwrap();

    assert_eq!(store.get("portfolio_1_tech").as_deref(), Some("Rust,Axum"));
    let reloaded = loader::load_one::<PortfolioSchema>(&store.snapshot(), id).unwrap();
    assert_eq!(reloaded, record);
}

#[test]
fn delete_missing_record_is_not_found() {
    let store = SettingsStore::in_memory();
    assert_eq!(
        delete_record::<NewsSchema>(&store, 3),
        Err(WriteError::NotFound { domain: "news", id: 3 })
    );
}

#[test]
fn gap_tolerance_after_delete() {
    let store = SettingsStore::in_memory();
    for title in ["A", "B", "C"] {
        add_record::<NewsSchema>(&store, NewsDraft { title: Some(title.into()), ..NewsDraft::default() }).unwrap();
    }
    delete_record::<NewsSchema>(&store, 2).unwrap();

    assert_eq!(loader::existing_ids::<NewsSchema>(&store.snapshot()), vec![1, 3]);
    let titles: Vec<String> = loader::load_records::<NewsSchema>(&store.snapshot())
        .into_iter()
        .map(|r| r.title)
        .collect();
    assert_eq!(titles, vec!["C", "A"]);
}

#[test]
fn concurrent_adds_get_distinct_ids() {
    for _ in 0..50 {
        let store = SettingsStore::in_memory();
        let barrier = std::sync::Barrier::new(4);
        let mut ids: Vec<u32> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|t| {
                    let store = store.clone();
                    let barrier = &barrier;
                    scope.spawn(move || {
                        barrier.wait();
                        add_record::<EventSchema>(&store, event_draft(&format!("Evento {t}"), "2024-06-01")).unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        let mut titles: Vec<String> =
            loader::load_records::<EventSchema>(&store.snapshot()).into_iter().map(|r| r.title).collect();
        titles.sort();
        assert_eq!(titles, vec!["Evento 0", "Evento 1", "Evento 2", "Evento 3"]);
    }
}

#[test]
fn concurrent_delete_reports_not_found_once() {
    let store = SettingsStore::in_memory();
    add_record::<EventSchema>(&store, event_draft("Workshop", "2024-06-01")).unwrap();
    let results: Vec<Result<(), WriteError>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                scope.spawn(move || delete_record::<EventSchema>(&store, 1))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results.iter().filter(|r| r.is_err()).all(|r| *r == Err(WriteError::NotFound { domain: "event", id: 1 })));
}

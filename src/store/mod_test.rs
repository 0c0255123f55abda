use super::*;
use std::sync::Mutex;

#[derive(Default)]
struct Recorder {
    seen: Mutex<Vec<(SettingChange, usize, u64)>>,
}

impl SettingsObserver for Recorder {
    fn settings_changed(&self, change: &SettingChange, snapshot: &Snapshot, revision: u64) {
        self.seen.lock().unwrap().push((change.clone(), snapshot.len(), revision));
    }
}

#[test]
fn get_unset_key_is_none() {
    let store = SettingsStore::in_memory();
    assert_eq!(store.get("hero_whatsapp"), None);
    assert!(store.is_empty());
}

#[test]
fn empty_string_is_distinct_from_absent() {
    let store = SettingsStore::in_memory();
    store.set("event_1_title", "");
    assert_eq!(store.get("event_1_title"), Some(String::new()));
    assert_eq!(store.get("event_1_date"), None);
}

#[test]
fn set_overwrites_and_snapshot_copies() {
    let store = SettingsStore::in_memory();
    store.set("hero_whatsapp", "111");
    let before = store.snapshot();
    store.set("hero_whatsapp", "222");

    assert_eq!(before.get("hero_whatsapp").map(String::as_str), Some("111"));
    assert_eq!(store.get("hero_whatsapp").as_deref(), Some("222"));
    assert_eq!(store.len(), 1);
}

#[test]
fn remove_reports_presence() {
    let store = SettingsStore::in_memory();
    store.set("admin_authenticated", "true");
    assert!(store.remove("admin_authenticated"));
    assert!(!store.remove("admin_authenticated"));
    assert_eq!(store.get("admin_authenticated"), None);
}

#[test]
fn observers_see_each_write_individually() {
    let store = SettingsStore::in_memory();
    let recorder = Arc::new(Recorder::default());
    store.subscribe(recorder.clone());

    store.set_many([("news_1_title", "A"), ("news_1_excerpt", "B")]);
    store.remove("news_1_title");
    store.remove("news_1_title");

    let seen = recorder.seen.lock().unwrap();
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[0].0, SettingChange::Set { key: "news_1_title".into(), value: "A".into() });
    assert_eq!(seen[0].1, 1);
    assert_eq!(seen[1].1, 2);
    assert_eq!(seen[2].0, SettingChange::Removed { key: "news_1_title".into() });
    assert_eq!(seen[2].0.key(), "news_1_title");
    assert_eq!(seen[2].1, 1);
    let revisions: Vec<u64> = seen.iter().map(|s| s.2).collect();
    assert_eq!(revisions, vec![1, 2, 3]);
}

#[test]
fn revision_counts_commits_only() {
    let store = SettingsStore::in_memory();
    assert_eq!(store.revision(), 0);
    store.set("hero_title", "Olá");
    store.set("hero_title", "Olá");
    assert!(!store.remove("missing"));
    assert_eq!(store.revision(), 2);

    let (snapshot, revision) = store.versioned_snapshot();
    assert_eq!(revision, 2);
    assert_eq!(snapshot.get("hero_title").map(String::as_str), Some("Olá"));
}

#[test]
fn concurrent_writers_get_distinct_revisions() {
    let store = SettingsStore::in_memory();
    let recorder = Arc::new(Recorder::default());
    store.subscribe(recorder.clone());

    std::thread::scope(|scope| {
        for t in 0..4 {
            let store = store.clone();
            scope.spawn(move || {
                for i in 0..50 {
                    store.set(format!("k_{t}_{i}"), "v");
                }
            });
        }
    });

    let mut revisions: Vec<u64> = recorder.seen.lock().unwrap().iter().map(|s| s.2).collect();
    revisions.sort_unstable();
    assert_eq!(revisions, (1..=200).collect::<Vec<u64>>());
    assert_eq!(store.revision(), 200);
}

#[test]
fn exclusive_sections_do_not_interleave() {
    let store = SettingsStore::in_memory();
    std::thread::scope(|scope| {
        for _ in 0..4 {
            let store = store.clone();
            scope.spawn(move || {
                for _ in 0..100 {
                    store.exclusive(|s| {
                        let n: u32 = s.get("counter").and_then(|v| v.parse().ok()).unwrap_or(0);
                        s.set("counter", (n + 1).to_string());
                    });
                }
            });
        }
    });
    assert_eq!(store.get("counter").as_deref(), Some("400"));
}

#[test]
fn observer_can_read_store_during_notification() {
    struct Reader {
        store: SettingsStore,
        seen: Mutex<Option<String>>,
    }
    impl SettingsObserver for Reader {
        fn settings_changed(&self, change: &SettingChange, _snapshot: &Snapshot, _revision: u64) {
            *self.seen.lock().unwrap() = self.store.get(change.key());
        }
    }

    let store = SettingsStore::in_memory();
    let reader = Arc::new(Reader { store: store.clone(), seen: Mutex::new(None) });
    store.subscribe(reader.clone());
    store.set("hero_whatsapp", "244");

    assert_eq!(reader.seen.lock().unwrap().as_deref(), Some("244"));
}

#[test]
fn file_backed_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");

    let store = SettingsStore::open(&path);
    store.set("portfolio_1_title", "Loja online");
    store.set("portfolio_1_tech", "");
    drop(store);

    let reopened = SettingsStore::open(&path);
    assert_eq!(reopened.get("portfolio_1_title").as_deref(), Some("Loja online"));
    assert_eq!(reopened.get("portfolio_1_tech").as_deref(), Some(""));
}

#[test]
fn set_is_on_disk_when_it_returns() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let store = SettingsStore::open(&path);

    store.set("hero_title", "Olá");
    let on_disk: Snapshot = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk.get("hero_title").map(String::as_str), Some("Olá"));

    store.remove("hero_title");
    let on_disk: Snapshot = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert!(on_disk.is_empty());
}

#[test]
fn persist_failure_keeps_in_memory_value() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "x").unwrap();

    let store = SettingsStore::open(blocker.join("settings.json"));
    store.set("event_1_title", "Workshop");
    assert_eq!(store.get("event_1_title").as_deref(), Some("Workshop"));
}

use crudlist_core::{Collection, Config, Store, seed};
use std::fs;

#[test]
fn export_then_load_jsonl() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.jsonl");

    let mut store = Store::with_collection(Collection::demo());
    store.create("Learn Rust", "ownership").unwrap();
    seed::save(&path, &store.snapshot()).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 5);

    let loaded = seed::load(&path).unwrap();
    assert_eq!(loaded, store.snapshot());
}

#[test]
fn load_board_style_keyed_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    fs::write(
        &path,
        r#"{
  "-NabcA": { "text": "Buy milk" },
  "-NabcB": { "text": "Walk the dog" }
}"#,
    )
    .unwrap();

    let loaded = seed::load(&path).unwrap();
    let titles: Vec<_> = loaded.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Buy milk", "Walk the dog"]);
    assert_eq!(loaded.records()[0].detail, "Buy milk");
    assert_ne!(loaded.records()[0].id, loaded.records()[1].id);
}

#[test]
fn export_then_load_json_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.json");

    let mut store = Store::with_collection(Collection::demo());
    store.toggle_flag(1);
    store.create("Learn Rust", "ownership").unwrap();
    seed::save(&path, &store.snapshot()).unwrap();

    let loaded = seed::load(&path).unwrap();
    assert_eq!(loaded, store.snapshot());
}

#[test]
fn blank_seed_record_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("seed.jsonl");
    fs::write(
        &path,
        "{\"id\":1,\"title\":\"A\",\"detail\":\"a\"}\n{\"id\":2,\"title\":\" \",\"detail\":\"b\"}\n",
    )
    .unwrap();

    let err = seed::load(&path).unwrap_err();
    assert!(matches!(err, crudlist_core::Error::Seed(_)));
    assert!(err.to_string().contains("line 2"));
}

#[test]
fn seeded_store_issues_ids_above_seed() {
    let dir = tempfile::tempdir().unwrap();
    let seed_path = dir.path().join("seed.json");
    let far = u64::MAX / 2;
    fs::write(&seed_path, format!(r#"[{{"id":{far},"title":"A","detail":"a"}}]"#)).unwrap();

    let config_path = dir.path().join("config.toml");
    fs::write(
        &config_path,
        format!("seed = {:?}\n", seed_path.display().to_string()),
    )
    .unwrap();

    let config = Config::load(&config_path).unwrap();
    let mut store = Store::with_collection(config.initial_records().unwrap());
    let created = store.create("B", "b").unwrap();
    assert!(created.id > far);
}

#[test]
fn missing_seed_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = seed::load(&dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, crudlist_core::Error::Io(_)));
}

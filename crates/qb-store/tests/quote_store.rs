use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use qb_core::Quote;
use qb_store::{QuoteStore, StoreError};
use tempfile::TempDir;

fn quote(hour: u32, who: &str, what: &str) -> Quote {
    Quote {
        time: Utc.with_ymd_and_hms(2020, 9, 21, hour, 3, 11).unwrap(),
        who_said_the_silly_thing: who.into(),
        what_silly_thing_did_they_say: what.into(),
    }
}

#[test]
fn open_creates_nested_directories() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("a").join("b");

    let store = QuoteStore::open(&dir).unwrap();

    assert!(dir.is_dir());
    assert_eq!(store.dir(), dir.as_path());
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn save_writes_pretty_json_named_after_time() {
    let tmp = TempDir::new().unwrap();
    let store = QuoteStore::open(tmp.path()).unwrap();

    let path = store.save(&quote(14, "Bob", "Hello")).unwrap();

    assert_eq!(path, tmp.path().join("2020-09-21_14-03-11.json"));
    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        written,
        concat!(
            "{\n",
            "    \"Time\": \"2020-09-21T14:03:11Z\",\n",
            "    \"WhoSaidTheSillyThing\": \"Bob\",\n",
            "    \"WhatSillyThingDidTheySay\": \"Hello\"\n",
            "}\n"
        )
    );
}

#[test]
fn list_returns_newest_first() {
    let tmp = TempDir::new().unwrap();
    let store = QuoteStore::open(tmp.path()).unwrap();
    store.save(&quote(9, "Alice", "morning")).unwrap();
    store.save(&quote(18, "Carol", "evening")).unwrap();
    store.save(&quote(12, "Bob", "noon")).unwrap();

    let authors: Vec<String> = store
        .list()
        .unwrap()
        .into_iter()
        .map(|q| q.who_said_the_silly_thing)
        .collect();

    assert_eq!(authors, vec!["Carol", "Bob", "Alice"]);
}

#[test]
fn saved_quotes_read_back_unchanged() {
    let tmp = TempDir::new().unwrap();
    let store = QuoteStore::open(tmp.path()).unwrap();
    let original = quote(14, "Bob <bob@example.com>", "line one\r\nline two");

    store.save(&original).unwrap();

    assert_eq!(store.list().unwrap(), vec![original]);
}

#[test]
fn same_second_replaces_previous_quote() {
    let tmp = TempDir::new().unwrap();
    let store = QuoteStore::open(tmp.path()).unwrap();
    store.save(&quote(14, "Bob", "first")).unwrap();
    store.save(&quote(14, "Bob", "second")).unwrap();

    let quotes = store.list().unwrap();
    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0].what_silly_thing_did_they_say, "second");
}

#[test]
fn non_json_entries_are_ignored() {
    let tmp = TempDir::new().unwrap();
    let store = QuoteStore::open(tmp.path()).unwrap();
    store.save(&quote(14, "Bob", "Hello")).unwrap();
    std::fs::write(tmp.path().join("README.txt"), "not a quote").unwrap();
    std::fs::create_dir(tmp.path().join("archive.json")).unwrap();

    assert_eq!(store.list().unwrap().len(), 1);
}

#[test]
fn malformed_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let store = QuoteStore::open(tmp.path()).unwrap();
    store.save(&quote(14, "Bob", "Hello")).unwrap();
    let broken = tmp.path().join("2020-01-01_00-00-00.json");
    std::fs::write(&broken, "{ not json").unwrap();

    match store.list() {
        Err(StoreError::Corrupt { path, .. }) => assert_eq!(path, broken),
        other => panic!("expected corrupt file error, got {other:?}"),
    }
}

#[test]
fn reads_files_written_with_local_offsets() {
    let tmp = TempDir::new().unwrap();
    let store = QuoteStore::open(tmp.path()).unwrap();
    std::fs::write(
        tmp.path().join("2020-09-21_15-03-11.json"),
        r#"{
    "Time": "2020-09-21T15:03:11.5+01:00",
    "WhoSaidTheSillyThing": "Bob",
    "WhatSillyThingDidTheySay": "Hello"
}
"#,
    )
    .unwrap();

    let quotes = store.list().unwrap();
    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0].time.timestamp(), quote(14, "", "").time.timestamp());
}

//! VersionStore tests.

use std::sync::Arc;

use anyhow::{Result, bail};
use codeplan_memory::{
    InMemoryKeyValueStore, KeyValueStore, VersionStore, VersionStoreError,
    default_version_namespace,
};
use codeplan_types::{FileRecord, FileSet};

fn files(tag: &str) -> FileSet {
    FileSet::from_records([
        FileRecord::new("index.html", format!("<p>{tag}</p>"), "text/html"),
        FileRecord::new("logo.png", "data:image/png;base64,iVBORw0KGgo=", "image/png"),
    ])
}

#[test]
fn test_first_save_is_one() -> Result<()> {
    let store = VersionStore::in_memory("test");
    assert_eq!(store.save(&files("a"))?, 1);
    Ok(())
}

#[test]
fn test_numbering_listing_and_restart() -> Result<()> {
    let store = VersionStore::in_memory("test");

    assert_eq!(store.save(&files("a"))?, 1);
    assert_eq!(store.save(&files("b"))?, 2);
    assert_eq!(store.save(&files("c"))?, 3);

    let listed = store.list_all()?;
    let numbers: Vec<u64> = listed.iter().map(|v| v.version_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(listed[1].files, files("b"));

    store.clear_all()?;
    assert!(store.list_all()?.is_empty());
    assert_eq!(store.save(&files("d"))?, 1);
    Ok(())
}

#[test]
fn test_listing_sorts_numerically_past_nine() -> Result<()> {
    let store = VersionStore::in_memory("test");
    for i in 0..12 {
        store.save(&files(&i.to_string()))?;
    }
    let numbers: Vec<u64> = store.list_all()?.iter().map(|v| v.version_number).collect();
    assert_eq!(numbers, (1..=12).collect::<Vec<_>>());
    Ok(())
}

#[test]
fn test_records_survive_verbatim() -> Result<()> {
    let store = VersionStore::in_memory("test");
    let original = files("exact \u{1F600} \r\n tabs\t");
    let number = store.save(&original)?;
    let loaded = store.get(number)?.map(|v| v.files);
    assert_eq!(loaded, Some(original));
    assert!(store.get(99)?.is_none());
    Ok(())
}

#[test]
fn test_corrupt_entry_is_isolated() -> Result<()> {
    let backend = Arc::new(InMemoryKeyValueStore::new());
    let store = VersionStore::new(backend.clone(), "test");
    store.save(&files("a"))?;
    store.save(&files("b"))?;
    store.save(&files("c"))?;

    backend.set("test:version:2", "{not json")?;

    let numbers: Vec<u64> = store.list_all()?.iter().map(|v| v.version_number).collect();
    assert_eq!(numbers, vec![1, 3]);
    Ok(())
}

#[test]
fn test_namespaces_do_not_mix() -> Result<()> {
    let backend = Arc::new(InMemoryKeyValueStore::new());
    let left = VersionStore::new(backend.clone(), "left");
    let right = VersionStore::new(backend, "right");

    left.save(&files("l"))?;
    left.save(&files("l2"))?;
    assert_eq!(right.save(&files("r"))?, 1);

    right.clear_all()?;
    assert_eq!(left.list_all()?.len(), 2);
    Ok(())
}

#[test]
fn test_entry_without_counter_is_still_listed() -> Result<()> {
    let backend = Arc::new(InMemoryKeyValueStore::new());
    let store = VersionStore::new(backend.clone(), "test");
    store.save(&files("a"))?;

    // Simulates a crash between the entry write and the counter write.
    backend.set("test:version:2", &serde_json::to_string(&files("b"))?)?;

    assert_eq!(store.current_max()?, 1);
    assert_eq!(store.list_all()?.len(), 2);
    Ok(())
}

#[test]
fn test_corrupt_counter_fails_save() -> Result<()> {
    let backend = Arc::new(InMemoryKeyValueStore::new());
    backend.set("test:version_counter", "many")?;
    let store = VersionStore::new(backend, "test");

    let result = store.save(&files("a"));
    assert!(matches!(result, Err(VersionStoreError::CorruptCounter(ref raw)) if raw == "many"));
    Ok(())
}

struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn backend_name(&self) -> &'static str {
        "read-only"
    }

    fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn set(&self, key: &str, _value: &str) -> Result<()> {
        bail!("quota exceeded writing {key}")
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

#[test]
fn test_rejected_write_is_reported_not_panicked() {
    let store = VersionStore::new(Arc::new(ReadOnlyStore), "test");
    let err = store.save(&files("a")).err();
    assert!(matches!(err, Some(VersionStoreError::Backend(_))));
    let message = err.map(|e| e.to_string()).unwrap_or_default();
    assert!(message.contains("quota exceeded"));
}

#[test]
fn test_default_namespace_is_deterministic() {
    let a = default_version_namespace("codeplan", std::path::Path::new("/work/site"));
    let b = default_version_namespace("codeplan", std::path::Path::new("/work/site"));
    let c = default_version_namespace("codeplan", std::path::Path::new("/work/other"));
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a, "codeplan:41ec72ca19a97ae1");
}

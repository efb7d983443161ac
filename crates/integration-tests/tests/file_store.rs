use std::fs;
use std::sync::Arc;

use domains::Collection;
use integration_tests::{sale_draft, seller, TestHub};
use storage_adapters::FileStore;
use tempfile::tempdir;

#[test]
fn state_survives_a_restart() {
    let dir = tempdir().unwrap();
    let id = {
        let hub = TestHub::over(Arc::new(FileStore::open(dir.path()).unwrap()));
        let id = hub.properties.submit(&seller("s@x.com"), sale_draft("A", 1_000_000)).unwrap().id;
        hub.properties.approve(&id).unwrap();
        id
    };

    let hub = TestHub::over(Arc::new(FileStore::open(dir.path()).unwrap()));
    let property = hub.properties.get(&id).unwrap();
    assert!(property.is_approved());
    assert!(dir.path().join("properties.json").exists());
}

#[test]
fn corrupt_file_reads_as_empty_and_is_replaced_on_write() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(format!("{}.json", Collection::Properties.key())), "{{{ not json").unwrap();

    let hub = TestHub::over(Arc::new(FileStore::open(dir.path()).unwrap()));
    assert!(hub.properties.list_all().is_empty());

    hub.properties.submit(&seller("s@x.com"), sale_draft("A", 1_000_000)).unwrap();
    assert_eq!(hub.properties.list_all().len(), 1);
}

#[test]
fn one_malformed_record_does_not_hide_the_rest() {
    let dir = tempdir().unwrap();
    let hub = TestHub::over(Arc::new(FileStore::open(dir.path()).unwrap()));
    let good = hub.properties.submit(&seller("s@x.com"), sale_draft("A", 1_000_000)).unwrap();

    let path = dir.path().join("properties.json");
    let mut records: Vec<serde_json::Value> =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    records.push(serde_json::json!({ "id": "prop_bad", "listingType": "lease" }));
    fs::write(&path, serde_json::to_string(&records).unwrap()).unwrap();

    let listed = hub.properties.list_all();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, good.id);
}

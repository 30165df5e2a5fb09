use super::*;
use crate::types::FlowAction;
use serde_json::json;
use std::io::Write;
use tempfile::{tempdir, NamedTempFile};

fn write_policy_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_missing_file_yields_default_only_store() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("does-not-exist.json");

    let (store, report) = PolicyStore::load_with_report(&path);

    assert_eq!(store.indices(), vec![DEFAULT_POLICY_INDEX]);
    assert_eq!(store.default_entry(), &PolicyEntry::builtin_default());
    assert!(matches!(
        report,
        LoadReport::Degraded(StoreError::FileUnavailable { .. })
    ));
}

#[test]
fn test_file_entries_are_loaded_alongside_default() {
    let doc = json!({
        "teamA": {
            "ApplicationACLs": [
                {
                    "Address": "0.0.0.0/0",
                    "Port": "443",
                    "Protocol": "tcp",
                    "Policy": { "Action": "Accept", "PolicyID": "out-https" }
                }
            ],
            "NetworkACLs": [],
            "Dependencies": [
                {
                    "Clause": [{ "Key": "team", "Value": ["A"], "Operator": "=" }],
                    "Policy": { "Action": "Accept", "PolicyID": "a-0" }
                }
            ],
            "ExposureRules": []
        }
    });
    let file = write_policy_file(&doc.to_string());

    let (store, report) = PolicyStore::load_with_report(file.path());

    assert_eq!(store.indices(), vec![DEFAULT_POLICY_INDEX, "teamA"]);
    let team_a = store.get("teamA").unwrap();
    assert_eq!(team_a.application_acls.len(), 1);
    assert_eq!(team_a.dependencies[0].action(), FlowAction::Accept);
    assert!(matches!(report, LoadReport::Loaded { entries: 1, .. }));
}

#[test]
fn test_user_supplied_default_is_overridden() {
    let doc = json!({
        "default": {
            "Dependencies": [
                {
                    "Clause": [{ "Key": "anything", "Value": ["goes"], "Operator": "=" }],
                    "Policy": { "Action": "Accept", "PolicyID": "0" }
                }
            ]
        },
        "teamA": {}
    });
    let file = write_policy_file(&doc.to_string());

    let store = PolicyStore::load(file.path());

    assert!(store.contains("teamA"));
    assert_eq!(store.default_entry(), &PolicyEntry::builtin_default());
}

#[test]
fn test_malformed_file_is_treated_like_missing() {
    let file = write_policy_file("{ this is not json");

    let (store, report) = PolicyStore::load_with_report(file.path());

    assert_eq!(store.indices(), vec![DEFAULT_POLICY_INDEX]);
    assert!(report.is_degraded());
    assert!(matches!(
        report,
        LoadReport::Degraded(StoreError::FileMalformed { .. })
    ));
}

#[test]
fn test_non_utf8_file_is_malformed_not_missing() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&[b'{', 0xff, 0xfe, b'}']).unwrap();

    let (store, report) = PolicyStore::load_with_report(file.path());

    assert_eq!(store.indices(), vec![DEFAULT_POLICY_INDEX]);
    assert!(matches!(
        report,
        LoadReport::Degraded(StoreError::FileMalformed { .. })
    ));

    let err = PolicyStore::try_load(file.path()).unwrap_err();
    assert!(matches!(err, StoreError::FileMalformed { .. }));
}

#[test]
fn test_null_document_is_treated_like_missing() {
    let file = write_policy_file("null");

    let (store, report) = PolicyStore::load_with_report(file.path());

    assert_eq!(store.len(), 1);
    assert!(store.contains(DEFAULT_POLICY_INDEX));
    assert!(report.is_degraded());
}

#[test]
fn test_try_load_surfaces_errors() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.json");

    let err = PolicyStore::try_load(&missing).unwrap_err();
    assert_eq!(err.path(), &missing);
    assert!(err.to_string().contains("Policy file unavailable"));
}

#[test]
fn test_default_store_is_never_empty() {
    let store = PolicyStore::default();
    assert!(!store.is_empty());
    assert!(store.get(DEFAULT_POLICY_INDEX).is_some());
    assert!(store.get("teamA").is_none());
}

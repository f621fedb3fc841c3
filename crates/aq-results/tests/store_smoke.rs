use aq_results::*;
use std::path::PathBuf;

fn manifest(run_id: &str, timestamp: &str) -> RunManifest {
    RunManifest {
        run_id: run_id.to_string(),
        timestamp: timestamp.to_string(),
        toolkit: "scripted".to_string(),
        file_prefix: "temp".to_string(),
        demand_mode: "PDD".to_string(),
        used_hydraulics: false,
        saved_hydraulics: true,
        output_file: PathBuf::from("temp.bin"),
        stages: vec![
            StageRecord {
                stage: "open".to_string(),
                code: 0,
                severity: "ok".to_string(),
                skipped: false,
            },
            StageRecord {
                stage: "close".to_string(),
                code: 0,
                severity: "ok".to_string(),
                skipped: false,
            },
        ],
        overall_code: 0,
        warning: false,
        error: false,
        summary: None,
        decode_error: None,
    }
}

#[test]
fn save_and_load_run() {
    let dir = tempfile::tempdir().unwrap();
    let store = RunStore::new(dir.path().join("runs")).unwrap();

    let m = manifest("run_123", "2026-02-25T12:00:00Z");
    store.save_run(&m).unwrap();

    assert!(store.has_run("run_123"));
    let loaded = store.load_manifest("run_123").unwrap();
    assert_eq!(loaded, m);
}

#[test]
fn list_runs_oldest_first() {
    let dir = tempfile::tempdir().unwrap();
    let store = RunStore::new(dir.path().join("runs")).unwrap();

    store
        .save_run(&manifest("b", "2026-02-25T13:00:00Z"))
        .unwrap();
    store
        .save_run(&manifest("a", "2026-02-25T12:00:00Z"))
        .unwrap();

    let runs = store.list_runs().unwrap();
    let ids: Vec<_> = runs.iter().map(|r| r.run_id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[test]
fn delete_and_missing_run() {
    let dir = tempfile::tempdir().unwrap();
    let store = RunStore::new(dir.path().join("runs")).unwrap();
    store
        .save_run(&manifest("gone", "2026-02-25T12:00:00Z"))
        .unwrap();
    store.delete_run("gone").unwrap();

    assert!(!store.has_run("gone"));
    assert!(matches!(
        store.load_manifest("gone"),
        Err(ResultsError::RunNotFound { .. })
    ));
}

#[test]
fn store_for_prefix_lives_next_to_run_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = RunStore::for_prefix(&dir.path().join("temp")).unwrap();
    assert_eq!(store.root_dir(), dir.path().join(".aquarun").join("runs"));
    assert!(store.root_dir().exists());
}

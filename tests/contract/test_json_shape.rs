//! Contract tests for JSON output shape

use dirkeep::services::marker::{MarkerMode, MarkerOptions, run_markers};
use dirkeep::services::platform::for_host;
use dirkeep::services::recorder::EventRecorder;
use dirkeep::{WalkConfig, WalkEvent};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_walk_summary_fields() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("testdir")).unwrap();
    fs::write(root.join("testdir/file.txt"), b"test").unwrap();

    let config = WalkConfig {
        track_visited_directories: true,
        track_visited_files: true,
        ..WalkConfig::default()
    };
    let mut recorder = EventRecorder::new();
    let summary = dirkeep::walk_summary(root, &config, &mut recorder, for_host()).unwrap();

    assert!(summary.completed);
    assert_eq!(summary.visited_directories.len(), 2);
    assert_eq!(summary.visited_files.len(), 1);

    let json: serde_json::Value = serde_json::to_value(&summary).unwrap();
    for field in [
        "root",
        "platform",
        "completed",
        "config",
        "visited_directories",
        "visited_files",
    ] {
        assert!(json.get(field).is_some(), "missing {field}");
    }
    assert_eq!(json["config"]["follow_symlinks"], false);
    assert_eq!(json["config"]["visit_files"], true);
    assert_eq!(json["config"]["track_visited_files"], true);
    assert_eq!(json["config"]["track_visited_directories"], true);
}

#[test]
fn test_walk_event_shape() {
    let json = serde_json::to_value(WalkEvent::PreVisit("/tmp/a".to_string())).unwrap();
    assert_eq!(json, serde_json::json!({"event": "pre_visit", "path": "/tmp/a"}));

    let json = serde_json::to_value(WalkEvent::Visit("f".to_string())).unwrap();
    assert_eq!(json["event"], "visit");

    let json = serde_json::to_value(WalkEvent::PostVisit("d".to_string())).unwrap();
    assert_eq!(json["event"], "post_visit");
}

#[test]
fn test_config_deserializes_with_defaults() {
    let config: WalkConfig = serde_json::from_str(r#"{"follow_symlinks": true}"#).unwrap();
    assert!(config.follow_symlinks);
    assert!(config.visit_files);
    assert!(!config.track_visited_files);
    assert!(!config.track_visited_directories);
}

#[test]
fn test_marker_report_fields() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("empty")).unwrap();

    let options = MarkerOptions {
        mode: MarkerMode::Create,
        dry_run: true,
        ..MarkerOptions::default()
    };
    let report = run_markers(root, options, WalkConfig::default(), for_host()).unwrap();

    let json: serde_json::Value = serde_json::to_value(&report).unwrap();
    assert_eq!(json["mode"], "create");
    assert_eq!(json["dry_run"], true);
    assert_eq!(json["completed"], true);
    assert_eq!(json["directories_scanned"], 2);
    assert_eq!(json["empty_directories"], 1);
    assert!(json["errors"].as_array().unwrap().is_empty());

    let action = &json["actions"][0];
    assert_eq!(action["kind"], "created");
    assert!(action["path"].as_str().unwrap().ends_with(".emptydir"));
}

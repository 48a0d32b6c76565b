//! Tests for builder modules

use locking_queue::builders::{build_queue, build_queues};
use locking_queue::config::{QueueConfig, QueueSetConfig};
use locking_queue::runtime::TokioSpawner;

#[tokio::test]
async fn test_build_queue_applies_config() {
    let config = QueueConfig {
        label: "render".to_string(),
        default_lock: Some("render_serial".to_string()),
    };
    let queue =
        build_queue::<u64, anyhow::Error, _>(config, TokioSpawner::current()).unwrap();
    assert_eq!(queue.label(), "render");
    assert_eq!(queue.default_lock().as_str(), "render_serial");
}

#[tokio::test]
async fn test_build_queue_rejects_invalid_config() {
    let config = QueueConfig {
        label: String::new(),
        default_lock: None,
    };
    let result = build_queue::<u64, anyhow::Error, _>(config, TokioSpawner::current());
    assert!(result.is_err());
}

#[tokio::test]
async fn test_build_queues_labels_from_map_keys() {
    let json = r#"{ "queues": { "render": {}, "io": {} } }"#;
    let cfg = QueueSetConfig::from_json_str(json).unwrap();
    let queues = build_queues::<u64, anyhow::Error, _>(&cfg, TokioSpawner::current()).unwrap();
    assert_eq!(queues.len(), 2);
    assert_eq!(queues["render"].label(), "render");
    assert_eq!(queues["io"].label(), "io");
}

#[tokio::test]
async fn test_build_queues_rejects_empty_set() {
    let cfg = QueueSetConfig {
        queues: std::collections::HashMap::new(),
    };
    let result = build_queues::<u64, anyhow::Error, _>(&cfg, TokioSpawner::current());
    assert!(result.is_err());
}

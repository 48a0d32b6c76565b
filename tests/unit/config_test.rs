//! Tests for configuration validation

use std::collections::HashMap;

use locking_queue::config::{QueueConfig, QueueSetConfig};

#[test]
fn test_queue_config_defaults() {
    let config = QueueConfig::default();
    assert_eq!(config.label, "locking-queue");
    assert_eq!(config.default_lock, None);
    assert!(config.validate().is_ok());
}

#[test]
fn test_queue_config_defaults_from_empty_json() {
    let config = QueueConfig::from_json_str("{}").unwrap();
    assert_eq!(config.label, "locking-queue");
    assert_eq!(config.default_lock, None);
}

#[test]
fn test_queue_config_from_json() {
    let json = r#"{
        "label": "render",
        "default_lock": "render_serial"
    }"#;
    let config = QueueConfig::from_json_str(json).unwrap();
    assert_eq!(config.label, "render");
    assert_eq!(config.default_lock, Some("render_serial".to_string()));
}

#[test]
fn test_queue_config_rejects_empty_label() {
    let config = QueueConfig {
        label: String::new(),
        default_lock: None,
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_queue_config_rejects_empty_default_lock() {
    let config = QueueConfig {
        label: "q".to_string(),
        default_lock: Some(String::new()),
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_queue_set_requires_a_queue() {
    let config = QueueSetConfig {
        queues: HashMap::new(),
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_queue_set_names_the_invalid_member() {
    let mut queues = HashMap::new();
    queues.insert(
        "render".to_string(),
        QueueConfig {
            label: String::new(),
            default_lock: None,
        },
    );
    let config = QueueSetConfig { queues };
    let err = config.validate().unwrap_err();
    assert!(err.contains("queue `render` invalid"));
}

#[test]
fn test_queue_set_from_json() {
    let json = r#"{
        "queues": {
            "render": { "default_lock": "render_serial" },
            "io": {}
        }
    }"#;
    let config = QueueSetConfig::from_json_str(json).unwrap();
    assert_eq!(config.queues.len(), 2);
    assert_eq!(
        config.queues["render"].default_lock,
        Some("render_serial".to_string())
    );
    assert_eq!(config.queues["io"].default_lock, None);
}

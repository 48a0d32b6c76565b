//! Tests for error types

use locking_queue::core::{BuildError, TaskError};

#[test]
fn test_failed_display() {
    let err: TaskError<String> = TaskError::Failed("connection reset".to_string());
    assert_eq!(format!("{}", err), "task failed: connection reset");
}

#[test]
fn test_abandoned_display() {
    let err: TaskError<String> = TaskError::Abandoned;
    assert_eq!(format!("{}", err), "task abandoned before completion");
}

#[test]
fn test_into_failed() {
    let err: TaskError<String> = TaskError::Failed("boom".to_string());
    assert_eq!(err.into_failed(), Some("boom".to_string()));

    let err: TaskError<String> = TaskError::Abandoned;
    assert_eq!(err.into_failed(), None);
}

#[test]
fn test_is_abandoned() {
    assert!(TaskError::<String>::Abandoned.is_abandoned());
    assert!(!TaskError::<String>::Failed("x".to_string()).is_abandoned());
}

#[test]
fn test_invalid_config_display() {
    let err = BuildError::InvalidConfig("label must not be empty".to_string());
    assert_eq!(format!("{}", err), "config invalid: label must not be empty");
}

//! Queue configuration structures.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

fn default_label() -> String {
    "locking-queue".to_owned()
}

/// Configuration for a single locking queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Label used in logs and snapshots.
    #[serde(default = "default_label")]
    pub label: String,
    /// Override for the implicit identifier assigned to tasks submitted
    /// without locks. Leave unset to keep the built-in identifier.
    #[serde(default)]
    pub default_lock: Option<String>,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            label: default_label(),
            default_lock: None,
        }
    }
}

impl QueueConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.label.is_empty() {
            return Err("label must not be empty".into());
        }
        if matches!(&self.default_lock, Some(id) if id.is_empty()) {
            return Err("default_lock must not be empty when set".into());
        }
        Ok(())
    }

    /// Parse queue configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

/// Root configuration mapping queue names to their settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueSetConfig {
    /// Map of queue name to configuration.
    pub queues: HashMap<String, QueueConfig>,
}

impl QueueSetConfig {
    /// Validate all queues and ensure at least one exists.
    pub fn validate(&self) -> Result<(), String> {
        if self.queues.is_empty() {
            return Err("at least one queue must be defined".into());
        }
        for (name, queue) in &self.queues {
            queue
                .validate()
                .map_err(|e| format!("queue `{name}` invalid: {e}"))?;
        }
        Ok(())
    }

    /// Parse a queue set from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

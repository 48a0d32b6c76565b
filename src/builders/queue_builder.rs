//! Builders to construct locking queues from configuration.

use std::collections::HashMap;

use crate::config::{QueueConfig, QueueSetConfig};
use crate::core::{BuildError, LockingQueue, Spawn};

/// Build a single queue from configuration.
///
/// # Errors
///
/// Returns [`BuildError::InvalidConfig`] when validation fails.
pub fn build_queue<T, E, S>(
    config: QueueConfig,
    spawner: S,
) -> Result<LockingQueue<T, E, S>, BuildError>
where
    T: Send + 'static,
    E: Send + 'static,
    S: Spawn + Send + Sync + 'static,
{
    LockingQueue::with_config(config, spawner)
}

/// Build every queue in a set, labelling each with its map key.
///
/// # Errors
///
/// Returns [`BuildError::InvalidConfig`] when the set or any member fails
/// validation.
pub fn build_queues<T, E, S>(
    cfg: &QueueSetConfig,
    spawner: S,
) -> Result<HashMap<String, LockingQueue<T, E, S>>, BuildError>
where
    T: Send + 'static,
    E: Send + 'static,
    S: Spawn + Send + Sync + Clone + 'static,
{
    cfg.validate().map_err(BuildError::InvalidConfig)?;

    let mut queues = HashMap::new();
    for (name, queue_cfg) in &cfg.queues {
        let mut queue_cfg = queue_cfg.clone();
        queue_cfg.label = name.clone();
        let queue = LockingQueue::with_config(queue_cfg, spawner.clone())?;
        queues.insert(name.clone(), queue);
    }

    Ok(queues)
}

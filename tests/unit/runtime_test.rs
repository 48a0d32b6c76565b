//! Tests for the tokio spawner and the introspection API

use locking_queue::config::QueueSetConfig;
use locking_queue::core::{LockingQueue, Spawn};
use locking_queue::runtime::{list_queues, snapshot, TokioSpawner};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_tokio_spawner_spawn() {
    let spawner = TokioSpawner::new(tokio::runtime::Handle::current());

    let (tx, rx) = tokio::sync::oneshot::channel();
    spawner.spawn(async move {
        tx.send(123).unwrap();
    });

    let result = rx.await.expect("oneshot result");
    assert_eq!(result, 123);
}

#[test]
fn test_try_current_fails_outside_a_runtime() {
    assert!(TokioSpawner::try_current().is_err());
}

#[test]
fn test_spawner_with_own_runtime() {
    let spawner = TokioSpawner::with_worker_threads(1).unwrap();

    let (tx, rx) = std::sync::mpsc::channel();
    spawner.spawn(async move {
        tx.send(7).unwrap();
    });

    let result = rx.recv_timeout(std::time::Duration::from_secs(5)).unwrap();
    assert_eq!(result, 7);
}

#[test]
fn test_cloned_spawner_keeps_its_runtime_alive() {
    let spawner = TokioSpawner::with_worker_threads(1).unwrap();
    let clone = spawner.clone();
    drop(spawner);

    // The clone shares ownership of the runtime, so it still executes.
    let (tx, rx) = std::sync::mpsc::channel();
    clone.spawn(async move {
        tx.send(11).unwrap();
    });

    let result = rx.recv_timeout(std::time::Duration::from_secs(5)).unwrap();
    assert_eq!(result, 11);
}

#[tokio::test]
async fn test_snapshot_reflects_queue_state() {
    let queue: LockingQueue<u64> = LockingQueue::new();
    let (gate_tx, gate_rx) = tokio::sync::oneshot::channel();
    let handle = queue.enqueue_with_locks(["x"], async move {
        let _ = gate_rx.await;
        Ok(1)
    });

    let snap = snapshot(&queue);
    assert_eq!(snap.label, "locking-queue");
    assert!(!snap.paused);
    assert_eq!(snap.running.len(), 1);
    assert!(snap.queued.is_empty());
    assert_eq!(snap.stats.submitted, 1);

    let json = serde_json::to_string(&snap).unwrap();
    assert!(json.contains(r#""held_locks":["x"]"#));

    gate_tx.send(()).unwrap();
    assert_eq!(handle.await.unwrap(), 1);
}

#[test]
fn test_list_queues_pairs_names_with_default_locks() {
    let json = r#"{ "queues": { "render": { "default_lock": "frame" }, "io": {} } }"#;
    let cfg = QueueSetConfig::from_json_str(json).unwrap();

    let mut listings = list_queues(&cfg);
    listings.sort_by(|a, b| a.name.cmp(&b.name));
    assert_eq!(listings.len(), 2);
    assert_eq!(listings[0].name, "io");
    assert_eq!(listings[0].default_lock, None);
    assert_eq!(listings[1].name, "render");
    assert_eq!(listings[1].default_lock, Some("frame".to_string()));
}

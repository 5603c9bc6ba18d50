//! Integration Tests for the public cache API
//!
//! Exercises set/get/delete, expiry, hooks and the sweeper end to end.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use addcache::{create_key, hook, Cache, CacheConfig, CacheError, Operation};

// == Helper Functions ==

type EventLog = Arc<Mutex<Vec<String>>>;

async fn log_operation<V>(cache: &Cache<V>, operation: Operation, tag: &'static str) -> EventLog
where
    V: std::fmt::Debug + Send + Sync + 'static,
{
    let log: EventLog = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    cache
        .on(operation, move |key, value| {
            sink.lock().unwrap().push(format!("{tag}:{key}={value:?}"));
        })
        .await;
    log
}

fn snapshot(log: &EventLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

#[derive(Debug, PartialEq)]
struct User {
    id: i64,
    name: String,
}

// == Storage ==

#[tokio::test]
async fn test_struct_values_roundtrip() {
    let cache: Cache<User> = Cache::new();
    let key = cache.create_key(["user", "12"]);
    assert_eq!(key, "user:12");

    cache
        .set(
            &key,
            User {
                id: 12,
                name: "Test".to_string(),
            },
        )
        .await;

    let user = cache.get(&key).await.unwrap();
    assert_eq!(
        *user,
        User {
            id: 12,
            name: "Test".to_string()
        }
    );

    cache.delete(&key).await;
    assert_eq!(cache.get(&key).await, Err(CacheError::KeyNotFound(key.clone())));
}

#[tokio::test]
async fn test_caller_keeps_its_own_reference() {
    let cache: Cache<Mutex<Vec<i32>>> = Cache::new();
    let shared = Arc::new(Mutex::new(vec![1]));

    cache.set("list", Arc::clone(&shared)).await;
    shared.lock().unwrap().push(2);

    let stored = cache.get("list").await.unwrap();
    assert_eq!(*stored.lock().unwrap(), vec![1, 2], "no deep copy is made");
}

#[tokio::test]
async fn test_missing_and_expired_are_indistinguishable() {
    let cache: Cache<String> = Cache::new();
    cache
        .set_with_expiry("gone", "v".to_string(), Duration::ZERO)
        .await;

    let expired = cache.get("gone").await.unwrap_err();
    let missing = cache.get("never").await.unwrap_err();

    assert!(matches!(expired, CacheError::KeyNotFound(_)));
    assert!(matches!(missing, CacheError::KeyNotFound(_)));
}

// == Expiry ==

#[tokio::test(start_paused = true)]
async fn test_expiry_boundary() {
    let cache: Cache<String> = Cache::with_interval(Duration::from_secs(3600));
    cache
        .set_with_expiry("k", "v".to_string(), Duration::from_secs(10))
        .await;

    tokio::time::advance(Duration::from_secs(9)).await;
    assert_eq!(*cache.get("k").await.unwrap(), "v");

    tokio::time::advance(Duration::from_secs(1)).await;
    assert!(cache.get("k").await.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_persistent_entries_survive_sweeps() {
    let cache: Cache<String> = Cache::with_interval(Duration::from_secs(1));
    cache.set("forever", "v".to_string()).await;

    tokio::time::sleep(Duration::from_secs(60)).await;

    assert_eq!(*cache.get("forever").await.unwrap(), "v");
    assert_eq!(cache.cleanup_expired().await, 0);
}

#[tokio::test(start_paused = true)]
async fn test_sweep_convergence_without_reads() {
    let cache: Cache<String> = Cache::with_config(
        CacheConfig::default().with_cleanup_interval(Duration::from_secs(2)),
    );
    let deletes = log_operation(&cache, Operation::Delete, "del").await;

    cache
        .set_with_expiry("a", "1".to_string(), Duration::from_secs(1))
        .await;
    cache
        .set_with_expiry("b", "2".to_string(), Duration::from_secs(3))
        .await;
    cache.set("c", "3".to_string()).await;

    // Expiry of "b" plus one full interval.
    tokio::time::sleep(Duration::from_secs(5)).await;

    assert_eq!(cache.len().await, 1);
    let mut events = snapshot(&deletes);
    events.sort();
    assert_eq!(events, vec!["del:a=\"1\"", "del:b=\"2\""]);
}

// == Hooks ==

#[tokio::test]
async fn test_hook_ordering_and_isolation_between_kinds() {
    let cache: Cache<i32> = Cache::new();
    let log: EventLog = Arc::new(Mutex::new(Vec::new()));
    let hooks: Vec<_> = ["first", "second", "third"]
        .into_iter()
        .map(|tag| {
            let sink = Arc::clone(&log);
            hook(move |key: &str, value: &i32| {
                sink.lock().unwrap().push(format!("{tag}:{key}={value}"));
            })
        })
        .collect();

    cache.set_hook(Operation::Create, hooks).await;
    cache.set("n", 1).await;
    cache.delete("n").await;

    assert_eq!(snapshot(&log), vec!["first:n=1", "second:n=1", "third:n=1"]);
}

#[tokio::test]
async fn test_registration_appends() {
    let cache: Cache<i32> = Cache::new();
    let first = log_operation(&cache, Operation::Delete, "a").await;
    let second = log_operation(&cache, Operation::Delete, "b").await;

    cache.set("n", 7).await;
    cache.delete("n").await;
    cache.delete("n").await;

    assert_eq!(snapshot(&first), vec!["a:n=7"]);
    assert_eq!(snapshot(&second), vec!["b:n=7"]);
}

#[tokio::test]
async fn test_one_create_event_per_write() {
    let cache: Cache<i32> = Cache::new();
    let creates = log_operation(&cache, Operation::Create, "c").await;

    cache.set("n", 1).await;
    cache
        .set_with_expiry("n", 2, Duration::from_secs(60))
        .await;
    cache.set("n", 3).await;

    assert_eq!(snapshot(&creates), vec!["c:n=1", "c:n=2", "c:n=3"]);
    assert_eq!(*cache.get("n").await.unwrap(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_panicking_hook_propagates_to_caller() {
    let cache: Cache<i32> = Cache::new();
    cache
        .on(Operation::Create, |_, _| panic!("hook failure"))
        .await;

    let writer = {
        let cache = cache.clone();
        tokio::spawn(async move { cache.set("n", 1).await })
    };

    let err = writer.await.unwrap_err();
    assert!(err.is_panic());
}

// == Stop ==

#[tokio::test(start_paused = true)]
async fn test_stop_cleanup_then_lazy_expiry() {
    let cache: Cache<String> = Cache::with_interval(Duration::from_secs(1));
    let deletes = log_operation(&cache, Operation::Delete, "del").await;

    cache.stop_cleanup().await;
    cache.stop_cleanup().await;
    assert!(!cache.is_cleanup_running().await);

    cache
        .set_with_expiry("k", "v".to_string(), Duration::from_secs(1))
        .await;
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(cache.len().await, 1);

    assert!(cache.get("k").await.is_err());
    assert_eq!(snapshot(&deletes), vec!["del:k=\"v\""]);
}

#[tokio::test]
async fn test_concurrent_stop_calls() {
    let cache: Cache<String> = Cache::with_interval(Duration::from_millis(5));

    let stoppers: Vec<_> = (0..8)
        .map(|_| {
            let cache = cache.clone();
            tokio::spawn(async move { cache.stop_cleanup().await })
        })
        .collect();
    for stopper in stoppers {
        stopper.await.unwrap();
    }

    assert!(!cache.is_cleanup_running().await);
}

#[test]
fn test_free_key_helpers() {
    assert_eq!(create_key(["a", "b"]), "a:b");
    assert_eq!(addcache::create_key_with_delimiter("-", ["a", "b"]), "a-b");
}

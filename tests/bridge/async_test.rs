/*!
 * Async Call Shape Tests
 *
 * Futures spawned on tokio runtimes and on the thread-backed executor
 */

use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use sync_bridge::{BridgeConfig, BridgeError, BridgeResult, ErrorKind, SyncBridge, ThreadSpawner};
use tokio::runtime::{Builder, Runtime};

#[derive(Debug, Clone, PartialEq, Eq)]
enum LoadError {
    Missing(u32),
}

fn runtime() -> Runtime {
    Builder::new_multi_thread()
        .worker_threads(2)
        .enable_time()
        .build()
        .unwrap()
}

async fn load(id: u32) -> Result<String, LoadError> {
    tokio::time::sleep(Duration::from_millis(10)).await;
    if id == 0 {
        Err(LoadError::Missing(id))
    } else {
        Ok(format!("record-{}", id))
    }
}

#[test]
fn test_async_success() {
    let rt = runtime();
    let bridge = SyncBridge::new(BridgeConfig::for_testing().with_timeout(Duration::from_secs(2)));

    let result = bridge.call_async(&rt, load(5));
    assert_eq!(result, Ok("record-5".to_string()));
}

#[test]
fn test_async_error_is_unchanged() {
    let rt = runtime();
    let bridge = SyncBridge::new(BridgeConfig::for_testing());

    let result = bridge.call_async(rt.handle(), load(0));
    assert_eq!(result, Err(BridgeError::Failed(LoadError::Missing(0))));
}

#[test]
fn test_async_value_on_thread_spawner() {
    let spawner = ThreadSpawner::new().with_thread_name("bridge-worker");
    let bridge = SyncBridge::named("thread value", Some(Duration::from_secs(2)));

    let result = bridge.call_async_value(&spawner, async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        std::thread::current().name().map(str::to_string)
    });
    assert_eq!(result, Ok(Some("bridge-worker".to_string())));
}

#[test]
fn test_static_sync_async() {
    let rt = runtime();
    let result = SyncBridge::sync_async(&rt, async { 6 * 7 });
    assert_eq!(result, Ok(42));
}

#[test]
fn test_async_timeout_does_not_cancel_task() {
    let rt = runtime();
    let bridge = SyncBridge::new(
        BridgeConfig::for_testing()
            .with_name("slow load")
            .with_timeout(Duration::from_millis(30)),
    );
    let ran = Arc::new(AtomicBool::new(false));
    let ran_clone = ran.clone();

    let start = Instant::now();
    let result: BridgeResult<(), LoadError> = bridge.call_async(&rt, async move {
        tokio::time::sleep(Duration::from_millis(150)).await;
        ran_clone.store(true, Ordering::SeqCst);
        Ok(())
    });

    assert_eq!(result.unwrap_err().kind(), ErrorKind::TimedOut);
    assert!(start.elapsed() < Duration::from_millis(150));

    let wait_until = Instant::now() + Duration::from_secs(2);
    while !ran.load(Ordering::SeqCst) && Instant::now() < wait_until {
        std::thread::sleep(Duration::from_millis(10));
    }
    assert!(ran.load(Ordering::SeqCst));
}

#[test]
fn test_panicking_future_is_abandoned() {
    let rt = runtime();
    let bridge = SyncBridge::new(BridgeConfig::for_testing().with_name("exploding"));

    let result: BridgeResult<u32, LoadError> = bridge.call_async(&rt, async {
        tokio::time::sleep(Duration::from_millis(5)).await;
        panic!("task exploded");
    });

    match result {
        Err(BridgeError::Abandoned(a)) => assert_eq!(a.what, "exploding"),
        other => panic!("expected abandoned, got {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_bridge_from_blocking_section() {
    let handle = tokio::runtime::Handle::current();

    let result = tokio::task::spawn_blocking(move || {
        let config = BridgeConfig::for_testing().with_timeout(Duration::from_secs(2));
        SyncBridge::new(config).call_async(&handle, load(9))
    })
    .await
    .unwrap();

    assert_eq!(result, Ok("record-9".to_string()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_many_blocking_callers_share_runtime() {
    let handle = tokio::runtime::Handle::current();
    let mut joins = Vec::new();

    for id in 1..=8u32 {
        let handle = handle.clone();
        joins.push(tokio::task::spawn_blocking(move || {
            SyncBridge::default().call_async(&handle, load(id))
        }));
    }

    for (i, join) in joins.into_iter().enumerate() {
        let result = join.await.unwrap();
        assert_eq!(result, Ok(format!("record-{}", i + 1)));
    }
}

/*!
 * Double Completion Tests
 *
 * Protocol violations: sequential, re-entrant and concurrent double fires
 */

use proptest::prelude::*;
use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;
use sync_bridge::{
    BridgeConfig, BridgeMetrics, BridgeObserver, BridgeResult, Fire, ProtocolViolation,
    SyncBridge, ViolationPolicy,
};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Never;

#[derive(Default)]
struct ViolationLog {
    seen: parking_lot::Mutex<Vec<ProtocolViolation>>,
}

impl BridgeObserver for ViolationLog {
    fn on_violation(&self, violation: &ProtocolViolation) {
        self.seen.lock().push(violation.clone());
    }
}

#[test]
fn test_double_fire_keeps_first_value() {
    let log = Arc::new(ViolationLog::default());
    let bridge = SyncBridge::new(BridgeConfig::for_testing().with_name("double"))
        .with_observer(log.clone());

    let mut fires = Vec::new();
    let result: BridgeResult<&str, Never> = bridge.call_value(|completion| {
        fires.push(completion.complete("first"));
        fires.push(completion.complete("second"));
        Ok(())
    });

    assert_eq!(result, Ok("first"));
    assert_eq!(fires, vec![Fire::Accepted, Fire::Rejected]);

    let seen = log.seen.lock();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].what, "double");
}

#[test]
fn test_double_fire_from_worker_thread() {
    let bridge = SyncBridge::new(BridgeConfig::new().with_violation_policy(ViolationPolicy::Log));
    let (tx, rx) = std::sync::mpsc::channel();

    let result: BridgeResult<u32, Never> = bridge.call_value(|completion| {
        thread::spawn(move || {
            let first = completion.complete(1);
            thread::sleep(Duration::from_millis(20));
            let second = completion.complete(2);
            tx.send((first, second)).ok();
        });
        Ok(())
    });

    assert_eq!(result, Ok(1));
    let (first, second) = rx.recv_timeout(Duration::from_secs(2)).unwrap();
    assert!(first.is_accepted());
    assert!(second.is_rejected());
}

#[test]
fn test_concurrent_double_fire_single_winner() {
    let metrics = Arc::new(BridgeMetrics::new());
    let bridge = SyncBridge::new(BridgeConfig::for_testing()).with_observer(metrics.clone());

    for round in 0..200u32 {
        let accepted = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(2));
        let (v1, v2) = (round * 2, round * 2 + 1);
        let mut workers = Vec::with_capacity(2);

        let result: BridgeResult<u32, Never> = bridge.call_value(|completion| {
            for value in [v1, v2] {
                let completion = completion.clone();
                let barrier = barrier.clone();
                let accepted = accepted.clone();
                workers.push(thread::spawn(move || {
                    barrier.wait();
                    let jitter = rand::thread_rng().gen_range(0..64);
                    for _ in 0..jitter {
                        std::hint::spin_loop();
                    }
                    if completion.complete(value).is_accepted() {
                        accepted.fetch_add(1, Ordering::SeqCst);
                    }
                }));
            }
            Ok(())
        });

        let value = result.unwrap();
        assert!(value == v1 || value == v2, "round {}: got {}", round, value);

        for worker in workers {
            worker.join().unwrap();
        }
        assert_eq!(accepted.load(Ordering::SeqCst), 1);
        assert_eq!(metrics.snapshot().violations, u64::from(round) + 1);
    }

    assert_eq!(metrics.snapshot().successes, 200);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "completion called multiple times")]
fn test_assert_policy_panics_in_debug() {
    let bridge = SyncBridge::new(BridgeConfig::new().with_name("strict"));
    let _: BridgeResult<u32, Never> = bridge.call_value(|completion| {
        completion.complete(1);
        completion.complete(2);
        Ok(())
    });
}

proptest! {
    #[test]
    fn prop_first_fire_wins(values in proptest::collection::vec(any::<i64>(), 1..16)) {
        let bridge = SyncBridge::new(BridgeConfig::for_testing());
        let mut fires = Vec::new();

        let result: BridgeResult<i64, Never> = bridge.call_value(|completion| {
            for v in &values {
                fires.push(completion.complete(*v));
            }
            Ok(())
        });

        prop_assert_eq!(result, Ok(values[0]));
        prop_assert_eq!(fires[0], Fire::Accepted);
        prop_assert!(fires[1..].iter().all(|f| f.is_rejected()));
    }
}

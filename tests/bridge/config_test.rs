/*!
 * Configuration Tests
 *
 * Serde round trips and environment overrides
 */

use pretty_assertions::assert_eq;
use serial_test::serial;
use std::time::Duration;
use sync_bridge::{BridgeConfig, StrategyType, SyncBridge, ViolationPolicy, WaitConfig};

const VARS: [&str; 3] = [
    "SYNC_BRIDGE_TIMEOUT_MS",
    "SYNC_BRIDGE_NAME",
    "SYNC_BRIDGE_ON_VIOLATION",
];

fn clear_env() {
    for var in VARS {
        std::env::remove_var(var);
    }
}

#[test]
fn test_json_round_trip() {
    let config = BridgeConfig::new()
        .with_name("disk flush")
        .with_timeout(Duration::from_millis(1500))
        .with_violation_policy(ViolationPolicy::Log)
        .with_wait(WaitConfig::low_latency());

    let json = serde_json::to_value(&config).unwrap();
    assert_eq!(json["name"], "disk flush");
    assert_eq!(json["timeout"], 1500);
    assert_eq!(json["on_violation"], "log");
    assert_eq!(json["wait"]["strategy"], "spin_wait");

    let back: BridgeConfig = serde_json::from_value(json).unwrap();
    assert_eq!(back, config);
}

#[test]
fn test_empty_json_gives_defaults() {
    let config: BridgeConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, BridgeConfig::default());
    assert_eq!(config.label(), "Async-to-sync operation");
    assert_eq!(config.wait.strategy, StrategyType::Auto);
}

#[test]
fn test_partial_json() {
    let json = r#"{"timeout": null, "on_violation": "ignore", "wait": {"strategy": "condvar"}}"#;
    let config: BridgeConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.timeout, None);
    assert_eq!(config.on_violation, ViolationPolicy::Ignore);
    assert_eq!(config.wait.strategy, StrategyType::Condvar);
    assert_eq!(config.wait.max_spins, WaitConfig::default().max_spins);
}

#[test]
#[serial]
fn test_env_overrides() {
    clear_env();
    std::env::set_var("SYNC_BRIDGE_TIMEOUT_MS", "250");
    std::env::set_var("SYNC_BRIDGE_NAME", "from env");
    std::env::set_var("SYNC_BRIDGE_ON_VIOLATION", " LOG ");

    let config = BridgeConfig::from_env();
    clear_env();

    assert_eq!(config.timeout, Some(Duration::from_millis(250)));
    assert_eq!(config.label(), "from env");
    assert_eq!(config.on_violation, ViolationPolicy::Log);
}

#[test]
#[serial]
fn test_env_zero_timeout_means_none() {
    clear_env();
    std::env::set_var("SYNC_BRIDGE_TIMEOUT_MS", "0");

    let config = BridgeConfig::new()
        .with_timeout(Duration::from_secs(1))
        .with_env_overrides();
    clear_env();

    assert_eq!(config.timeout, None);
}

#[test]
#[serial]
fn test_env_invalid_values_ignored() {
    clear_env();
    std::env::set_var("SYNC_BRIDGE_TIMEOUT_MS", "soon");
    std::env::set_var("SYNC_BRIDGE_ON_VIOLATION", "explode");
    std::env::set_var("SYNC_BRIDGE_NAME", "   ");

    let base = BridgeConfig::new()
        .with_name("kept")
        .with_timeout(Duration::from_millis(75));
    let config = base.clone().with_env_overrides();
    clear_env();

    assert_eq!(config, base);
}

#[test]
#[serial]
fn test_env_config_drives_bridge() {
    clear_env();
    std::env::set_var("SYNC_BRIDGE_TIMEOUT_MS", "20");
    std::env::set_var("SYNC_BRIDGE_NAME", "env bridge");

    let bridge = SyncBridge::new(BridgeConfig::from_env());
    clear_env();

    let mut parked = None;
    let result: Result<u8, _> = bridge.call_value(|completion| {
        parked = Some(completion);
        Ok::<(), std::io::Error>(())
    });

    let err = result.unwrap_err();
    assert!(err.is_timeout());
    assert!(err.to_string().contains("env bridge"));
}

//! Binary tests: exit status and diagnostics of the `traffic-sentinel` process.

use serde_json::json;
use std::path::Path;
use std::process::{Command, Output};

fn run_with_config(dir: &Path, config: serde_json::Value) -> Output {
    let config_path = dir.join("config.json");
    std::fs::write(&config_path, config.to_string()).unwrap();
    Command::new(env!("CARGO_BIN_EXE_traffic-sentinel"))
        .current_dir(dir)
        .env("SENTINEL_CONFIG_PATH", &config_path)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn base_config(dir: &Path, model: &Path) -> serde_json::Value {
    json!({
        "access_log": dir.join("access.log"),
        "block_ledger": dir.join("blocked_ips.log"),
        "model_path": model,
        "poll_interval_secs": 0,
    })
}

#[test]
fn missing_model_exits_nonzero_naming_the_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let model = dir.path().join("absent-model.json");
    let out = run_with_config(dir.path(), base_config(dir.path(), &model));

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("absent-model.json"), "stderr: {stderr}");
    assert!(!dir.path().join("blocked_ips.log").exists());
}

#[test]
fn malformed_config_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    std::fs::write(&config_path, "{ \"schema\": ").unwrap();
    let out = Command::new(env!("CARGO_BIN_EXE_traffic-sentinel"))
        .current_dir(dir.path())
        .env("SENTINEL_CONFIG_PATH", &config_path)
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("config.json"), "stderr: {stderr}");
}

#[test]
fn one_shot_run_blocks_and_exits_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let model = dir.path().join("model.json");
    std::fs::write(
        &model,
        json!({
            "name": "zscore-baseline",
            "feature_names": ["request_count", "unique_paths", "unique_countries"],
            "scaler": { "mean": [1.0, 1.0, 1.0], "scale": [1.0, 1.0, 1.0] },
            "classifier": { "kind": "zscore", "threshold": 3.0 }
        })
        .to_string(),
    )
    .unwrap();

    let mut log = String::new();
    for i in 0..10 {
        log.push_str(&format!(
            "17000000{i:02}.0 | 9.9.9.9 | USA | ScrapyBot/2.4.1 | /page/{i}\n"
        ));
    }
    log.push_str("1700000100.0 | 1.2.3.4 | USA | Mozilla/5.0 | /\n");
    std::fs::write(dir.path().join("access.log"), log).unwrap();

    let out = run_with_config(dir.path(), base_config(dir.path(), &model));
    assert!(
        out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    assert_eq!(
        std::fs::read_to_string(dir.path().join("blocked_ips.log")).unwrap(),
        "9.9.9.9\n"
    );
}

//! Shared test utilities.

#![allow(dead_code)]

use ccswitch::config::{ConfigStore, NewProfile, ProfileEnv};
use serde_json::Value;
use tempfile::TempDir;

/// Store backed by a fresh temp directory. Keep the `TempDir` alive.
pub fn temp_store() -> (TempDir, ConfigStore) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = ConfigStore::new(temp_dir.path()).expect("Failed to open store");
    (temp_dir, store)
}

/// Write raw JSON to the store's file.
pub fn write_raw(store: &ConfigStore, value: &Value) {
    std::fs::write(store.config_path(), value.to_string()).expect("Failed to write config");
}

/// Read the store's file back as JSON.
pub fn read_raw(store: &ConfigStore) -> Value {
    let content = std::fs::read_to_string(store.config_path()).expect("Failed to read config");
    serde_json::from_str(&content).expect("Config on disk is not JSON")
}

/// Env-map form parameters with just a token.
pub fn env_profile(name: &str, token: &str) -> NewProfile {
    NewProfile::Env {
        name: name.to_string(),
        description: String::new(),
        env: ProfileEnv {
            auth_token: Some(token.to_string()),
            ..ProfileEnv::default()
        },
    }
}

/// Store seeded with profiles named `names`, current at `current`.
pub fn seeded_store(names: &[&str], current: usize) -> (TempDir, ConfigStore) {
    let (dir, store) = temp_store();
    let providers: Vec<Value> = names
        .iter()
        .map(|name| {
            serde_json::json!({
                "name": name,
                "description": "",
                "env": {"ANTHROPIC_AUTH_TOKEN": format!("{}-token", name)}
            })
        })
        .collect();
    write_raw(
        &store,
        &serde_json::json!({"version": "v2", "providers": providers, "currentIndex": current}),
    );
    (dir, store)
}

//! Version detection, V1 to V2 conversion and structural validation.
//!
//! Detection and validation are separate on purpose: a V2-tagged document
//! is trusted by [`needs_migration`] but still goes through
//! [`validate_v2_config`] at the call site, so a corrupt V2 file can be told
//! apart from one that merely needs upgrading.

use serde_json::{Map, Value};

use crate::config::schema::{
    ConfigDocument, ConfigFileV1, ConfigFileV2, MigrationResult, Profile, ProfileEnv, ProfileV1,
    SchemaVersion, RECOGNIZED_ENV_KEYS,
};

/// True unless the document carries the literal `"v2"` tag.
pub fn needs_migration(doc: &ConfigDocument) -> bool {
    matches!(doc, ConfigDocument::V1(_))
}

/// Pure V1 to V2 transform. Order and `currentIndex` are preserved.
pub fn migrate_v1_to_v2(doc: &ConfigFileV1) -> ConfigFileV2 {
    ConfigFileV2 {
        version: SchemaVersion::V2,
        providers: doc.providers.iter().map(migrate_profile).collect(),
        current_index: usize::try_from(doc.current_index).unwrap_or(0),
        extra: Map::new(),
    }
}

fn migrate_profile(profile: &ProfileV1) -> Profile {
    Profile {
        name: profile.name.clone(),
        description: profile.description.clone(),
        env: ProfileEnv {
            base_url: non_empty(&profile.base_url),
            auth_token: non_empty(&profile.auth_token),
            model: None,
            extra: Map::new(),
        },
        extra: Map::new(),
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Bring any document to V2.
///
/// A V2 document is moved through untouched.
pub fn migrate(doc: ConfigDocument) -> (ConfigFileV2, MigrationResult) {
    match doc {
        ConfigDocument::V2(v2) => (v2, MigrationResult::unchanged()),
        ConfigDocument::V1(v1) => (
            migrate_v1_to_v2(&v1),
            MigrationResult::upgraded(SchemaVersion::V1_LABEL),
        ),
    }
}

/// Structural check of a raw V2 document. Never panics.
pub fn validate_v2_config(raw: &Value) -> bool {
    validation_error(raw).is_none()
}

/// First structural violation of a raw V2 document, if any.
pub fn validation_error(raw: &Value) -> Option<String> {
    let Some(doc) = raw.as_object() else {
        return Some("document is not an object".to_string());
    };

    if doc.get("version").and_then(Value::as_str) != Some(SchemaVersion::V2.as_str()) {
        return Some("version tag is not \"v2\"".to_string());
    }

    let providers = match doc.get("providers").and_then(Value::as_array) {
        Some(list) if !list.is_empty() => list,
        Some(_) => return Some("providers is empty".to_string()),
        None => return Some("providers is not an array".to_string()),
    };

    let Some(index) = doc.get("currentIndex").and_then(Value::as_u64) else {
        return Some("currentIndex is not a non-negative integer".to_string());
    };
    if index >= providers.len() as u64 {
        return Some(format!(
            "currentIndex {} is out of range for {} providers",
            index,
            providers.len()
        ));
    }

    providers
        .iter()
        .enumerate()
        .find_map(|(i, p)| profile_error(p).map(|e| format!("provider #{}: {}", i, e)))
}

fn profile_error(raw: &Value) -> Option<&'static str> {
    let Some(profile) = raw.as_object() else {
        return Some("not an object");
    };

    match profile.get("name").and_then(Value::as_str) {
        Some(name) if !name.is_empty() => {}
        _ => return Some("name is missing or empty"),
    }

    if !profile.get("description").is_some_and(Value::is_string) {
        return Some("description is missing or not a string");
    }

    let Some(env) = profile.get("env").and_then(Value::as_object) else {
        return Some("env is missing or not an object");
    };

    let bad_key = RECOGNIZED_ENV_KEYS
        .iter()
        .any(|key| env.get(*key).is_some_and(|v| !v.is_string()));
    if bad_key {
        return Some("env holds a non-string value for a recognized key");
    }

    None
}

/// Single `"default"` profile with an empty token.
pub fn default_v2_config() -> ConfigFileV2 {
    ConfigFileV2 {
        version: SchemaVersion::V2,
        providers: vec![Profile::default_profile()],
        current_index: 0,
        extra: Map::new(),
    }
}

//! Persisted document shapes.
//!
//! Two schema versions exist on disk:
//!
//! - V1 ("flat"): `{providers: [{name, baseUrl, authToken, description}], currentIndex}`
//! - V2 ("environment-map"): `{version: "v2", providers: [{name, description, env}], currentIndex}`
//!
//! Keys this crate does not know about are kept in `extra` maps so that a
//! load/save round trip does not drop them.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Env var carrying the API endpoint.
pub const ANTHROPIC_BASE_URL: &str = "ANTHROPIC_BASE_URL";
/// Env var carrying the API credential.
pub const ANTHROPIC_AUTH_TOKEN: &str = "ANTHROPIC_AUTH_TOKEN";
/// Env var carrying the model identifier.
pub const ANTHROPIC_MODEL: &str = "ANTHROPIC_MODEL";

/// The env keys a profile may carry, in projection order.
pub const RECOGNIZED_ENV_KEYS: [&str; 3] =
    [ANTHROPIC_BASE_URL, ANTHROPIC_AUTH_TOKEN, ANTHROPIC_MODEL];

/// Name of the profile created when no usable document exists.
pub const DEFAULT_PROFILE_NAME: &str = "default";

/// Version tag written into every V2 document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchemaVersion {
    #[serde(rename = "v2")]
    V2,
}

impl SchemaVersion {
    pub const V1_LABEL: &'static str = "v1";

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V2 => "v2",
        }
    }
}

// -- V1 -----------------------------------------------------------------------

/// Legacy flat profile. Empty strings mean "unset".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileV1 {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub auth_token: String,
    #[serde(default)]
    pub description: String,
}

/// Legacy document without a version tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFileV1 {
    #[serde(default)]
    pub providers: Vec<ProfileV1>,
    /// Kept signed: legacy files may hold negative or fractional values.
    #[serde(default, deserialize_with = "lenient_index")]
    pub current_index: i64,
}

/// Accepts any JSON value for an index.
///
/// Whole numbers, including ones written as `1.0`, keep their value;
/// anything else reads as `0`.
fn lenient_index<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if let Some(index) = value.as_i64() {
        return Ok(index);
    }
    Ok(value
        .as_f64()
        .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= i64::MAX as f64)
        .map_or(0, |f| f as i64))
}

// -- V2 -----------------------------------------------------------------------

/// Environment settings of a V2 profile.
///
/// `None` means the key is absent from the document, which differs from
/// `Some("")`: absent keys are never projected, empty strings are.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileEnv {
    #[serde(rename = "ANTHROPIC_BASE_URL", default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(rename = "ANTHROPIC_AUTH_TOKEN", default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    #[serde(rename = "ANTHROPIC_MODEL", default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProfileEnv {
    /// Recognized keys paired with their stored values, in projection order.
    pub fn entries(&self) -> [(&'static str, Option<&str>); 3] {
        [
            (ANTHROPIC_BASE_URL, self.base_url.as_deref()),
            (ANTHROPIC_AUTH_TOKEN, self.auth_token.as_deref()),
            (ANTHROPIC_MODEL, self.model.as_deref()),
        ]
    }
}

/// One named credential/endpoint set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub env: ProfileEnv,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Profile {
    /// The compiled-in profile used when nothing else is available.
    pub fn default_profile() -> Self {
        Self {
            name: DEFAULT_PROFILE_NAME.to_string(),
            description: String::new(),
            env: ProfileEnv {
                auth_token: Some(String::new()),
                ..ProfileEnv::default()
            },
            extra: Map::new(),
        }
    }
}

/// Current document shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFileV2 {
    pub version: SchemaVersion,
    pub providers: Vec<Profile>,
    #[serde(default)]
    pub current_index: usize,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConfigFileV2 {
    /// Resets an out-of-range `current_index` to `0`.
    ///
    /// Returns true when the index had to be changed.
    pub fn clamp_current_index(&mut self) -> bool {
        if self.current_index < self.providers.len() || self.current_index == 0 {
            return false;
        }
        self.current_index = 0;
        true
    }

    /// Position of the profile named exactly `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.providers.iter().position(|p| p.name == name)
    }
}

// -- Tagged document ------------------------------------------------------------

/// A parsed document of either schema version.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigDocument {
    V1(ConfigFileV1),
    V2(ConfigFileV2),
}

impl ConfigDocument {
    /// Parse a raw JSON value, dispatching on the version tag.
    ///
    /// Anything not tagged `"v2"` is read as V1.
    pub fn from_value(raw: Value) -> Result<Self, serde_json::Error> {
        if is_config_file_v2(&raw) {
            serde_json::from_value(raw).map(ConfigDocument::V2)
        } else {
            serde_json::from_value(raw).map(ConfigDocument::V1)
        }
    }
}

/// Explicit tag check: true iff `raw.version` is the literal string `"v2"`.
pub fn is_config_file_v2(raw: &Value) -> bool {
    raw.get("version").and_then(Value::as_str) == Some(SchemaVersion::V2.as_str())
}

/// Outcome of one load/migrate cycle. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationResult {
    pub migrated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_version: Option<&'static str>,
    pub to_version: &'static str,
}

impl MigrationResult {
    pub fn unchanged() -> Self {
        Self {
            migrated: false,
            from_version: None,
            to_version: SchemaVersion::V2.as_str(),
        }
    }

    pub fn upgraded(from: &'static str) -> Self {
        Self {
            migrated: true,
            from_version: Some(from),
            to_version: SchemaVersion::V2.as_str(),
        }
    }
}

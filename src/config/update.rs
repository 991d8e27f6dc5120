//! Parameter objects for adding and updating profiles.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::config::error::Rejection;
use crate::config::schema::{Profile, ProfileEnv};

/// Three-state field patch.
///
/// A plain `Option` cannot tell "leave it alone" from "remove it", so
/// updates spell both out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    /// Field absent from the patch: stored value is kept.
    #[default]
    Keep,
    /// Field present without a value: stored value is removed.
    Clear,
    /// Field present with a value: stored value is replaced.
    Set(T),
}

impl<T> Patch<T> {
    /// Apply the patch to a stored optional value.
    pub fn apply(self, slot: &mut Option<T>) {
        match self {
            Patch::Keep => {}
            Patch::Clear => *slot = None,
            Patch::Set(value) => *slot = Some(value),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Patch<U> {
        match self {
            Patch::Keep => Patch::Keep,
            Patch::Clear => Patch::Clear,
            Patch::Set(value) => Patch::Set(f(value)),
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    /// `Some` sets, `None` clears. Use `Patch::Keep` for "untouched".
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Patch::Set(v),
            None => Patch::Clear,
        }
    }
}

/// Per-key patch for a profile's env map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvPatch {
    pub base_url: Patch<String>,
    pub auth_token: Patch<String>,
    pub model: Patch<String>,
}

/// Partial update for an existing profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    /// New name, if renaming.
    pub name: Option<String>,
    pub description: Option<String>,
    pub env: EnvPatch,
}

impl ProfileUpdate {
    /// Merge into `profile`. Strings are trimmed; a blank rename is refused.
    pub(crate) fn apply_to(self, profile: &mut Profile) -> Result<(), Rejection> {
        if let Some(name) = self.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(Rejection::EmptyName);
            }
            profile.name = name.to_string();
        }
        if let Some(description) = self.description {
            profile.description = description.trim().to_string();
        }

        let trim = |s: String| s.trim().to_string();
        self.env.base_url.map(trim).apply(&mut profile.env.base_url);
        self.env.auth_token.map(trim).apply(&mut profile.env.auth_token);
        self.env.model.map(trim).apply(&mut profile.env.model);
        Ok(())
    }
}

/// Parameters for a new profile.
///
/// Accepted in two forms, told apart by the presence of an `env` field:
/// the legacy flat form and the env-map form. A malformed `env` is an
/// error, never a silent fallback to the flat form.
#[derive(Debug, Clone, PartialEq)]
pub enum NewProfile {
    Env {
        name: String,
        description: String,
        env: ProfileEnv,
    },
    Flat {
        name: String,
        base_url: String,
        auth_token: String,
        description: String,
    },
}

#[derive(Deserialize)]
struct EnvForm {
    name: String,
    #[serde(default)]
    description: String,
    env: ProfileEnv,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlatForm {
    name: String,
    #[serde(default)]
    base_url: String,
    #[serde(default)]
    auth_token: String,
    #[serde(default)]
    description: String,
}

impl<'de> Deserialize<'de> for NewProfile {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Map::<String, Value>::deserialize(deserializer)?;
        if raw.contains_key("env") {
            let form: EnvForm =
                serde_json::from_value(Value::Object(raw)).map_err(D::Error::custom)?;
            Ok(NewProfile::Env {
                name: form.name,
                description: form.description,
                env: form.env,
            })
        } else {
            let form: FlatForm =
                serde_json::from_value(Value::Object(raw)).map_err(D::Error::custom)?;
            Ok(NewProfile::Flat {
                name: form.name,
                base_url: form.base_url,
                auth_token: form.auth_token,
                description: form.description,
            })
        }
    }
}

impl NewProfile {
    pub fn name(&self) -> &str {
        match self {
            NewProfile::Env { name, .. } | NewProfile::Flat { name, .. } => name,
        }
    }

    /// Normalize into a stored profile, trimming every string.
    ///
    /// Blank name and blank token are refused. Name uniqueness is the
    /// store's job.
    pub(crate) fn into_profile(self) -> Result<Profile, Rejection> {
        let (name, description, env) = match self {
            NewProfile::Env {
                name,
                description,
                env,
            } => {
                let trim = |v: Option<String>| v.map(|s| s.trim().to_string());
                let env = ProfileEnv {
                    base_url: trim(env.base_url),
                    auth_token: trim(env.auth_token),
                    model: trim(env.model),
                    extra: env.extra,
                };
                (name, description, env)
            }
            NewProfile::Flat {
                name,
                base_url,
                auth_token,
                description,
            } => {
                let filled = |s: String| {
                    let s = s.trim();
                    (!s.is_empty()).then(|| s.to_string())
                };
                let env = ProfileEnv {
                    base_url: filled(base_url),
                    auth_token: filled(auth_token),
                    model: None,
                    extra: Map::new(),
                };
                (name, description, env)
            }
        };

        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(Rejection::EmptyName);
        }
        if env.auth_token.as_deref().map_or(true, str::is_empty) {
            return Err(Rejection::EmptyToken);
        }

        Ok(Profile {
            name,
            description: description.trim().to_string(),
            env,
            extra: Map::new(),
        })
    }
}

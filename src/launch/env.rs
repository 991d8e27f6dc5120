//! Environment overlay for the wrapped process.

use crate::config::Profile;

/// Project a profile's settings into env var pairs.
///
/// Only recognized keys with a stored value are emitted. An empty string
/// is a value and is projected; an absent key is not.
pub fn project_env(profile: &Profile) -> Vec<(String, String)> {
    profile
        .env
        .entries()
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key.to_string(), v.to_string())))
        .collect()
}

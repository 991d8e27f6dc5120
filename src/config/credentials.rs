//! Credential access for stored profiles.
//!
//! Tokens are stored in plain text; this module only keeps them out of
//! logs and listings.

use super::schema::Profile;

/// Wrapper for sensitive strings that prevents accidental logging.
///
/// The inner value is never exposed via Debug or Display traits.
/// Use `expose()` to access the actual value when it has to leave the process.
#[derive(Clone, PartialEq, Eq)]
pub struct SecureString(String);

impl SecureString {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Short hint safe to print: the last four characters of long values.
    pub fn hint(&self) -> String {
        let count = self.0.chars().count();
        if count <= 8 {
            return "••••••••".to_string();
        }
        let tail: String = self.0.chars().skip(count - 4).collect();
        format!("••••{}", tail)
    }
}

impl std::fmt::Debug for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecureString(••••••••)")
    }
}

impl std::fmt::Display for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "••••••••")
    }
}

/// Status of the auth token of a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialStatus {
    /// Token present and non-empty.
    Configured(SecureString),
    /// Token stored as an empty string.
    Empty,
    /// No token key at all.
    Missing,
}

impl Profile {
    pub fn resolve_credential(&self) -> CredentialStatus {
        match self.env.auth_token.as_deref() {
            Some("") => CredentialStatus::Empty,
            Some(token) => CredentialStatus::Configured(SecureString::new(token.to_string())),
            None => CredentialStatus::Missing,
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self.resolve_credential(), CredentialStatus::Configured(_))
    }
}

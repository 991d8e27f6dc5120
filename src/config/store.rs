//! File-backed profile storage.
//!
//! The store keeps no document in memory between calls. Every operation
//! loads the file, applies one change and saves it back, so each CLI
//! invocation sees what is on disk at the time it runs. Two processes
//! racing on the same file can lose updates (last write wins).

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::error::{ConfigError, Rejection};
use crate::config::migration::{default_v2_config, migrate, needs_migration, validation_error};
use crate::config::paths::{default_config_dir, CONFIG_FILE_NAME};
use crate::config::schema::{
    is_config_file_v2, ConfigDocument, ConfigFileV2, MigrationResult, Profile,
};
use crate::config::update::{NewProfile, ProfileUpdate};

/// Suffix of the copy made before a corrupt file gets replaced.
const CORRUPT_SUFFIX: &str = "corrupt";

/// Handle to the configuration file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
    path: PathBuf,
}

impl ConfigStore {
    /// Open the store in `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        Self::with_file_name(dir, CONFIG_FILE_NAME)
    }

    /// Open the store with a custom file name inside `dir`.
    pub fn with_file_name(dir: impl Into<PathBuf>, file_name: &str) -> Result<Self, ConfigError> {
        let dir = dir.into();
        let dir = std::path::absolute(&dir).unwrap_or(dir);
        fs::create_dir_all(&dir).map_err(|source| ConfigError::CreateDir {
            path: dir.clone(),
            source,
        })?;
        let path = dir.join(file_name);
        Ok(Self { dir, path })
    }

    /// Open the store at the default location (see [`default_config_dir`]).
    pub fn open_default() -> Result<Self, ConfigError> {
        Self::new(default_config_dir())
    }

    pub fn config_dir(&self) -> &Path {
        &self.dir
    }

    pub fn config_path(&self) -> &Path {
        &self.path
    }

    /// Where a discarded file is copied before it can be overwritten.
    ///
    /// Later, different corruptions go to `<file>.corrupt.1`, `.2` and so on.
    pub fn backup_path(&self) -> PathBuf {
        self.numbered_backup_path(0)
    }

    fn numbered_backup_path(&self, n: u32) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".");
        name.push(CORRUPT_SUFFIX);
        if n > 0 {
            name.push(format!(".{}", n));
        }
        self.path.with_file_name(name)
    }

    // -- Load / save -----------------------------------------------------------

    /// Load the document, migrating it on the way if needed.
    ///
    /// Never fails: a missing, unreadable or invalid file yields the default
    /// document, which is not written back. A migrated document is persisted
    /// right away so migration runs at most once per file.
    pub fn load(&self) -> ConfigFileV2 {
        let raw = match self.read_raw() {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!("No config at {}, using defaults", self.path.display());
                return default_v2_config();
            }
            Err(ConfigError::Parse { source, .. }) => {
                return self.discard(&format!("invalid JSON: {}", source));
            }
            Err(err) => {
                tracing::warn!(error = ?err, "Config unreadable; using default config");
                return default_v2_config();
            }
        };

        if is_config_file_v2(&raw) {
            if let Some(reason) = validation_error(&raw) {
                return self.discard(&format!("invalid v2 config: {}", reason));
            }
        }

        let doc = match ConfigDocument::from_value(raw) {
            Ok(doc) => doc,
            Err(err) => return self.discard(&format!("unrecognized config shape: {}", err)),
        };

        if !needs_migration(&doc) {
            let (mut doc, _) = migrate(doc);
            doc.clamp_current_index();
            return doc;
        }

        let (mut migrated, result) = migrate(doc);
        if migrated.clamp_current_index() {
            tracing::debug!("Reset out-of-range currentIndex to 0 during migration");
        }
        if let Some(reason) = migrated_problem(&migrated) {
            return self.discard(&format!("migrated config is invalid: {}", reason));
        }

        match self.save(&migrated) {
            Ok(()) => tracing::info!(
                from = result.from_version.unwrap_or("unknown"),
                to = result.to_version,
                "Migrated config at {}",
                self.path.display()
            ),
            Err(err) => tracing::warn!(error = ?err, "Migrated config could not be persisted"),
        }
        migrated
    }

    /// Overwrite the file with `doc`.
    ///
    /// Writes to a sibling temp file first and renames it into place.
    pub fn save(&self, doc: &ConfigFileV2) -> Result<(), ConfigError> {
        let mut content = serde_json::to_string_pretty(doc).map_err(ConfigError::Serialize)?;
        content.push('\n');

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(|source| ConfigError::Write {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| {
            let _ = fs::remove_file(&tmp);
            ConfigError::Write {
                path: self.path.clone(),
                source,
            }
        })
    }

    /// Re-read the raw file and migrate it, bypassing load-time fallbacks.
    ///
    /// With no file present, the default document is written and reported
    /// as a migration from `"none"`. A legacy file that would not migrate
    /// into a valid document is left untouched and reported as
    /// [`ConfigError::Invalid`].
    pub fn force_migration(&self) -> Result<MigrationResult, ConfigError> {
        let Some(raw) = self.read_raw()? else {
            self.save(&default_v2_config())?;
            tracing::info!("Created default config at {}", self.path.display());
            return Ok(MigrationResult::upgraded("none"));
        };

        let doc = ConfigDocument::from_value(raw).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })?;
        let (mut migrated, result) = migrate(doc);
        if result.migrated {
            migrated.clamp_current_index();
            if let Some(reason) = migrated_problem(&migrated) {
                return Err(ConfigError::Invalid {
                    path: self.path.clone(),
                    reason,
                });
            }
            self.save(&migrated)?;
            tracing::info!("Migrated config at {}", self.path.display());
        }
        Ok(result)
    }

    fn read_raw(&self) -> Result<Option<Value>, ConfigError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    /// Back up the unusable file and fall back to the default document.
    fn discard(&self, reason: &str) -> ConfigFileV2 {
        match self.back_up() {
            Ok(backup) => tracing::warn!(
                "Discarding config {} ({}); previous contents saved to {}",
                self.path.display(),
                reason,
                backup.display()
            ),
            Err(err) => tracing::warn!(
                "Discarding config {} ({}); backup failed: {}",
                self.path.display(),
                reason,
                err
            ),
        }
        default_v2_config()
    }

    /// Copy the file to the first free backup slot.
    ///
    /// A slot already holding the same bytes is reused, so loading the same
    /// corrupt file repeatedly leaves a single backup.
    fn back_up(&self) -> std::io::Result<PathBuf> {
        let content = fs::read(&self.path)?;
        let mut n = 0;
        loop {
            let backup = self.numbered_backup_path(n);
            match fs::read(&backup) {
                Ok(existing) if existing == content => return Ok(backup),
                Ok(_) => n += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    fs::write(&backup, &content)?;
                    return Ok(backup);
                }
                Err(e) => return Err(e),
            }
        }
    }

    // -- Queries ---------------------------------------------------------------

    /// The active profile. Falls back to the first profile, then to the
    /// compiled-in default.
    pub fn current_config(&self) -> Profile {
        let doc = self.load();
        doc.providers
            .get(doc.current_index)
            .or_else(|| doc.providers.first())
            .cloned()
            .unwrap_or_else(Profile::default_profile)
    }

    pub fn current_index(&self) -> usize {
        self.load().current_index
    }

    pub fn all_configs(&self) -> Vec<Profile> {
        self.load().providers
    }

    pub fn get_config(&self, name: &str) -> Option<Profile> {
        self.load().providers.into_iter().find(|p| p.name == name)
    }

    pub fn has_config(&self, name: &str) -> bool {
        self.load().position(name).is_some()
    }

    // -- Mutations -------------------------------------------------------------

    /// Make profile `index` current.
    ///
    /// Returns `Ok(None)` without touching the file if `index` is out of range.
    pub fn switch_to_index(&self, index: usize) -> Result<Option<Profile>, ConfigError> {
        let mut doc = self.load();
        let Some(profile) = doc.providers.get(index).cloned() else {
            return Ok(None);
        };
        doc.current_index = index;
        self.save(&doc)?;
        tracing::info!("Switched to profile '{}' (#{})", profile.name, index);
        Ok(Some(profile))
    }

    /// Append a new profile.
    pub fn add_config(&self, params: NewProfile) -> Result<Profile, ConfigError> {
        let profile = params.into_profile()?;
        let mut doc = self.load();
        if doc.position(&profile.name).is_some() {
            return Err(Rejection::DuplicateName(profile.name).into());
        }
        doc.providers.push(profile.clone());
        self.save(&doc)?;
        tracing::info!("Added profile '{}'", profile.name);
        Ok(profile)
    }

    /// Remove the profile at `index`, keeping the pointer on the same
    /// logical profile where possible.
    pub fn remove_config_by_index(&self, index: usize) -> Result<Profile, ConfigError> {
        let mut doc = self.load();
        let removed = remove_at(&mut doc, index)?;
        self.save(&doc)?;
        tracing::info!("Removed profile '{}'", removed.name);
        Ok(removed)
    }

    /// Remove the profile named exactly `name`.
    pub fn delete_config(&self, name: &str) -> Result<Profile, ConfigError> {
        let mut doc = self.load();
        let index = doc
            .position(name)
            .ok_or_else(|| Rejection::NotFound(name.to_string()))?;
        let removed = remove_at(&mut doc, index)?;
        self.save(&doc)?;
        tracing::info!("Removed profile '{}'", removed.name);
        Ok(removed)
    }

    /// Merge `update` into the profile named `name`.
    pub fn update_config(&self, name: &str, update: ProfileUpdate) -> Result<Profile, ConfigError> {
        let mut doc = self.load();
        let index = doc
            .position(name)
            .ok_or_else(|| Rejection::NotFound(name.to_string()))?;

        if let Some(new_name) = update.name.as_deref().map(str::trim) {
            let taken = doc
                .providers
                .iter()
                .enumerate()
                .any(|(i, p)| i != index && p.name == new_name);
            if taken {
                return Err(Rejection::DuplicateName(new_name.to_string()).into());
            }
        }

        let profile = &mut doc.providers[index];
        update.apply_to(profile)?;
        let updated = profile.clone();
        self.save(&doc)?;
        tracing::info!("Updated profile '{}'", updated.name);
        Ok(updated)
    }
}

/// Why a freshly migrated document may not be persisted, if it may not.
fn migrated_problem(doc: &ConfigFileV2) -> Option<String> {
    serde_json::to_value(doc).map_or_else(|e| Some(e.to_string()), |v| validation_error(&v))
}

/// Index arithmetic shared by both removal paths.
///
/// Removing the current profile leaves the pointer on whatever shifted
/// into its slot, or on the new last profile.
fn remove_at(doc: &mut ConfigFileV2, index: usize) -> Result<Profile, Rejection> {
    let len = doc.providers.len();
    if index >= len {
        return Err(Rejection::IndexOutOfRange { index, len });
    }
    if len <= 1 {
        return Err(Rejection::LastProfile);
    }

    let removed = doc.providers.remove(index);
    if index < doc.current_index {
        doc.current_index -= 1;
    }
    if doc.current_index >= doc.providers.len() {
        doc.current_index = doc.providers.len() - 1;
    }
    Ok(removed)
}

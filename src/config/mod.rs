mod credentials;
mod error;
pub mod migration;
mod paths;
pub mod schema;
mod store;
mod update;

pub use credentials::{CredentialStatus, SecureString};
pub use error::{ConfigError, Rejection};
pub use migration::{
    default_v2_config, migrate, migrate_v1_to_v2, needs_migration, validate_v2_config,
    validation_error,
};
pub use paths::{default_config_dir, CONFIG_DIR_ENV, CONFIG_DIR_NAME, CONFIG_FILE_NAME};
pub use schema::{
    is_config_file_v2, ConfigDocument, ConfigFileV1, ConfigFileV2, MigrationResult, Profile,
    ProfileEnv, ProfileV1, SchemaVersion,
};
pub use store::ConfigStore;
pub use update::{EnvPatch, NewProfile, Patch, ProfileUpdate};

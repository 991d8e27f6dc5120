use std::path::PathBuf;

/// Env var overriding the configuration directory.
pub const CONFIG_DIR_ENV: &str = "CCSWITCH_CONFIG_DIR";

/// Name of the directory created under the home directory.
pub const CONFIG_DIR_NAME: &str = ".ccswitch";

/// File name of the configuration document.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Returns the configuration directory.
///
/// `$CCSWITCH_CONFIG_DIR` if set and non-empty, otherwise `~/.ccswitch`.
/// Falls back to the current directory if the home directory is unknown.
pub fn default_config_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(CONFIG_DIR_NAME)
}

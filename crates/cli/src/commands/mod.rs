pub mod ask;
pub mod doctor;
pub mod onboard;
pub mod serve;

use docquery_config::AppConfig;
use std::path::{Path, PathBuf};

/// Load the config, naming the file in the error.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, String> {
    AppConfig::load(path).map_err(|e| format!("Failed to load config: {e}"))
}

/// The config file a command reads or writes.
pub fn config_path(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf)
        .unwrap_or_else(|| AppConfig::config_dir().join("config.toml"))
}

//! Path resolution for the config file and key directory.

use std::path::PathBuf;

use crate::cli::Cli;
use crate::config::{default_config_path, default_key_dir, read_config, QrsealConfig};

/// Resolve the config file path, checking QRSEAL_CONFIG env var first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("QRSEAL_CONFIG") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Load the config file, or defaults if there is none.
pub fn load_config() -> anyhow::Result<QrsealConfig> {
    let path = resolve_config_path()?;
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file; using defaults");
        return Ok(QrsealConfig::default());
    }
    tracing::debug!(path = %path.display(), "loading config");
    read_config(&path)
}

/// Resolve the key directory: `--key-dir`/`QRSEAL_KEY_DIR`, then config, then
/// the XDG data directory.
pub fn resolve_key_dir(cli: &Cli, config: &QrsealConfig) -> anyhow::Result<PathBuf> {
    if let Some(dir) = cli.key_dir.clone() {
        return Ok(dir);
    }
    if let Some(dir) = config.keys.dir.as_deref() {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    default_key_dir()
}

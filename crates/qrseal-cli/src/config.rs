use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use qrseal_core::capture::ScanConfig;
use qrseal_core::qr::DEFAULT_QR_SIZE;
use qrseal_core::Settings;

#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct QrsealConfig {
    #[serde(default)]
    pub keys: KeysSection,
    #[serde(default)]
    pub qr: QrSection,
    #[serde(default)]
    pub scan: ScanSection,
}

#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeysSection {
    pub dir: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct QrSection {
    pub size: u32,
}

impl Default for QrSection {
    fn default() -> Self {
        Self {
            size: DEFAULT_QR_SIZE,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScanSection {
    pub attempts: u32,
    pub delay_ms: u64,
    pub timeout_secs: Option<u64>,
}

impl Default for ScanSection {
    fn default() -> Self {
        let defaults = ScanConfig::default();
        Self {
            attempts: defaults.max_attempts,
            delay_ms: defaults.delay.as_millis() as u64,
            timeout_secs: None,
        }
    }
}

impl QrsealConfig {
    pub fn new(key_dir: PathBuf) -> Self {
        Self {
            keys: KeysSection {
                dir: Some(key_dir.to_string_lossy().to_string()),
            },
            ..Self::default()
        }
    }

    /// Workflow settings described by this file.
    pub fn settings(&self) -> Settings {
        Settings {
            qr_size: self.qr.size,
            scan: ScanConfig {
                max_attempts: self.scan.attempts,
                delay: Duration::from_millis(self.scan.delay_ms),
                deadline: self.scan.timeout_secs.map(Duration::from_secs),
            },
        }
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_key_dir() -> anyhow::Result<PathBuf> {
    xdg_data_dir()
}

pub fn read_config(path: &Path) -> anyhow::Result<QrsealConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &QrsealConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("qrseal"));
        }
    }
    Ok(home_dir()?.join(".config").join("qrseal"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("qrseal"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("qrseal"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

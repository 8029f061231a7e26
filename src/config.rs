//! User configuration management
//!
//! Configuration is stored in TOML format at `~/.enginext/config.toml`. Every
//! section is optional; a missing file means defaults.
//!
//! # Examples
//!
//! ```no_run
//! use enginext::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load()?;
//!
//! println!("Registry: {}", config.registry_root().display());
//! println!("Manifest file: {}", config.manifest.file_name);
//! # Ok(())
//! # }
//! ```

use crate::manifest::MANIFEST_FILE_NAME;
use crate::platform::{BuildConfig, Platform};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Overrides the configuration directory (useful for testing)
pub const CONFIG_DIR_ENV: &str = "ENGINEXT_CONFIG_DIR";

/// Overrides `registry.root`
pub const REGISTRY_ENV: &str = "ENGINEXT_REGISTRY";

/// User configuration file (`~/.enginext/config.toml`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub build: BuildSettings,

    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub manifest: ManifestConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Directory scanned for plugin descriptors; `~` is expanded
    #[serde(default = "default_registry_root")]
    pub root: String,
}

fn default_registry_root() -> String {
    "~/.enginext/registry".to_string()
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            root: default_registry_root(),
        }
    }
}

/// Default target when `--platform` / `--config` are not given
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildSettings {
    /// Falls back to the host platform
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,

    #[serde(default)]
    pub config: BuildConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Leave unresolved requirements out of the manifest instead of failing
    #[serde(default)]
    pub allow_missing: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestConfig {
    /// File name written next to the project descriptor
    #[serde(default = "default_manifest_file_name")]
    pub file_name: String,
}

fn default_manifest_file_name() -> String {
    MANIFEST_FILE_NAME.to_string()
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            file_name: default_manifest_file_name(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// tracing filter directive, e.g. "info" or "enginext=debug"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl Config {
    /// Get the default config file path
    ///
    /// Uses ENGINEXT_CONFIG_DIR if set, otherwise ~/.enginext/config.toml
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(config_dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(config_dir).join("config.toml"));
        }

        let home = dirs::home_dir()
            .ok_or_else(|| Error::Other("Could not find home directory".to_string()))?;

        Ok(home.join(".enginext").join("config.toml"))
    }

    /// Load config from the default path
    ///
    /// Environment variable overrides:
    /// - `ENGINEXT_REGISTRY`: overrides `registry.root`
    /// - `ENGINEXT_CONFIG_DIR`: overrides the config directory location
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(Self::default_path()?)?;

        if let Ok(root) = std::env::var(REGISTRY_ENV) {
            if !root.is_empty() {
                config.registry.root = root;
            }
        }

        Ok(config)
    }

    /// Load config from a specific file, or defaults if it doesn't exist
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&path, self.to_toml()?)?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Registry root with `~` expanded
    pub fn registry_root(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.registry.root).to_string())
    }
}

//! Target platforms and build configurations
//!
//! Descriptors, the CLI and the configuration file all spell platforms and
//! configurations the same way the engine's build output directories do:
//! `win_x64`, `win_x86`, `linux_x64` and `Debug`, `Release`,
//! `RelWithDebInfo`, `MinSizeRel`.
//!
//! # Examples
//!
//! ```
//! use enginext::{BuildConfig, Platform};
//!
//! let platform: Platform = "win_x64".parse().unwrap();
//! assert_eq!(platform.as_str(), "win_x64");
//!
//! let config: BuildConfig = "RelWithDebInfo".parse().unwrap();
//! assert_eq!(config, BuildConfig::default());
//! ```

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;

/// A platform the engine produces plugin binaries for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum)]
pub enum Platform {
    #[serde(rename = "win_x86")]
    #[value(name = "win_x86")]
    WinX86,
    #[serde(rename = "win_x64")]
    #[value(name = "win_x64")]
    WinX64,
    #[serde(rename = "linux_x64")]
    #[value(name = "linux_x64")]
    LinuxX64,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::WinX86, Platform::WinX64, Platform::LinuxX64];

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::WinX86 => "win_x86",
            Platform::WinX64 => "win_x64",
            Platform::LinuxX64 => "linux_x64",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown platform '{}'", s))
    }
}

/// Build configuration of a plugin binary
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, ValueEnum)]
pub enum BuildConfig {
    #[value(name = "Debug")]
    Debug,
    #[value(name = "Release")]
    Release,
    #[default]
    #[value(name = "RelWithDebInfo")]
    RelWithDebInfo,
    #[value(name = "MinSizeRel")]
    MinSizeRel,
}

impl BuildConfig {
    pub const ALL: [BuildConfig; 4] = [
        BuildConfig::Debug,
        BuildConfig::Release,
        BuildConfig::RelWithDebInfo,
        BuildConfig::MinSizeRel,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BuildConfig::Debug => "Debug",
            BuildConfig::Release => "Release",
            BuildConfig::RelWithDebInfo => "RelWithDebInfo",
            BuildConfig::MinSizeRel => "MinSizeRel",
        }
    }
}

impl fmt::Display for BuildConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildConfig {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BuildConfig::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown build configuration '{}'", s))
    }
}

/// Detect the platform of the running host
///
/// 32-bit Windows hosts map to `win_x86`; every other Windows host and any
/// host we do not recognise fall back to `win_x64`, the engine's primary
/// target.
pub fn detect_platform() -> Platform {
    match (env::consts::OS, env::consts::ARCH) {
        ("windows", "x86") => Platform::WinX86,
        ("linux", "x86_64") => Platform::LinuxX64,
        _ => Platform::WinX64,
    }
}

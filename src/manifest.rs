//! Runtime extension manifest
//!
//! The engine's plugin loader reads a plain-text manifest with one plugin per
//! line, in load order:
//!
//! ```text
//! name;className;binaryPath;assetPath
//! ```
//!
//! `assetPath` is empty for plugins without assets.
//!
//! # Examples
//!
//! ```no_run
//! use enginext::{emit, write_manifest, BuildConfig, Platform, Registry};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Registry::load("/opt/engine/plugins")?;
//! let order = vec!["CryCore".to_string(), "CryDefaultEntities".to_string()];
//!
//! let entries = emit(&order, &registry, Platform::WinX64, BuildConfig::Release, "/projects/Game")?;
//! write_manifest("/projects/Game/cryext.txt", &entries)?;
//! # Ok(())
//! # }
//! ```

use crate::platform::{BuildConfig, Platform};
use crate::registry::Registry;
use crate::{Error, PluginId, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Default manifest file name, written next to the project descriptor
pub const MANIFEST_FILE_NAME: &str = "cryext.txt";

/// Prefix of the entry-point class exported by every plugin binary
pub const CLASS_NAME_PREFIX: &str = "EngineExtension_";

/// One line of the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub name: String,
    pub class_name: String,
    pub binary_path: PathBuf,
    /// Empty when the plugin has no asset directory
    pub asset_path: PathBuf,
}

impl ManifestEntry {
    /// Format as a manifest line, without the trailing newline
    pub fn to_line(&self) -> String {
        format!(
            "{};{};{};{}",
            self.name,
            self.class_name,
            self.binary_path.display(),
            self.asset_path.display()
        )
    }
}

/// Map resolved plugins to their runtime artifacts, preserving order
///
/// Artifact and asset paths in a descriptor are relative to the descriptor's
/// directory; descriptor directories that are themselves relative are taken
/// relative to `project_dir`. Every plugin must have a binary for the
/// requested platform and configuration.
pub fn emit<P: AsRef<Path>>(
    order: &[PluginId],
    registry: &Registry,
    platform: Platform,
    config: BuildConfig,
    project_dir: P,
) -> Result<Vec<ManifestEntry>> {
    let project_dir = project_dir.as_ref();

    order
        .iter()
        .map(|id| {
            let record = registry.lookup(id)?;
            let artifact = record
                .artifact(platform, config)
                .ok_or_else(|| Error::ArtifactMissing {
                    id: id.clone(),
                    platform,
                    config,
                })?;

            let base = project_dir.join(record.base_dir());
            let binary_path = normalize_path(&base.join(artifact));
            let asset_path = record
                .asset_dir
                .as_ref()
                .map(|dir| normalize_path(&base.join(dir)))
                .unwrap_or_default();

            Ok(ManifestEntry {
                name: record.lib_name.clone().unwrap_or_else(|| id.clone()),
                class_name: class_name(&binary_path),
                binary_path,
                asset_path,
            })
        })
        .collect()
}

/// Entry-point class name for a plugin binary (`EngineExtension_<stem>`)
pub fn class_name(binary_path: &Path) -> String {
    let stem = binary_path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    format!("{}{}", CLASS_NAME_PREFIX, stem)
}

/// Render entries as manifest text, one newline-terminated line each
pub fn render(entries: &[ManifestEntry]) -> String {
    entries
        .iter()
        .map(|entry| entry.to_line() + "\n")
        .collect()
}

/// Replace the manifest at `path`
///
/// Any existing file is removed first so a loader never sees a mix of old
/// and new lines.
pub fn write_manifest<P: AsRef<Path>>(path: P, entries: &[ManifestEntry]) -> Result<()> {
    let path = path.as_ref();

    if path.is_file() {
        fs::remove_file(path)?;
    }

    fs::write(path, render(entries))?;
    tracing::info!(
        "wrote {} manifest entr{} to {}",
        entries.len(),
        if entries.len() == 1 { "y" } else { "ies" },
        path.display()
    );
    Ok(())
}

/// Fold `.` and `..` components without touching the filesystem
fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(
                    normalized.components().next_back(),
                    Some(Component::Normal(_))
                );
                if can_pop {
                    normalized.pop();
                } else if !normalized.has_root() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }

    normalized
}

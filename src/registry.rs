//! Plugin registry built from a directory of descriptors
//!
//! The registry is read once from disk and is immutable afterwards, so one
//! instance can serve any number of resolutions.
//!
//! # Examples
//!
//! ```no_run
//! use enginext::Registry;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Registry::load("/opt/engine/plugins")?;
//!
//! let record = registry.lookup("CryDefaultEntities")?;
//! println!("{} requires {:?}", record.id, record.requirements);
//! # Ok(())
//! # }
//! ```

use crate::descriptor::{Descriptor, DESCRIPTOR_EXTENSIONS};
use crate::platform::{BuildConfig, Platform};
use crate::{Error, PluginId, Result};
use std::collections::btree_map::{self, BTreeMap};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Everything the resolver and emitter need to know about one plugin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginRecord {
    pub id: PluginId,
    pub descriptor_path: PathBuf,
    /// Declared requirements, in declaration order, as written
    pub requirements: Vec<PluginId>,
    pub artifacts: BTreeMap<(Platform, BuildConfig), PathBuf>,
    pub asset_dir: Option<PathBuf>,
    pub lib_name: Option<String>,
    pub engine: Option<String>,
}

impl PluginRecord {
    /// Create a record with no artifacts or assets
    pub fn new(id: impl Into<PluginId>, descriptor_path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            descriptor_path: descriptor_path.into(),
            requirements: Vec::new(),
            artifacts: BTreeMap::new(),
            asset_dir: None,
            lib_name: None,
            engine: None,
        }
    }

    pub fn with_requirements<I, S>(mut self, requirements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PluginId>,
    {
        self.requirements = requirements.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_artifact(
        mut self,
        platform: Platform,
        config: BuildConfig,
        path: impl Into<PathBuf>,
    ) -> Self {
        self.artifacts.insert((platform, config), path.into());
        self
    }

    pub fn with_asset_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.asset_dir = Some(path.into());
        self
    }

    pub fn with_lib_name(mut self, name: impl Into<String>) -> Self {
        self.lib_name = Some(name.into());
        self
    }

    /// Build a record from a parsed descriptor
    pub fn from_descriptor(id: PluginId, path: &Path, descriptor: &Descriptor) -> Self {
        Self {
            id,
            descriptor_path: path.to_path_buf(),
            requirements: descriptor.require.plugins().to_vec(),
            artifacts: descriptor.artifacts(),
            asset_dir: descriptor.asset_dir().map(PathBuf::from),
            lib_name: descriptor.lib_name().map(String::from),
            engine: descriptor.require.engine().map(String::from),
        }
    }

    /// Binary registered for a platform and configuration
    pub fn artifact(&self, platform: Platform, config: BuildConfig) -> Option<&Path> {
        self.artifacts.get(&(platform, config)).map(PathBuf::as_path)
    }

    /// Directory the descriptor lives in; artifact paths are relative to it
    pub fn base_dir(&self) -> &Path {
        self.descriptor_path.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// Read-only map from plugin id to its record
#[derive(Debug, Clone, Default)]
pub struct Registry {
    records: BTreeMap<PluginId, PluginRecord>,
}

impl Registry {
    /// Scan `root` recursively for plugin descriptors
    ///
    /// A missing root yields an empty registry. Empty descriptor files are
    /// skipped; unparsable ones, duplicate ids and self-requirements are
    /// reported as [`Error::RegistryCorrupt`]. A relative root is resolved
    /// against the current directory, so recorded descriptor paths are
    /// always absolute.
    pub fn load<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = std::path::absolute(root.as_ref())?;
        let root = root.as_path();

        if !root.exists() {
            tracing::debug!("registry root {} does not exist", root.display());
            return Ok(Self::default());
        }

        let mut records = Vec::new();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::RegistryCorrupt {
                path: e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf()),
                reason: e.to_string(),
            })?;
            let path = entry.path();

            if !entry.file_type().is_file() || !is_descriptor(path) {
                continue;
            }

            if let Some(record) = load_record(path)? {
                records.push(record);
            }
        }

        let registry = Self::from_records(records)?;
        tracing::debug!(
            "loaded {} plugin descriptor(s) from {}",
            registry.len(),
            root.display()
        );
        Ok(registry)
    }

    /// Build a registry from records that were parsed elsewhere
    pub fn from_records<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = PluginRecord>,
    {
        let mut map: BTreeMap<PluginId, PluginRecord> = BTreeMap::new();

        for record in records {
            if record.requirements.iter().any(|req| *req == record.id) {
                return Err(Error::RegistryCorrupt {
                    path: record.descriptor_path.clone(),
                    reason: format!("plugin '{}' requires itself", record.id),
                });
            }

            match map.entry(record.id.clone()) {
                btree_map::Entry::Occupied(entry) => {
                    let existing = entry.get();
                    return Err(Error::RegistryCorrupt {
                        path: record.descriptor_path.clone(),
                        reason: format!(
                            "plugin '{}' is already declared by '{}'",
                            record.id,
                            existing.descriptor_path.display()
                        ),
                    });
                }
                btree_map::Entry::Vacant(slot) => {
                    slot.insert(record);
                }
            }
        }

        Ok(Self { records: map })
    }

    /// Look up a plugin, failing with [`Error::PluginNotFound`] on a miss
    pub fn lookup(&self, id: &str) -> Result<&PluginRecord> {
        self.get(id)
            .ok_or_else(|| Error::PluginNotFound(id.to_string()))
    }

    pub fn get(&self, id: &str) -> Option<&PluginRecord> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Records in id order
    pub fn iter(&self) -> impl Iterator<Item = &PluginRecord> {
        self.records.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &PluginId> {
        self.records.keys()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn is_descriptor(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| DESCRIPTOR_EXTENSIONS.contains(&ext))
}

fn load_record(path: &Path) -> Result<Option<PluginRecord>> {
    let corrupt = |reason: String| Error::RegistryCorrupt {
        path: path.to_path_buf(),
        reason,
    };

    let content = fs::read_to_string(path).map_err(|e| corrupt(e.to_string()))?;
    if content.trim().is_empty() {
        tracing::debug!("skipping empty descriptor {}", path.display());
        return Ok(None);
    }

    let descriptor = Descriptor::parse(&content).map_err(|e| corrupt(e.to_string()))?;
    let id = descriptor
        .id(path)
        .ok_or_else(|| corrupt("descriptor has no name".to_string()))?;

    Ok(Some(PluginRecord::from_descriptor(id, path, &descriptor)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, reqs: &[&str]) -> PluginRecord {
        PluginRecord::new(id, format!("/registry/{}/{}.cryplugin", id, id))
            .with_requirements(reqs.iter().copied())
    }

    #[test]
    fn test_lookup_found_and_missing() {
        let registry = Registry::from_records(vec![record("A", &[]), record("B", &["A"])]).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.lookup("B").unwrap().requirements, vec!["A"]);

        let err = registry.lookup("C").unwrap_err();
        assert!(matches!(err, Error::PluginNotFound(ref id) if id == "C"));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let registry = Registry::from_records(vec![record("CryAudio", &[])]).unwrap();
        assert!(registry.contains("CryAudio"));
        assert!(!registry.contains("cryaudio"));
    }

    #[test]
    fn test_duplicate_id_is_corrupt() {
        let err = Registry::from_records(vec![record("A", &[]), record("A", &[])]).unwrap_err();
        assert!(matches!(err, Error::RegistryCorrupt { .. }));
        assert!(err.to_string().contains("already declared"));
    }

    #[test]
    fn test_self_requirement_is_corrupt() {
        let err = Registry::from_records(vec![record("A", &["B", "A"])]).unwrap_err();
        assert!(matches!(err, Error::RegistryCorrupt { .. }));
        assert!(err.to_string().contains("requires itself"));
    }

    #[test]
    fn test_empty_registry_is_valid() {
        let registry = Registry::from_records(Vec::new()).unwrap();
        assert!(registry.is_empty());
        assert_eq!(registry.ids().count(), 0);
    }

    #[test]
    fn test_missing_root_loads_empty() {
        let registry = Registry::load("/definitely/not/a/registry").unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_base_dir() {
        let rec = record("A", &[]);
        assert_eq!(rec.base_dir(), Path::new("/registry/A"));

        let bare = PluginRecord::new("B", "B.cryplugin");
        assert_eq!(bare.base_dir(), Path::new(""));
    }

    #[test]
    fn test_is_descriptor() {
        assert!(is_descriptor(Path::new("a/CryAudio.cryplugin")));
        assert!(is_descriptor(Path::new("Game.cryproject")));
        assert!(!is_descriptor(Path::new("a/readme.json")));
        assert!(!is_descriptor(Path::new("a/cryplugin")));
    }
}

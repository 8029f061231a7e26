//! Project and plugin descriptor files (`.cryproject` / `.cryplugin`)
//!
//! Projects and plugins share one JSON schema. A project descriptor names the
//! plugins the project requires; a plugin descriptor additionally lists the
//! shared libraries it builds for each platform and configuration.
//!
//! # Examples
//!
//! ```no_run
//! use enginext::ProjectDescriptor;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let project = ProjectDescriptor::load("Game/Game.cryproject")?;
//! for id in &project.requirements {
//!     println!("requires {}", id);
//! }
//! # Ok(())
//! # }
//! ```

use crate::platform::{BuildConfig, Platform};
use crate::{Error, PluginId, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File extensions recognised as descriptors when scanning a registry
pub const DESCRIPTOR_EXTENSIONS: [&str; 2] = ["cryplugin", "cryproject"];

/// Raw descriptor document as stored on disk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Descriptor {
    #[serde(default)]
    pub info: Info,

    #[serde(default)]
    pub require: Requirements,

    #[serde(default)]
    pub content: Content,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Info {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// The `require` section
///
/// Older descriptors store a bare list of plugin ids; newer ones use a table
/// that also pins the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Requirements {
    List(Vec<PluginId>),
    Table {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        engine: Option<String>,
        #[serde(default)]
        plugins: Vec<PluginId>,
    },
}

impl Default for Requirements {
    fn default() -> Self {
        Requirements::List(Vec::new())
    }
}

impl Requirements {
    pub fn plugins(&self) -> &[PluginId] {
        match self {
            Requirements::List(plugins) => plugins,
            Requirements::Table { plugins, .. } => plugins,
        }
    }

    pub fn engine(&self) -> Option<&str> {
        match self {
            Requirements::List(_) => None,
            Requirements::Table { engine, .. } => engine.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub code: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub libs: Vec<Library>,
}

/// A shared library built by a plugin
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Library {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Platform name -> binary path(s), relative to the descriptor
    #[serde(default)]
    pub shared: BTreeMap<String, SharedArtifact>,
}

/// Binary location for one platform
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SharedArtifact {
    /// One binary used for every build configuration
    Any(String),
    /// Configuration name -> binary
    PerConfig(BTreeMap<String, String>),
}

impl Descriptor {
    /// Parse descriptor JSON
    pub fn parse(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Load a descriptor that the user pointed at directly
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(Error::ProjectNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content).map_err(|e| Error::InvalidProject {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Identifier declared by this descriptor, falling back to the file stem
    pub fn id<P: AsRef<Path>>(&self, path: P) -> Option<PluginId> {
        self.info.name.clone().or_else(|| {
            path.as_ref()
                .file_stem()
                .and_then(|s| s.to_str())
                .map(|s| s.to_string())
        })
    }

    pub fn asset_dir(&self) -> Option<&str> {
        self.content.assets.first().map(String::as_str)
    }

    pub fn code_dir(&self) -> Option<&str> {
        self.content.code.first().map(String::as_str)
    }

    /// Name of the primary (first) library
    pub fn lib_name(&self) -> Option<&str> {
        self.content.libs.first().and_then(|lib| lib.name.as_deref())
    }

    /// Binary paths of the primary library, keyed by platform and configuration
    ///
    /// Platform or configuration names this build does not know are skipped.
    pub fn artifacts(&self) -> BTreeMap<(Platform, BuildConfig), PathBuf> {
        let mut artifacts = BTreeMap::new();

        let Some(lib) = self.content.libs.first() else {
            return artifacts;
        };

        for (platform_name, shared) in &lib.shared {
            let platform = match platform_name.parse::<Platform>() {
                Ok(p) => p,
                Err(e) => {
                    tracing::debug!("ignoring shared entry: {}", e);
                    continue;
                }
            };

            match shared {
                SharedArtifact::Any(path) => {
                    for config in BuildConfig::ALL {
                        artifacts.insert((platform, config), PathBuf::from(path));
                    }
                }
                SharedArtifact::PerConfig(by_config) => {
                    for (config_name, path) in by_config {
                        match config_name.parse::<BuildConfig>() {
                            Ok(config) => {
                                artifacts.insert((platform, config), PathBuf::from(path));
                            }
                            Err(e) => tracing::debug!("ignoring shared entry: {}", e),
                        }
                    }
                }
            }
        }

        artifacts
    }
}

/// A project's identity and direct requirements
#[derive(Debug, Clone)]
pub struct ProjectDescriptor {
    pub name: String,
    pub path: PathBuf,
    /// Direct requirements in declaration order
    pub requirements: Vec<PluginId>,
    pub engine: Option<String>,
    pub asset_dir: Option<PathBuf>,
    pub code_dir: Option<PathBuf>,
}

impl ProjectDescriptor {
    /// Load and parse a project descriptor file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let descriptor = Descriptor::load(path)?;
        Ok(Self::from_descriptor(path, &descriptor))
    }

    pub fn from_descriptor<P: AsRef<Path>>(path: P, descriptor: &Descriptor) -> Self {
        let path = path.as_ref();
        Self {
            name: descriptor.id(path).unwrap_or_default(),
            path: path.to_path_buf(),
            requirements: descriptor.require.plugins().to_vec(),
            engine: descriptor.require.engine().map(String::from),
            asset_dir: descriptor.asset_dir().map(PathBuf::from),
            code_dir: descriptor.code_dir().map(PathBuf::from),
        }
    }

    /// Directory containing the descriptor
    pub fn dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLUGIN_JSON: &str = r#"{
        "info": { "name": "CryDefaultEntities" },
        "require": { "engine": "engine-5.3", "plugins": ["CryCore", "CryPhysics"] },
        "content": {
            "assets": ["Assets"],
            "code": ["Code"],
            "libs": [
                {
                    "name": "CryDefaultEntities",
                    "shared": {
                        "win_x64": "bin/win_x64/CryDefaultEntities.dll",
                        "win_x86": {
                            "Debug": "bin/win_x86_debug/CryDefaultEntities.dll",
                            "Release": "bin/win_x86/CryDefaultEntities.dll"
                        },
                        "durango": "bin/durango/CryDefaultEntities.dll"
                    }
                }
            ]
        }
    }"#;

    #[test]
    fn test_parse_table_requirements() {
        let descriptor = Descriptor::parse(PLUGIN_JSON).unwrap();
        assert_eq!(descriptor.require.plugins(), ["CryCore", "CryPhysics"]);
        assert_eq!(descriptor.require.engine(), Some("engine-5.3"));
        assert_eq!(descriptor.asset_dir(), Some("Assets"));
        assert_eq!(descriptor.code_dir(), Some("Code"));
        assert_eq!(descriptor.lib_name(), Some("CryDefaultEntities"));
    }

    #[test]
    fn test_parse_list_requirements() {
        let descriptor = Descriptor::parse(r#"{ "require": ["B", "A"] }"#).unwrap();
        assert_eq!(descriptor.require.plugins(), ["B", "A"]);
        assert_eq!(descriptor.require.engine(), None);
    }

    #[test]
    fn test_missing_sections_default() {
        let descriptor = Descriptor::parse("{}").unwrap();
        assert!(descriptor.require.plugins().is_empty());
        assert!(descriptor.asset_dir().is_none());
        assert!(descriptor.artifacts().is_empty());
    }

    #[test]
    fn test_artifacts_expand_per_platform_and_config() {
        let descriptor = Descriptor::parse(PLUGIN_JSON).unwrap();
        let artifacts = descriptor.artifacts();

        // win_x64 covers all four configurations, win_x86 only two, durango is unknown
        assert_eq!(artifacts.len(), 6);
        assert_eq!(
            artifacts[&(Platform::WinX64, BuildConfig::MinSizeRel)],
            PathBuf::from("bin/win_x64/CryDefaultEntities.dll")
        );
        assert_eq!(
            artifacts[&(Platform::WinX86, BuildConfig::Debug)],
            PathBuf::from("bin/win_x86_debug/CryDefaultEntities.dll")
        );
        assert!(!artifacts.contains_key(&(Platform::WinX86, BuildConfig::RelWithDebInfo)));
    }

    #[test]
    fn test_id_falls_back_to_file_stem() {
        let descriptor = Descriptor::parse("{}").unwrap();
        assert_eq!(
            descriptor.id("/plugins/CryAudio/CryAudio.cryplugin"),
            Some("CryAudio".to_string())
        );

        let named = Descriptor::parse(PLUGIN_JSON).unwrap();
        assert_eq!(
            named.id("/plugins/other.cryplugin"),
            Some("CryDefaultEntities".to_string())
        );
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(Descriptor::parse("{ not json").is_err());
        assert!(Descriptor::parse(r#"{ "require": 42 }"#).is_err());
    }

    #[test]
    fn test_project_dir_of_bare_file_name() {
        let project = ProjectDescriptor::from_descriptor(
            "Game.cryproject",
            &Descriptor::parse(r#"{ "require": ["A"] }"#).unwrap(),
        );
        assert_eq!(project.name, "Game");
        assert_eq!(project.dir(), PathBuf::from("."));
        assert_eq!(project.requirements, vec!["A".to_string()]);
    }

    #[test]
    fn test_load_missing_project() {
        let err = ProjectDescriptor::load("/definitely/not/here.cryproject").unwrap_err();
        assert!(matches!(err, Error::ProjectNotFound(_)));
        assert_eq!(err.exit_code(), 600);
    }
}

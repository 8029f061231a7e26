//! Test utilities and helpers for enginext integration tests.
//!
//! Fixtures write real descriptor files into temporary directories so tests
//! exercise the same loading path as the CLI.

#![allow(dead_code)]

use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test fixture for a mock plugin descriptor
pub struct MockPlugin {
    pub id: String,
    pub requirements: Vec<String>,
    pub lib_name: Option<String>,
    pub assets: Option<String>,
    /// (platform, config or None for every config, binary path)
    pub binaries: Vec<(String, Option<String>, String)>,
}

impl MockPlugin {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            requirements: vec![],
            lib_name: None,
            assets: None,
            binaries: vec![],
        }
    }

    pub fn with_dependency(mut self, id: &str) -> Self {
        self.requirements.push(id.to_string());
        self
    }

    pub fn with_lib_name(mut self, name: &str) -> Self {
        self.lib_name = Some(name.to_string());
        self
    }

    pub fn with_assets(mut self, dir: &str) -> Self {
        self.assets = Some(dir.to_string());
        self
    }

    /// Register a binary for one platform and configuration
    pub fn with_binary(mut self, platform: &str, config: &str, path: &str) -> Self {
        self.binaries
            .push((platform.to_string(), Some(config.to_string()), path.to_string()));
        self
    }

    /// Register a binary used by every configuration of a platform
    pub fn with_shared_binary(mut self, platform: &str, path: &str) -> Self {
        self.binaries
            .push((platform.to_string(), None, path.to_string()));
        self
    }

    /// Register `bin/<platform>/<id>.dll` for every configuration of win_x64
    pub fn with_default_binary(self) -> Self {
        let path = format!("bin/win_x64/{}.dll", self.id);
        self.with_shared_binary("win_x64", &path)
    }

    /// Create .cryplugin content
    pub fn descriptor_content(&self) -> String {
        let mut shared = Map::new();
        for (platform, config, path) in &self.binaries {
            match config {
                None => {
                    shared.insert(platform.clone(), Value::String(path.clone()));
                }
                Some(config) => {
                    let entry = shared
                        .entry(platform.clone())
                        .or_insert_with(|| Value::Object(Map::new()));
                    if let Value::Object(by_config) = entry {
                        by_config.insert(config.clone(), Value::String(path.clone()));
                    }
                }
            }
        }

        let mut content = Map::new();
        if let Some(assets) = &self.assets {
            content.insert("assets".to_string(), json!([assets]));
        }
        if !shared.is_empty() || self.lib_name.is_some() {
            content.insert(
                "libs".to_string(),
                json!([{
                    "name": self.lib_name.clone().unwrap_or_else(|| self.id.clone()),
                    "shared": shared,
                }]),
            );
        }

        let descriptor = json!({
            "info": { "name": self.id },
            "require": { "plugins": self.requirements },
            "content": content,
        });

        serde_json::to_string_pretty(&descriptor).expect("Failed to serialize descriptor")
    }

    /// Write `<dir>/<id>/<id>.cryplugin`
    pub fn create_in(&self, dir: &Path) -> PathBuf {
        let plugin_dir = dir.join(&self.id);
        fs::create_dir_all(&plugin_dir).expect("Failed to create plugin directory");

        let path = plugin_dir.join(format!("{}.cryplugin", self.id));
        fs::write(&path, self.descriptor_content()).expect("Failed to write .cryplugin");
        path
    }
}

/// A registry directory of plugin descriptors
pub struct TestRegistry {
    pub temp_dir: TempDir,
}

impl TestRegistry {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Registry with the given plugins already written
    pub fn with_plugins(plugins: &[MockPlugin]) -> Self {
        let registry = Self::new();
        for plugin in plugins {
            registry.add_plugin(plugin);
        }
        registry
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn add_plugin(&self, plugin: &MockPlugin) -> PathBuf {
        plugin.create_in(self.path())
    }

    /// Write raw descriptor text at a path relative to the registry root
    pub fn add_raw(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create descriptor directory");
        }
        fs::write(&path, content).expect("Failed to write descriptor");
        path
    }
}

impl Default for TestRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Isolated project directory with its own config directory
pub struct TestProject {
    pub temp_dir: TempDir,
    pub project_path: PathBuf,
    pub config_dir: PathBuf,
}

impl TestProject {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let project_path = temp_dir.path().join("Game");
        let config_dir = temp_dir.path().join(".enginext");

        fs::create_dir_all(&project_path).expect("Failed to create project directory");
        fs::create_dir_all(&config_dir).expect("Failed to create config directory");

        Self {
            temp_dir,
            project_path,
            config_dir,
        }
    }

    /// Project requiring the given plugins, in order
    pub fn requiring(plugins: &[&str]) -> Self {
        let project = Self::new();
        project.create_cryproject(plugins);
        project
    }

    /// Create Game.cryproject
    pub fn create_cryproject(&self, plugins: &[&str]) -> PathBuf {
        let content = json!({
            "info": { "name": "Game" },
            "require": { "engine": "engine-5.7", "plugins": plugins },
            "content": { "assets": ["Assets"], "code": ["Code"] },
        });
        fs::write(
            self.descriptor_path(),
            serde_json::to_string_pretty(&content).expect("Failed to serialize project"),
        )
        .expect("Failed to write .cryproject");
        self.descriptor_path()
    }

    pub fn descriptor_path(&self) -> PathBuf {
        self.project_path.join("Game.cryproject")
    }

    pub fn path(&self) -> &Path {
        &self.project_path
    }

    pub fn config_path(&self) -> &Path {
        &self.config_dir
    }

    pub fn write_config(&self, content: &str) {
        fs::write(self.config_dir.join("config.toml"), content).expect("Failed to write config");
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.project_path.join("cryext.txt")
    }

    pub fn has_manifest(&self) -> bool {
        self.manifest_path().exists()
    }

    pub fn read_manifest(&self) -> String {
        fs::read_to_string(self.manifest_path()).expect("Failed to read manifest")
    }

    /// Plugin names of the manifest lines, in order
    pub fn manifest_names(&self) -> Vec<String> {
        self.read_manifest()
            .lines()
            .filter_map(|line| line.split(';').next())
            .map(String::from)
            .collect()
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_creation() {
        let project = TestProject::requiring(&["A"]);
        assert!(project.descriptor_path().exists());
        assert!(project.config_path().exists());

        let content = fs::read_to_string(project.descriptor_path()).unwrap();
        assert!(content.contains("\"A\""));
    }

    #[test]
    fn test_mock_plugin() {
        let plugin = MockPlugin::new("B")
            .with_dependency("A")
            .with_binary("win_x64", "Release", "bin/B.dll")
            .with_binary("win_x64", "Debug", "bin/B_d.dll");

        let content: Value = serde_json::from_str(&plugin.descriptor_content()).unwrap();
        assert_eq!(content["require"]["plugins"], json!(["A"]));
        assert_eq!(
            content["content"]["libs"][0]["shared"]["win_x64"]["Debug"],
            json!("bin/B_d.dll")
        );
    }

    #[test]
    fn test_registry_creation() {
        let registry = TestRegistry::with_plugins(&[MockPlugin::new("A")]);
        assert!(registry.path().join("A/A.cryplugin").exists());
    }
}

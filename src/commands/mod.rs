pub mod config;
pub mod list;
pub mod require;
pub mod tree;
pub mod why;

use enginext::{detect_platform, BuildConfig, Config, Platform, Registry};
use std::path::PathBuf;

/// Settings shared by every command: command-line flags layered over config
pub struct Context {
    pub config: Config,
    pub platform: Platform,
    pub build_config: BuildConfig,
    pub registry_root: PathBuf,
}

impl Context {
    pub fn new(
        config: Config,
        platform: Option<Platform>,
        build_config: Option<BuildConfig>,
        registry_root: Option<PathBuf>,
    ) -> Self {
        let platform = platform
            .or(config.build.platform)
            .unwrap_or_else(detect_platform);
        let build_config = build_config.unwrap_or(config.build.config);
        let registry_root = registry_root.unwrap_or_else(|| config.registry_root());

        Self {
            config,
            platform,
            build_config,
            registry_root,
        }
    }

    pub fn load_registry(&self) -> enginext::Result<Registry> {
        Registry::load(&self.registry_root)
    }
}

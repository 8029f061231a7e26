//! enginext - plugin dependency resolution for game-engine projects
//!
//! enginext reads a project's required plugins, expands them through a
//! registry of plugin descriptors, orders them so every plugin loads after
//! its dependencies, and writes the manifest the engine's plugin loader
//! consumes at startup:
//!
//! - Transitive requirement discovery with explicit reporting of missing plugins
//! - Deterministic load order with circular dependency detection
//! - Per-platform, per-configuration binary selection
//!
//! # Examples
//!
//! ```no_run
//! use enginext::{emit, resolve_requirements, write_manifest};
//! use enginext::{BuildConfig, MissingPolicy, Platform, ProjectDescriptor, Registry};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Registry::load("/opt/engine/plugins")?;
//! let project = ProjectDescriptor::load("Game/Game.cryproject")?;
//!
//! let resolution = resolve_requirements(&registry, &project.requirements, MissingPolicy::Fail)?;
//! let entries = emit(
//!     &resolution.order,
//!     &registry,
//!     Platform::WinX64,
//!     BuildConfig::Release,
//!     project.dir(),
//! )?;
//! write_manifest(project.dir().join("cryext.txt"), &entries)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`descriptor`] - Parse `.cryproject` / `.cryplugin` descriptors
//! - [`registry`] - Plugin registry built from a descriptor directory
//! - [`graph`] - Transitive requirement discovery
//! - [`resolver`] - Deterministic load-order resolution
//! - [`manifest`] - Runtime manifest emission
//! - [`platform`] - Target platforms and build configurations
//! - [`config`] - User configuration management
//! - [`logging`] - tracing subscriber setup
//! - [`error`] - Error types and result handling

pub mod config;
pub mod descriptor;
pub mod error;
pub mod graph;
pub mod logging;
pub mod manifest;
pub mod platform;
pub mod registry;
pub mod resolver;

/// Case-sensitive plugin identifier, unique within a registry
pub type PluginId = String;

pub use config::Config;
pub use descriptor::{Descriptor, ProjectDescriptor};
pub use error::{Error, Result};
pub use graph::{build, DependencyGraph, DependencyMap};
pub use logging::init_logging;
pub use manifest::{emit, render, write_manifest, ManifestEntry, MANIFEST_FILE_NAME};
pub use platform::{detect_platform, BuildConfig, Platform};
pub use registry::{PluginRecord, Registry};
pub use resolver::{
    resolve, resolve_requirements, resolve_rounds, MissingPolicy, Resolution, ResolvedOrder,
};

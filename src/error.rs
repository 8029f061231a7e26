use crate::platform::{BuildConfig, Platform};
use crate::PluginId;
use std::collections::BTreeSet;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialize error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("'{}' not found.", .0.display())]
    ProjectNotFound(PathBuf),

    #[error("Unable to parse '{}': {reason}", path.display())]
    InvalidProject { path: PathBuf, reason: String },

    #[error("Registry descriptor '{}' is corrupt: {reason}\n\n\
             Hint: Fix or remove the descriptor, then run the command again.",
             path.display())]
    RegistryCorrupt { path: PathBuf, reason: String },

    #[error("Plugin '{0}' not found in registry")]
    PluginNotFound(PluginId),

    #[error("Unresolved requirements: {}\n\n\
             Hint: These plugins are required but no registry descriptor declares them.\n\n\
             Possible solutions:\n\
             1. Check the plugin names in the project's require list\n\
             2. Point --registry at the directory that contains the missing plugins\n\
             3. Use --allow-missing to leave them out of the manifest",
             join_ids(.0))]
    UnresolvedRequirements(BTreeSet<PluginId>),

    #[error("Circular dependency detected between: {}\n\n\
             These plugins depend on each other in a loop (or on a plugin that does).\n\
             One of them needs to drop its requirement to break the cycle.",
             join_ids(.0))]
    CycleDetected(BTreeSet<PluginId>),

    #[error("Plugin '{id}' has no binary registered for {platform}/{config}")]
    ArtifactMissing {
        id: PluginId,
        platform: Platform,
        config: BuildConfig,
    },

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Process exit status the CLI reports for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ProjectNotFound(_) => 600,
            Error::InvalidProject { .. } => 601,
            Error::RegistryCorrupt { .. } => 602,
            Error::PluginNotFound(_) | Error::UnresolvedRequirements(_) => 603,
            Error::CycleDetected(_) => 604,
            Error::ArtifactMissing { .. } => 605,
            _ => 1,
        }
    }
}

fn join_ids(ids: &BTreeSet<PluginId>) -> String {
    ids.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

//! Distribution config: which tool is bundled, at which version, and where
//! the prebuilt artifacts live.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::runtime::Runtime;

pub const DEFAULT_CONFIG_FILE: &str = "exeship.json";
pub const DEFAULT_ARTIFACTS_DIR: &str = "executables";

/// The exact upstream release being bundled, e.g. `3.10.0`.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Version(String);

impl Version {
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Contents of `exeship.json`
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct DistConfig {
    /// Executable name, also the artifact name prefix.
    pub tool: String,
    pub version: Version,
    /// Artifact repository directory. Relative paths are resolved against
    /// the directory holding the config file.
    #[serde(default = "default_artifacts")]
    pub artifacts: PathBuf,
}

fn default_artifacts() -> PathBuf {
    PathBuf::from(DEFAULT_ARTIFACTS_DIR)
}

impl DistConfig {
    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        let content = runtime
            .read_to_string(path)
            .with_context(|| format!("Failed to load config {:?}", path))?;
        let mut config: DistConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config {:?}", path))?;

        config.validate()?;

        if config.artifacts.is_relative() {
            let base = path.parent().unwrap_or_else(|| Path::new(""));
            config.artifacts = base.join(&config.artifacts);
        }

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.tool.trim().is_empty() {
            return Err(Error::Config {
                reason: "tool must not be empty".into(),
            }
            .into());
        }
        if self.version.as_str().trim().is_empty() {
            return Err(Error::Config {
                reason: "version must not be empty".into(),
            }
            .into());
        }
        Ok(())
    }
}

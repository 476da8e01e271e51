//! Artifact lookup: find the prebuilt executable matching a platform.

use anyhow::Result;
use log::debug;
use std::fmt;
use std::path::PathBuf;

use crate::config::{DistConfig, Version};
use crate::error::Error;
use crate::platform::{PlatformKey, RawPlatform, normalize};
use crate::runtime::Runtime;

const EXE_SUFFIX: &str = ".exe";

/// File name of an artifact in the repository, without the optional `.exe`.
///
/// Always `<tool>_v<version>_<os>_<arch>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactName(String);

impl ArtifactName {
    pub fn new(tool: &str, version: &Version, key: &PlatformKey) -> Self {
        Self(format!("{}_v{}_{}_{}", tool, version, key.os, key.arch))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `.exe` variant of this name
    pub fn with_exe_suffix(&self) -> String {
        format!("{}{}", self.0, EXE_SUFFIX)
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Locates artifacts for one tool version inside a repository directory.
#[derive(Debug, Clone)]
pub struct Resolver {
    repository: PathBuf,
    tool: String,
    version: Version,
}

impl Resolver {
    pub fn new(repository: impl Into<PathBuf>, tool: impl Into<String>, version: Version) -> Self {
        Self {
            repository: repository.into(),
            tool: tool.into(),
            version,
        }
    }

    pub fn from_config(config: &DistConfig) -> Self {
        Self::new(&config.artifacts, &config.tool, config.version.clone())
    }

    pub fn artifact_name(&self, key: &PlatformKey) -> ArtifactName {
        ArtifactName::new(&self.tool, &self.version, key)
    }

    /// Name the executable gets once staged: `tool`, or `tool.exe` on Windows.
    pub fn local_name(&self, key: &PlatformKey) -> String {
        if key.is_windows() {
            format!("{}{}", self.tool, EXE_SUFFIX)
        } else {
            self.tool.clone()
        }
    }

    /// Normalize the raw platform and look up its artifact.
    #[tracing::instrument(skip(self, runtime))]
    pub fn resolve<R: Runtime>(&self, runtime: &R, raw: &RawPlatform) -> Result<PathBuf> {
        let key = normalize(raw);
        debug!("Normalized {} {} to {}", raw.os, raw.arch, key);
        self.resolve_key(runtime, &key)
    }

    /// Look up the artifact for an already normalized key.
    ///
    /// Tries the bare name first, then the `.exe` variant.
    pub fn resolve_key<R: Runtime>(&self, runtime: &R, key: &PlatformKey) -> Result<PathBuf> {
        let name = self.artifact_name(key);
        let candidates = [name.as_str().to_string(), name.with_exe_suffix()];

        for candidate in candidates {
            let path = self.repository.join(&candidate);
            if runtime.exists(&path) {
                debug!("Found artifact {:?}", path);
                return Ok(path);
            }
            debug!("No artifact at {:?}", path);
        }

        Err(Error::UnsupportedPlatform { key: key.clone() }.into())
    }
}

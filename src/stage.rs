//! The `fetch_executables` build phase: copy the matching artifact into
//! `build_temp` and make it executable.

use anyhow::{Context, Result};
use log::info;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::pipeline::{Attribute, Phase, SharedOptions};
use crate::platform::{PlatformDetector, RawPlatform, normalize};
use crate::resolver::Resolver;
use crate::runtime::Runtime;

pub const FETCH_EXECUTABLES: &str = "fetch_executables";

/// Execute permission for owner, group and other.
const EXECUTE_BITS: u32 = 0o111;

/// Resolve the artifact for `raw` and stage it in `build_temp`.
///
/// Returns the path of the staged executable.
#[tracing::instrument(skip(runtime, resolver))]
pub fn stage_executable<R: Runtime>(
    runtime: &R,
    resolver: &Resolver,
    raw: &RawPlatform,
    build_temp: &Path,
) -> Result<PathBuf> {
    runtime.create_dir_all(build_temp)?;

    let key = normalize(raw);
    let artifact = resolver.resolve_key(runtime, &key)?;
    let staged = build_temp.join(resolver.local_name(&key));

    runtime
        .copy_contents(&artifact, &staged)
        .with_context(|| format!("Failed to stage {:?}", artifact))?;
    mark_executable(runtime, &staged)?;

    info!("Staged {:?} as {:?}", artifact, staged);
    Ok(staged)
}

/// Add execute bits to `path`, keeping every bit already set.
pub fn mark_executable<R: Runtime>(runtime: &R, path: &Path) -> Result<()> {
    let mode = runtime.mode(path)?;
    runtime.set_permissions(path, mode | EXECUTE_BITS)
}

pub struct FetchExecutables<R: Runtime + 'static> {
    runtime: Arc<R>,
    resolver: Resolver,
    detector: Box<dyn PlatformDetector>,
}

impl<R: Runtime + 'static> FetchExecutables<R> {
    pub fn new(runtime: Arc<R>, resolver: Resolver, detector: Box<dyn PlatformDetector>) -> Self {
        Self {
            runtime,
            resolver,
            detector,
        }
    }
}

impl<R: Runtime + 'static> Phase for FetchExecutables<R> {
    fn name(&self) -> &str {
        FETCH_EXECUTABLES
    }

    fn requires(&self) -> &[Attribute] {
        &[Attribute::BuildTemp]
    }

    fn run(&mut self, options: &mut SharedOptions) -> Result<()> {
        let build_temp = options.require_dir(Attribute::BuildTemp, FETCH_EXECUTABLES)?;
        let raw = self.detector.detect();
        stage_executable(self.runtime.as_ref(), &self.resolver, &raw, build_temp)?;
        Ok(())
    }
}

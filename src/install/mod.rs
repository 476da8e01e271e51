//! The `install_executable` install phase: copy everything staged in
//! `build_temp` into `install_scripts`.

use anyhow::{Context, Result};
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::pipeline::{Attribute, Phase, SharedOptions};
use crate::runtime::Runtime;

pub const INSTALL_EXECUTABLE: &str = "install_executable";

/// Recursively copy the contents of `src` into `dst`.
///
/// Directories are created as needed and existing files overwritten. File
/// permission bits are preserved. Returns every file written, in the order
/// they were copied.
#[tracing::instrument(skip(runtime))]
pub fn copy_tree<R: Runtime>(runtime: &R, src: &Path, dst: &Path) -> Result<Vec<PathBuf>> {
    if !runtime.is_dir(src) {
        anyhow::bail!("Cannot copy tree {:?}: not a directory", src);
    }

    runtime.create_dir_all(dst)?;

    let mut outputs = Vec::new();
    for entry in runtime.read_dir(src)? {
        let Some(name) = entry.file_name() else {
            continue;
        };
        let target = dst.join(name);

        if runtime.is_dir(&entry) {
            outputs.extend(copy_tree(runtime, &entry, &target)?);
        } else {
            debug!("Copying {:?} -> {:?}", entry, target);
            runtime
                .copy(&entry, &target)
                .with_context(|| format!("Failed to install {:?}", entry))?;
            outputs.push(target);
        }
    }

    Ok(outputs)
}

pub struct InstallExecutable<R: Runtime + 'static> {
    runtime: Arc<R>,
}

impl<R: Runtime + 'static> InstallExecutable<R> {
    pub fn new(runtime: Arc<R>) -> Self {
        Self { runtime }
    }
}

impl<R: Runtime + 'static> Phase for InstallExecutable<R> {
    fn name(&self) -> &str {
        INSTALL_EXECUTABLE
    }

    fn requires(&self) -> &[Attribute] {
        &[Attribute::BuildTemp, Attribute::InstallScripts]
    }

    fn run(&mut self, options: &mut SharedOptions) -> Result<()> {
        let build_dir = options.require_dir(Attribute::BuildTemp, INSTALL_EXECUTABLE)?;
        let install_dir = options.require_dir(Attribute::InstallScripts, INSTALL_EXECUTABLE)?;

        let outputs = copy_tree(self.runtime.as_ref(), build_dir, install_dir)?;
        info!("Installed {} file(s) into {:?}", outputs.len(), install_dir);

        options.outputs.extend(outputs);
        Ok(())
    }
}

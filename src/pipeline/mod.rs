//! Minimal build/install pipeline.
//!
//! A [`Pipeline`] owns one [`PhaseRegistry`] per command (`build`,
//! `install`, `bdist_wheel`) and the [`SharedOptions`] every phase reads
//! from and writes to. The host's own phases are registered at construction;
//! extensions are appended with [`PhaseRegistry::register_after`].
//!
//! # Structure
//!
//! - `options` - Shared option state and the attributes phases depend on
//! - `registry` - The [`Phase`] trait and per-command ordered registration

mod options;
mod registry;

use anyhow::{Context, Result};
use log::{debug, info};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::runtime::Runtime;
use crate::tag::WheelTag;

pub use options::{Attribute, SharedOptions};
pub use registry::{Phase, PhaseRegistry};

pub const FINALIZE_BUILD: &str = "finalize_build";
pub const FINALIZE_INSTALL: &str = "finalize_install";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Build,
    Install,
    BdistWheel,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Build => "build",
            Command::Install => "install",
            Command::BdistWheel => "bdist_wheel",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct Pipeline<R: Runtime + 'static> {
    runtime: Arc<R>,
    pub options: SharedOptions,
    build: PhaseRegistry,
    install: PhaseRegistry,
    bdist_wheel: PhaseRegistry,
}

impl<R: Runtime + 'static> Pipeline<R> {
    pub fn new(runtime: Arc<R>, options: SharedOptions) -> Self {
        let mut build = PhaseRegistry::new(Command::Build.as_str());
        let mut install = PhaseRegistry::new(Command::Install.as_str());
        build.push_host(Box::new(FinalizeBuild));
        install.push_host(Box::new(FinalizeInstall));

        Self {
            runtime,
            options,
            build,
            install,
            bdist_wheel: PhaseRegistry::new(Command::BdistWheel.as_str()),
        }
    }

    pub fn runtime(&self) -> &Arc<R> {
        &self.runtime
    }

    pub fn command(&self, command: Command) -> &PhaseRegistry {
        match command {
            Command::Build => &self.build,
            Command::Install => &self.install,
            Command::BdistWheel => &self.bdist_wheel,
        }
    }

    pub fn command_mut(&mut self, command: Command) -> &mut PhaseRegistry {
        match command {
            Command::Build => &mut self.build,
            Command::Install => &mut self.install,
            Command::BdistWheel => &mut self.bdist_wheel,
        }
    }

    /// Whether a wheel tag negotiation collaborator is available.
    pub fn has_tagger(&self) -> bool {
        self.options.is_set(Attribute::Tagger)
    }

    #[tracing::instrument(skip(self))]
    pub fn run_build(&mut self) -> Result<()> {
        info!("Running build: {}", self.build.names().join(", "));
        self.build.run(&mut self.options)
    }

    /// Run `build` (unless skipped) and `install`, returning every installed path.
    ///
    /// A skipped build still settles the build options, so `install` finds
    /// what an earlier `build` staged.
    #[tracing::instrument(skip(self))]
    pub fn run_install(&mut self) -> Result<Vec<PathBuf>> {
        if self.options.skip_build {
            debug!("Skipping build phases");
            FinalizeBuild.run(&mut self.options)?;
        } else {
            self.run_build()?;
        }

        info!("Running install: {}", self.install.names().join(", "));
        self.install.run(&mut self.options)?;

        if let Some(record) = self.options.record.clone() {
            self.write_record(&record)?;
        }

        Ok(self.options.outputs.clone())
    }

    /// Run `bdist_wheel` and report the negotiated tag, if tagging is available.
    #[tracing::instrument(skip(self))]
    pub fn run_bdist_wheel(&mut self) -> Result<Option<WheelTag>> {
        self.bdist_wheel.run(&mut self.options)?;
        Ok(self.options.tagger.as_ref().map(|tagger| tagger.tag()))
    }

    fn write_record(&self, record: &std::path::Path) -> Result<()> {
        debug!("Writing {} installed path(s) to {:?}", self.options.outputs.len(), record);
        if let Some(parent) = record.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.runtime.create_dir_all(parent)?;
        }
        let mut content = String::new();
        for output in &self.options.outputs {
            content.push_str(&output.to_string_lossy());
            content.push('\n');
        }
        self.runtime
            .write(record, content.as_bytes())
            .with_context(|| format!("Failed to write install record {:?}", record))
    }
}

/// Fills in `build_temp` from `build_base` when not given explicitly.
struct FinalizeBuild;

impl Phase for FinalizeBuild {
    fn name(&self) -> &str {
        FINALIZE_BUILD
    }

    fn run(&mut self, options: &mut SharedOptions) -> Result<()> {
        if options.build_temp.is_none() {
            options.build_temp = Some(options.build_base.join("temp"));
        }
        debug!("build_temp = {:?}", options.build_temp);
        Ok(())
    }
}

/// Fills in `install_scripts` from `prefix` when not given explicitly.
struct FinalizeInstall;

impl Phase for FinalizeInstall {
    fn name(&self) -> &str {
        FINALIZE_INSTALL
    }

    fn run(&mut self, options: &mut SharedOptions) -> Result<()> {
        if options.install_scripts.is_none() {
            options.install_scripts = options.prefix.as_ref().map(|p| p.join(scripts_dir()));
        }
        debug!("install_scripts = {:?}", options.install_scripts);
        Ok(())
    }
}

fn scripts_dir() -> &'static str {
    if cfg!(windows) { "Scripts" } else { "bin" }
}

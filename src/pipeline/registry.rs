use anyhow::{Context, Result};
use log::debug;

use super::{Attribute, SharedOptions};
use crate::error::Error;
use crate::pipeline::options::missing;

/// One step of a pipeline command.
pub trait Phase {
    fn name(&self) -> &str;

    /// Shared attributes that must be populated before [`Phase::run`].
    fn requires(&self) -> &[Attribute] {
        &[]
    }

    fn run(&mut self, options: &mut SharedOptions) -> Result<()>;
}

/// Ordered phases of a single pipeline command.
pub struct PhaseRegistry {
    command: String,
    phases: Vec<Box<dyn Phase>>,
}

impl PhaseRegistry {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            phases: Vec::new(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn contains(&self, name: &str) -> bool {
        self.phases.iter().any(|p| p.name() == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.phases.iter().map(|p| p.name()).collect()
    }

    /// Host phases are registered on an empty registry at construction.
    pub(crate) fn push_host(&mut self, phase: Box<dyn Phase>) {
        self.phases.push(phase);
    }

    /// Append a phase with no ordering constraint.
    pub fn push(&mut self, phase: Box<dyn Phase>) -> Result<()> {
        self.check_unique(phase.name())?;
        self.phases.push(phase);
        Ok(())
    }

    /// Append `phase` so that it runs after the phase named `after`.
    ///
    /// Phases are only ever appended: `after` must already be registered and
    /// `phase` must not reuse a registered name.
    pub fn register_after(&mut self, after: &str, phase: Box<dyn Phase>) -> Result<()> {
        if !self.contains(after) {
            return Err(Error::UnknownPhase {
                command: self.command.clone(),
                phase: phase.name().to_string(),
                after: after.to_string(),
            }
            .into());
        }
        self.check_unique(phase.name())?;
        debug!(
            "Registering {} after {} in {}",
            phase.name(),
            after,
            self.command
        );
        self.phases.push(phase);
        Ok(())
    }

    fn check_unique(&self, name: &str) -> Result<()> {
        if self.contains(name) {
            return Err(Error::DuplicatePhase {
                command: self.command.clone(),
                phase: name.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Run every phase in order, stopping at the first failure.
    pub fn run(&mut self, options: &mut SharedOptions) -> Result<()> {
        for phase in self.phases.iter_mut() {
            let name = phase.name().to_string();
            if let Some(attribute) = phase.requires().iter().find(|a| !options.is_set(**a)) {
                return Err(missing(*attribute, &name));
            }
            debug!("Running {}/{}", self.command, name);
            phase
                .run(options)
                .with_context(|| format!("{} failed in {}", name, self.command))?;
        }
        Ok(())
    }
}

//! Named failures of the resolver and the pipeline.
//!
//! Everything else (I/O, parse errors) travels as an [`anyhow::Error`] with
//! context attached; these variants exist so callers can tell them apart with
//! `downcast_ref::<Error>()`.

use thiserror::Error;

use crate::platform::PlatformKey;
use crate::pipeline::Attribute;

#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// No artifact in the repository matches the normalized platform.
    #[error("unsupported platform: {}", .key)]
    UnsupportedPlatform { key: PlatformKey },

    /// A phase ran before the shared attribute it depends on was populated.
    #[error("phase {phase} requires {attribute}, which is not set")]
    MissingAttribute { phase: String, attribute: Attribute },

    /// `register_after` named a phase the command does not have.
    #[error("cannot register {phase}: no phase named {after} in {command}")]
    UnknownPhase {
        command: String,
        phase: String,
        after: String,
    },

    /// A phase with the same name is already registered.
    #[error("phase {phase} is already registered in {command}")]
    DuplicatePhase { command: String, phase: String },

    /// The distribution config is missing a required value.
    #[error("invalid config: {reason}")]
    Config { reason: String },
}

pub mod config;
pub mod error;
pub mod extend;
pub mod install;
pub mod pipeline;
pub mod platform;
pub mod resolver;
pub mod runtime;
pub mod stage;
pub mod tag;

pub use error::Error;

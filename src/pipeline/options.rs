use anyhow::Result;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::tag::TagNegotiator;

/// Pipeline-level values a phase can declare a dependency on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    /// Transient staging directory populated by the build command.
    BuildTemp,
    /// Directory installed executables must end up in.
    InstallScripts,
    /// The wheel tag negotiation collaborator.
    Tagger,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Attribute::BuildTemp => "build_temp",
            Attribute::InstallScripts => "install_scripts",
            Attribute::Tagger => "wheel tagger",
        };
        f.write_str(name)
    }
}

/// State shared by every phase of one pipeline invocation.
#[derive(Default)]
pub struct SharedOptions {
    /// Root of build output; `build_temp` defaults to `<build_base>/temp`.
    pub build_base: PathBuf,
    pub build_temp: Option<PathBuf>,
    /// Installation prefix; `install_scripts` defaults to `<prefix>/bin`
    /// (`<prefix>/Scripts` on Windows).
    pub prefix: Option<PathBuf>,
    pub install_scripts: Option<PathBuf>,
    /// File to write the installed paths to, one per line.
    pub record: Option<PathBuf>,
    pub skip_build: bool,
    /// Paths written by install phases.
    pub outputs: Vec<PathBuf>,
    pub tagger: Option<Box<dyn TagNegotiator>>,
}

impl SharedOptions {
    pub fn new(build_base: impl Into<PathBuf>) -> Self {
        Self {
            build_base: build_base.into(),
            ..Self::default()
        }
    }

    pub fn is_set(&self, attribute: Attribute) -> bool {
        match attribute {
            Attribute::BuildTemp => self.build_temp.is_some(),
            Attribute::InstallScripts => self.install_scripts.is_some(),
            Attribute::Tagger => self.tagger.is_some(),
        }
    }

    /// Fetch a directory attribute on behalf of `phase`.
    pub fn require_dir(&self, attribute: Attribute, phase: &str) -> Result<&Path> {
        let value = match attribute {
            Attribute::BuildTemp => self.build_temp.as_deref(),
            Attribute::InstallScripts => self.install_scripts.as_deref(),
            Attribute::Tagger => None,
        };
        value.ok_or_else(|| missing(attribute, phase))
    }

    pub fn require_tagger(&mut self, phase: &str) -> Result<&mut Box<dyn TagNegotiator>> {
        self.tagger
            .as_mut()
            .ok_or_else(|| missing(Attribute::Tagger, phase))
    }
}

pub(crate) fn missing(attribute: Attribute, phase: &str) -> anyhow::Error {
    Error::MissingAttribute {
        phase: phase.to_string(),
        attribute,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_dir_set() {
        let mut options = SharedOptions::new("build");
        options.build_temp = Some(PathBuf::from("build/temp"));

        assert!(options.is_set(Attribute::BuildTemp));
        assert_eq!(
            options.require_dir(Attribute::BuildTemp, "p").unwrap(),
            Path::new("build/temp")
        );
    }

    #[test]
    fn test_require_dir_missing() {
        let options = SharedOptions::new("build");

        let err = options
            .require_dir(Attribute::InstallScripts, "install_executable")
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<Error>(),
            Some(&Error::MissingAttribute {
                phase: "install_executable".into(),
                attribute: Attribute::InstallScripts,
            })
        );
        assert_eq!(
            err.to_string(),
            "phase install_executable requires install_scripts, which is not set"
        );
    }

    #[test]
    fn test_require_tagger_missing() {
        let mut options = SharedOptions::new("build");
        assert!(!options.is_set(Attribute::Tagger));
        assert!(options.require_tagger("tag_override").is_err());
    }
}

//! Wheel tag negotiation.
//!
//! The negotiation itself belongs to the packaging front-end; this module
//! describes the interface it exposes ([`TagNegotiator`]), a default
//! implementation, and the `tag_override` phase that marks the package as
//! platform specific.

use anyhow::Result;
use log::debug;
use std::fmt;

use crate::pipeline::{Attribute, Phase, SharedOptions};
use crate::platform::RawPlatform;

pub const TAG_OVERRIDE: &str = "tag_override";

/// `<python>-<abi>-<platform>` compatibility tag of a built package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WheelTag {
    pub python: String,
    pub abi: String,
    pub platform: String,
}

impl fmt::Display for WheelTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.python, self.abi, self.platform)
    }
}

/// What the pipeline may tell the tag negotiation about the package.
pub trait TagNegotiator {
    /// A pure package contains only interpretable source and gets a
    /// universal tag.
    fn set_root_is_pure(&mut self, pure: bool);

    fn root_is_pure(&self) -> bool;

    /// Report `python`/`abi` instead of the interpreter specific pair; the
    /// platform part is kept.
    fn prefer(&mut self, python: &str, abi: &str);

    fn tag(&self) -> WheelTag;
}

/// Default negotiation of a wheel built by the current interpreter.
#[derive(Debug, Clone)]
pub struct BdistWheelTagger {
    plat_name: String,
    interpreter: String,
    root_is_pure: bool,
    preference: Option<(String, String)>,
}

impl BdistWheelTagger {
    pub fn new(plat_name: impl Into<String>, interpreter: impl Into<String>) -> Self {
        Self {
            plat_name: plat_name.into(),
            interpreter: interpreter.into(),
            root_is_pure: true,
            preference: None,
        }
    }
}

impl TagNegotiator for BdistWheelTagger {
    fn set_root_is_pure(&mut self, pure: bool) {
        self.root_is_pure = pure;
    }

    fn root_is_pure(&self) -> bool {
        self.root_is_pure
    }

    fn prefer(&mut self, python: &str, abi: &str) {
        self.preference = Some((python.to_string(), abi.to_string()));
    }

    fn tag(&self) -> WheelTag {
        if self.root_is_pure {
            return WheelTag {
                python: "py3".into(),
                abi: "none".into(),
                platform: "any".into(),
            };
        }
        let (python, abi) = match &self.preference {
            Some((python, abi)) => (python.clone(), abi.clone()),
            None => (self.interpreter.clone(), self.interpreter.clone()),
        };
        WheelTag {
            python,
            abi,
            platform: self.plat_name.clone(),
        }
    }
}

/// Platform part of a wheel tag for a raw host platform, e.g. `linux_x86_64`.
pub fn default_plat_name(raw: &RawPlatform) -> String {
    format!("{}_{}", raw.os, raw.arch)
        .to_lowercase()
        .replace(['-', '.'], "_")
}

/// Marks the package as platform specific with no interpreter requirement.
pub struct TagOverride;

impl Phase for TagOverride {
    fn name(&self) -> &str {
        TAG_OVERRIDE
    }

    fn requires(&self) -> &[Attribute] {
        &[Attribute::Tagger]
    }

    fn run(&mut self, options: &mut SharedOptions) -> Result<()> {
        let tagger = options.require_tagger(TAG_OVERRIDE)?;
        tagger.set_root_is_pure(false);
        tagger.prefer("py2.py3", "none");
        debug!("Negotiated wheel tag {}", tagger.tag());
        Ok(())
    }
}

//! Hooks the fetch, install and tag phases into a host pipeline.

use anyhow::Result;
use log::debug;
use std::sync::Arc;

use crate::config::DistConfig;
use crate::install::InstallExecutable;
use crate::pipeline::{Command, FINALIZE_BUILD, FINALIZE_INSTALL, Pipeline, SharedOptions};
use crate::platform::PlatformDetector;
use crate::resolver::Resolver;
use crate::runtime::Runtime;
use crate::stage::FetchExecutables;
use crate::tag::TagOverride;

/// Append this crate's phases to `pipeline`.
///
/// `tag_override` is only registered when the pipeline has a tag
/// negotiation collaborator.
pub fn extend_pipeline<R: Runtime + 'static>(
    pipeline: &mut Pipeline<R>,
    resolver: Resolver,
    detector: Box<dyn PlatformDetector>,
) -> Result<()> {
    let runtime = Arc::clone(pipeline.runtime());

    pipeline.command_mut(Command::Build).register_after(
        FINALIZE_BUILD,
        Box::new(FetchExecutables::new(Arc::clone(&runtime), resolver, detector)),
    )?;

    pipeline
        .command_mut(Command::Install)
        .register_after(FINALIZE_INSTALL, Box::new(InstallExecutable::new(runtime)))?;

    if pipeline.has_tagger() {
        pipeline
            .command_mut(Command::BdistWheel)
            .push(Box::new(TagOverride))?;
    } else {
        debug!("No wheel tagger available, not registering tag_override");
    }

    Ok(())
}

/// Build a host pipeline for `config` with this crate's phases registered.
#[tracing::instrument(skip(runtime, options, detector))]
pub fn assemble<R: Runtime + 'static>(
    runtime: Arc<R>,
    options: SharedOptions,
    config: &DistConfig,
    detector: Box<dyn PlatformDetector>,
) -> Result<Pipeline<R>> {
    let mut pipeline = Pipeline::new(runtime, options);
    extend_pipeline(&mut pipeline, Resolver::from_config(config), detector)?;
    Ok(pipeline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Version;
    use crate::error::Error;
    use crate::install::INSTALL_EXECUTABLE;
    use crate::platform::HostDetector;
    use crate::runtime::{MockRuntime, RealRuntime};
    use crate::stage::FETCH_EXECUTABLES;
    use crate::tag::{BdistWheelTagger, TAG_OVERRIDE};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn config(artifacts: PathBuf) -> DistConfig {
        DistConfig {
            tool: "tool".into(),
            version: Version::new("1.0.0"),
            artifacts,
        }
    }

    #[test]
    fn test_extend_appends_phases() {
        let mut pipeline = assemble(
            Arc::new(MockRuntime::new()),
            SharedOptions::new("build"),
            &config(PathBuf::from("/repo")),
            Box::new(HostDetector::default()),
        )
        .unwrap();

        assert_eq!(
            pipeline.command(Command::Build).names(),
            vec![FINALIZE_BUILD, FETCH_EXECUTABLES]
        );
        assert_eq!(
            pipeline.command(Command::Install).names(),
            vec![FINALIZE_INSTALL, INSTALL_EXECUTABLE]
        );
        assert!(pipeline.command(Command::BdistWheel).names().is_empty());

        // Extending twice never replaces
        let err = extend_pipeline(
            &mut pipeline,
            Resolver::new("/repo", "tool", Version::new("1.0.0")),
            Box::new(HostDetector::default()),
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::DuplicatePhase { .. })
        ));
    }

    #[test]
    fn test_extend_registers_tag_override_with_tagger() {
        let mut options = SharedOptions::new("build");
        options.tagger = Some(Box::new(BdistWheelTagger::new("linux_x86_64", "cp312")));

        let mut pipeline = assemble(
            Arc::new(MockRuntime::new()),
            options,
            &config(PathBuf::from("/repo")),
            Box::new(HostDetector::default()),
        )
        .unwrap();

        assert_eq!(
            pipeline.command(Command::BdistWheel).names(),
            vec![TAG_OVERRIDE]
        );
        let tag = pipeline.run_bdist_wheel().unwrap().unwrap();
        assert_eq!(tag.to_string(), "py2.py3-none-linux_x86_64");
    }

    #[test]
    fn test_build_then_install_end_to_end() {
        let repo = tempdir().unwrap();
        fs::write(repo.path().join("tool_v1.0.0_linux_amd64"), b"payload").unwrap();
        let build = tempdir().unwrap();
        let prefix = tempdir().unwrap();

        let mut options = SharedOptions::new(build.path());
        options.prefix = Some(prefix.path().to_path_buf());
        options.record = Some(prefix.path().join("record.txt"));

        let detector = HostDetector::new(Some("linux".into()), Some("x86_64".into()));
        let mut pipeline = assemble(
            Arc::new(RealRuntime),
            options,
            &config(repo.path().to_path_buf()),
            Box::new(detector),
        )
        .unwrap();

        let outputs = pipeline.run_install().unwrap();

        let scripts = pipeline.options.install_scripts.clone().unwrap();
        assert_eq!(outputs, vec![scripts.join("tool")]);
        assert_eq!(fs::read(scripts.join("tool")).unwrap(), b"payload");
        assert_eq!(
            fs::read(build.path().join("temp").join("tool")).unwrap(),
            b"payload"
        );

        let record = fs::read_to_string(prefix.path().join("record.txt")).unwrap();
        assert_eq!(record, format!("{}\n", scripts.join("tool").display()));
    }

    #[test]
    fn test_unsupported_platform_aborts_install() {
        let repo = tempdir().unwrap();
        let build = tempdir().unwrap();
        let prefix = tempdir().unwrap();

        let mut options = SharedOptions::new(build.path());
        options.install_scripts = Some(prefix.path().join("bin"));

        let detector = HostDetector::new(Some("linux".into()), Some("x86_64".into()));
        let mut pipeline = assemble(
            Arc::new(RealRuntime),
            options,
            &config(repo.path().to_path_buf()),
            Box::new(detector),
        )
        .unwrap();

        let err = pipeline.run_install().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::UnsupportedPlatform { .. })
        ));
        assert!(!prefix.path().join("bin").exists());
    }
}

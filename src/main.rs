use anyhow::{Context, Result};
use clap::Parser;
use exeship::{
    config::{DEFAULT_CONFIG_FILE, DistConfig},
    extend::assemble,
    pipeline::SharedOptions,
    platform::{HostDetector, PlatformDetector},
    resolver::Resolver,
    runtime::{RealRuntime, Runtime},
    tag::{BdistWheelTagger, default_plat_name},
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// exeship - ship a prebuilt executable inside a package
///
/// Picks the artifact matching the host OS and architecture, stages it
/// with execute permission and installs it into the scripts directory.
///
/// Examples:
///   exeship resolve
///   exeship install --prefix ~/.local
#[derive(Parser, Debug)]
#[command(author, version = env!("EXESHIP_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Distribution config file (also via EXESHIP_CONFIG)
    #[arg(
        long = "config",
        short = 'c',
        env = "EXESHIP_CONFIG",
        value_name = "PATH",
        default_value = DEFAULT_CONFIG_FILE,
        global = true
    )]
    pub config: PathBuf,

    /// Raw OS id to resolve for instead of the host's (e.g. linux, darwin, win32)
    #[arg(long = "os", value_name = "OS", global = true)]
    pub os: Option<String>,

    /// Raw machine id to resolve for instead of the host's (e.g. x86_64, AMD64)
    #[arg(long = "arch", value_name = "ARCH", global = true)]
    pub arch: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print the path of the artifact matching the platform
    Resolve,

    /// Stage the executable into the build directory
    Build(BuildArgs),

    /// Build (unless skipped) and install the executable
    Install(InstallArgs),

    /// Print the wheel tag the package gets
    Tag(TagArgs),
}

#[derive(clap::Args, Debug)]
pub struct BuildArgs {
    /// Base directory for build output
    #[arg(long = "build-base", value_name = "DIR", default_value = "build")]
    pub build_base: PathBuf,

    /// Staging directory (defaults to <build-base>/temp)
    #[arg(long = "build-temp", value_name = "DIR")]
    pub build_temp: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct InstallArgs {
    #[command(flatten)]
    pub build: BuildArgs,

    /// Installation prefix; scripts go to <prefix>/bin
    #[arg(long = "prefix", value_name = "DIR")]
    pub prefix: Option<PathBuf>,

    /// Directory to install the executable into
    #[arg(long = "install-scripts", value_name = "DIR")]
    pub install_scripts: Option<PathBuf>,

    /// Write the list of installed files to this file
    #[arg(long = "record", value_name = "FILE")]
    pub record: Option<PathBuf>,

    /// Install what is already staged without building
    #[arg(long = "skip-build")]
    pub skip_build: bool,
}

#[derive(clap::Args, Debug)]
pub struct TagArgs {
    /// Platform part of the tag (defaults to <os>_<arch> of the host)
    #[arg(long = "plat-name", value_name = "NAME")]
    pub plat_name: Option<String>,

    /// Interpreter tag used when the package is not pure
    #[arg(long = "interpreter", value_name = "TAG", default_value = "py3")]
    pub interpreter: String,

    /// Behave as if no wheel tagging support were installed
    #[arg(long = "no-wheel")]
    pub no_wheel: bool,
}

impl BuildArgs {
    fn options(&self) -> SharedOptions {
        let mut options = SharedOptions::new(&self.build_base);
        options.build_temp = self.build_temp.clone();
        options
    }
}

fn load_config<R: Runtime>(runtime: &R, path: &Path) -> Result<DistConfig> {
    DistConfig::load(runtime, path).context("Cannot read distribution config")
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = Arc::new(RealRuntime);
    let detector = HostDetector::new(cli.os.clone(), cli.arch.clone());

    match cli.command {
        Commands::Resolve => {
            let config = load_config(runtime.as_ref(), &cli.config)?;
            let raw = detector.detect();
            let path = Resolver::from_config(&config).resolve(runtime.as_ref(), &raw)?;
            println!("{}", path.display());
        }
        Commands::Build(args) => {
            let config = load_config(runtime.as_ref(), &cli.config)?;
            let mut pipeline = assemble(runtime, args.options(), &config, Box::new(detector))?;
            pipeline.run_build()?;
        }
        Commands::Install(args) => {
            let config = load_config(runtime.as_ref(), &cli.config)?;
            let mut options = args.build.options();
            options.prefix = args.prefix;
            options.install_scripts = args.install_scripts;
            options.record = args.record;
            options.skip_build = args.skip_build;

            let mut pipeline = assemble(runtime, options, &config, Box::new(detector))?;
            for path in pipeline.run_install()? {
                println!("{}", path.display());
            }
        }
        Commands::Tag(args) => {
            let config = load_config(runtime.as_ref(), &cli.config)?;
            let mut options = SharedOptions::default();
            if !args.no_wheel {
                let plat_name = args
                    .plat_name
                    .unwrap_or_else(|| default_plat_name(&detector.detect()));
                options.tagger = Some(Box::new(BdistWheelTagger::new(
                    plat_name,
                    args.interpreter,
                )));
            }

            let mut pipeline = assemble(runtime, options, &config, Box::new(detector))?;
            match pipeline.run_bdist_wheel()? {
                Some(tag) => println!("{}", tag),
                None => anyhow::bail!("Wheel tagging is not available"),
            }
        }
    }
    Ok(())
}

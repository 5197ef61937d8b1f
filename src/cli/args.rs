//! Command-line arguments of the hook binaries

use crate::hooks::HookKind;
use clap::{Args, CommandFactory, FromArgMatches, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

/// Arguments every hook accepts
#[derive(Debug, Clone, Default, PartialEq, Args)]
pub struct CommonArgs {
    /// The files to run this pre-commit hook on
    pub filenames: Vec<String>,

    #[arg(short, long, help = "Configuration file (default: ./pyproject.toml)")]
    pub config: Option<String>,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase verbosity (repeatable)")]
    pub verbose: u8,
}

/// Arguments of `assert-version-advance`
#[derive(Debug, Clone, PartialEq, Parser)]
#[command(
    name = "assert-version-advance",
    version,
    about = "Refuse to push a version that is not ahead of local tags and the remote"
)]
pub struct VersionGateArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[arg(short, long, default_value = "main", help = "Branch to compare")]
    pub branch: String,

    #[arg(short, long, default_value = "origin", help = "Remote whose history is checked")]
    pub remote: String,

    #[arg(long, help = "File holding the local version (default: project manifests)")]
    pub version_file: Option<PathBuf>,
}

/// Arguments of the tool-wrapping hooks
#[derive(Debug, Clone, PartialEq, Parser)]
#[command(version)]
pub struct HookArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

impl HookArgs {
    /// Parse `argv` under the name and description of `kind`
    ///
    /// # Returns
    /// * `Err(clap::Error)` - On invalid arguments, `--help` or `--version`
    pub fn try_parse_for<I, T>(kind: HookKind, argv: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = HookArgs::command()
            .name(kind.name())
            .about(kind.about())
            .try_get_matches_from(argv)?;
        HookArgs::from_arg_matches(&matches)
    }

    /// Parse the process arguments, exiting with usage on error
    pub fn parse_for(kind: HookKind) -> Self {
        HookArgs::try_parse_for(kind, std::env::args_os()).unwrap_or_else(|e| e.exit())
    }
}

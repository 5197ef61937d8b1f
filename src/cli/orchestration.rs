//! Hook workflows behind the binaries
//!
//! Each `run_*` function takes parsed arguments, loads configuration, runs
//! the hook and returns the exit code to report. The binaries only parse
//! arguments and install the logger.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use crate::boundary::BoundaryWarning;
use crate::cli::args::{CommonArgs, HookArgs, VersionGateArgs};
use crate::config::{load_config, Config, VersionGateConfig};
use crate::domain::RemoteSlug;
use crate::gate::{local_version, DeclarationScanner, GateOptions, GateReport, VersionGate};
use crate::git::{Git2Repository, Repository};
use crate::hooks::{coverage, notebooks, pycodestyle, unittests};
use crate::remote::{read_token, GitHubApi};
use crate::ui;

fn load(common: &CommonArgs) -> Result<Config> {
    let config = load_config(common.config.as_deref()).context("Error loading config")?;
    if let Some(source) = &config.source {
        tracing::debug!(config = %source.display(), "configuration loaded");
    }
    Ok(config)
}

/// Arguments for the version gate workflow
///
/// Mirrors [VersionGateArgs] without depending on clap, so the workflow
/// can be driven programmatically.
#[derive(Debug, Clone, PartialEq)]
pub struct GateWorkflowArgs {
    /// Directory inside the repository to check
    pub root: PathBuf,

    pub branch: String,

    pub remote: String,

    /// Explicit local version file, relative to the repository root
    pub version_file: Option<PathBuf>,
}

impl GateWorkflowArgs {
    pub fn from_cli(args: &VersionGateArgs, root: impl Into<PathBuf>) -> Self {
        GateWorkflowArgs {
            root: root.into(),
            branch: args.branch.clone(),
            remote: args.remote.clone(),
            version_file: args.version_file.clone(),
        }
    }
}

/// Version gate workflow
///
/// 1. Open the repository and resolve the local version
/// 2. Resolve the remote to an owner/repository slug
/// 3. Read the optional API token from the vault file
/// 4. Compare the local version with local tags and the remote history
///
/// # Arguments
///
/// * `args` - Repository location, branch, remote and version file
/// * `config` - `[tool.assert_version_advance]` settings
///
/// # Returns
///
/// The report of the comparison, or an error for anything that prevents it
pub fn run_version_gate(args: &GateWorkflowArgs, config: &VersionGateConfig) -> Result<GateReport> {
    let repo = Git2Repository::open(&args.root)
        .with_context(|| format!("Not in a git repository: {}", args.root.display()))?;
    let workdir = repo.workdir().unwrap_or_else(|| args.root.clone());

    let local = local_version::resolve(&workdir, args.version_file.as_deref())?;
    tracing::info!(version = %local.version, source = %local.source.display(), "local version");

    let url = match repo.remote_url(&args.remote)? {
        Some(url) => url,
        None => bail!(
            "Remote '{}' not found. Available remotes: {}",
            args.remote,
            repo.remote_names()?.join(", ")
        ),
    };
    let slug = RemoteSlug::from_url(&url)?;
    tracing::info!(remote = %args.remote, %slug, "checking remote");

    let mut warnings = Vec::new();
    let vault = workdir.join(&config.vault_file);
    let token = read_token(&vault)?;
    if token.is_none() && vault.is_file() {
        warnings.push(BoundaryWarning::MissingToken {
            vault: vault.display().to_string(),
        });
    }

    let api = GitHubApi::new(&config.api_url, &slug, token)?;
    let options = GateOptions {
        branch: args.branch.clone(),
        tag_prefix: config.tag_prefix.clone(),
    };
    let gate = VersionGate::new(
        &repo,
        &api,
        DeclarationScanner::new(config.suffixes.clone()),
        options,
    );

    let mut report = gate.evaluate(&local.version)?;
    warnings.append(&mut report.warnings);
    report.warnings = warnings;
    Ok(report)
}

/// `assert-version-advance`: exit 0 when the push may proceed
pub fn assert_version_advance(args: &VersionGateArgs) -> Result<i32> {
    let config = load(&args.common)?;
    let workflow = GateWorkflowArgs::from_cli(args, Path::new("."));

    let report = run_version_gate(&workflow, &config.tool.assert_version_advance)?;
    ui::display_gate_report(&report);

    Ok(if report.outcome.is_pass() { 0 } else { 1 })
}

/// `run-pycodestyle`
pub fn run_pycodestyle(args: &HookArgs) -> Result<i32> {
    let config = load(&args.common)?;
    Ok(pycodestyle::run_pycodestyle(
        &args.common.filenames,
        &config.tool.run_pycodestyle,
        args.common.verbose,
    )?)
}

/// `clear-ipynb-cells`
pub fn clear_ipynb_cells(args: &HookArgs) -> Result<i32> {
    Ok(notebooks::clear_notebooks(&args.common.filenames)?)
}

/// `run-ipynb`
pub fn run_ipynb(args: &HookArgs) -> Result<i32> {
    let config = load(&args.common)?;
    Ok(notebooks::run_notebooks(
        &args.common.filenames,
        &config.tool.run_ipynb,
    )?)
}

/// `run-run-unittests`
pub fn run_run_unittests(args: &HookArgs) -> Result<i32> {
    let config = load(&args.common)?;
    Ok(unittests::run_unittests(
        &config.tool.run_run_unittests,
        Path::new("."),
    )?)
}

/// `run-coverage`
pub fn run_coverage(args: &HookArgs) -> Result<i32> {
    let config = load(&args.common)?;
    let source = match &config.source {
        Some(path) => format!("Values have been loaded from {}", path.display()),
        None => "Default values have been used.".to_string(),
    };
    Ok(coverage::run_coverage(
        &config.tool.run_coverage,
        &source,
        Path::new("."),
        args.common.verbose,
    )?)
}

/// `test-hook`: echo the arguments
pub fn test_hook<I: IntoIterator<Item = String>>(argv: I) -> i32 {
    let args: Vec<String> = argv.into_iter().collect();
    println!("{:?}", args);
    0
}

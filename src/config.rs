use crate::error::{HookError, Result};
use crate::remote::github::DEFAULT_API_URL;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Project file searched in the working directory
pub const PROJECT_FILE: &str = "pyproject.toml";

/// File searched in the user configuration directory
pub const USER_CONFIG_FILE: &str = "pre-commit-hooks.toml";

/// Represents the complete configuration for the hooks.
///
/// Every hook reads its own `[tool.<hook_name>]` table; all other tables of
/// the file (e.g. `[project]` in a `pyproject.toml`) are ignored.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub tool: ToolConfig,

    /// File the configuration was read from, `None` for defaults
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// Per-hook configuration tables
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ToolConfig {
    #[serde(default)]
    pub assert_version_advance: VersionGateConfig,

    #[serde(default)]
    pub run_pycodestyle: PycodestyleConfig,

    #[serde(default)]
    pub run_coverage: CoverageConfig,

    #[serde(default)]
    pub run_ipynb: NotebookConfig,

    #[serde(default)]
    pub run_run_unittests: UnittestsConfig,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_vault_file() -> PathBuf {
    PathBuf::from("act.vault")
}

fn default_suffixes() -> Vec<String> {
    vec![".py".to_string()]
}

fn default_python() -> String {
    "python".to_string()
}

/// Configuration for `assert-version-advance`
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct VersionGateConfig {
    /// Root of the hosting REST API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// File holding the `GIT_API_OAUTH=<token>` line, relative to the project root
    #[serde(default = "default_vault_file")]
    pub vault_file: PathBuf,

    /// Prefix stripped from tag names before parsing them as versions
    #[serde(default)]
    pub tag_prefix: String,

    /// Suffixes of remote files scanned for version declarations
    #[serde(default = "default_suffixes")]
    pub suffixes: Vec<String>,
}

impl Default for VersionGateConfig {
    fn default() -> Self {
        VersionGateConfig {
            api_url: default_api_url(),
            vault_file: default_vault_file(),
            tag_prefix: String::new(),
            suffixes: default_suffixes(),
        }
    }
}

fn default_max_line_length() -> u32 {
    79
}

/// `verbose` takes a level or a flag, `true` being level 1
fn verbosity<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Verbosity {
        Flag(bool),
        Level(u8),
    }

    Ok(match Verbosity::deserialize(deserializer)? {
        Verbosity::Flag(flag) => u8::from(flag),
        Verbosity::Level(level) => level,
    })
}

fn default_pycodestyle_command() -> Vec<String> {
    vec!["pycodestyle".to_string()]
}

/// Configuration for `run-pycodestyle`
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PycodestyleConfig {
    /// Report lines containing any of these substrings are dropped
    #[serde(default)]
    pub excluded_lines: Vec<String>,

    /// Codes (e.g. `E501`) that are dropped
    #[serde(default)]
    pub excluded_errors: Vec<String>,

    #[serde(default = "default_max_line_length")]
    pub max_line_length: u32,

    #[serde(default, deserialize_with = "verbosity")]
    pub verbose: u8,

    /// Program and leading arguments used to invoke pycodestyle
    #[serde(default = "default_pycodestyle_command")]
    pub command: Vec<String>,
}

impl Default for PycodestyleConfig {
    fn default() -> Self {
        PycodestyleConfig {
            excluded_lines: Vec::new(),
            excluded_errors: Vec::new(),
            max_line_length: default_max_line_length(),
            verbose: 0,
            command: default_pycodestyle_command(),
        }
    }
}

fn default_threshold() -> f64 {
    100.0
}

/// Configuration for `run-coverage`
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CoverageConfig {
    /// Minimum total coverage, in percent
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Test entry point run under coverage
    #[serde(default)]
    pub file: Option<PathBuf>,

    #[serde(default, deserialize_with = "verbosity")]
    pub verbose: u8,

    #[serde(default = "default_python")]
    pub python: String,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        CoverageConfig {
            threshold: default_threshold(),
            file: None,
            verbose: 0,
            python: default_python(),
        }
    }
}

fn default_nbconvert_command() -> Vec<String> {
    ["jupyter", "nbconvert", "--to", "notebook", "--execute", "--inplace"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Configuration for `run-ipynb`
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct NotebookConfig {
    /// Program and leading arguments; the notebook path is appended
    #[serde(default = "default_nbconvert_command")]
    pub command: Vec<String>,
}

impl Default for NotebookConfig {
    fn default() -> Self {
        NotebookConfig {
            command: default_nbconvert_command(),
        }
    }
}

fn default_unittests_script() -> PathBuf {
    PathBuf::from("tests/run_unittests.py")
}

/// Configuration for `run-run-unittests`
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct UnittestsConfig {
    #[serde(default = "default_python")]
    pub python: String,

    #[serde(default = "default_unittests_script")]
    pub script: PathBuf,
}

impl Default for UnittestsConfig {
    fn default() -> Self {
        UnittestsConfig {
            python: default_python(),
            script: default_unittests_script(),
        }
    }
}

/// Parses a configuration file.
///
/// # Arguments
/// * `path` - TOML file with `[tool.<hook_name>]` tables
///
/// # Returns
/// * `Ok(Config)` - Parsed configuration with `source` set to `path`
/// * `Err` - If the file cannot be read or is not valid TOML
pub fn read_config(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| {
        HookError::config(format!("Cannot read {}: {}", path.display(), e))
    })?;
    let mut config: Config = toml::from_str(&content)?;
    config.source = Some(path.to_path_buf());
    Ok(config)
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `pyproject.toml` in current directory
/// 3. `pre-commit-hooks.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    if let Some(path) = config_path {
        return read_config(Path::new(path));
    }

    let project_file = Path::new(".").join(PROJECT_FILE);
    if project_file.is_file() {
        return read_config(&project_file);
    }

    if let Some(config_dir) = dirs::config_dir() {
        let user_file = config_dir.join(USER_CONFIG_FILE);
        if user_file.is_file() {
            return read_config(&user_file);
        }
    }

    tracing::debug!("no configuration file found, using defaults");
    Ok(Config::default())
}

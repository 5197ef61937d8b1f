//! Hooks wrapping external tools
//!
//! Each hook returns the process exit code it wants to report:
//! - `run-pycodestyle`: lint, fail on errors
//! - `clear-ipynb-cells` / `run-ipynb`: clear or execute notebooks
//! - `run-run-unittests`: run the project's test script
//! - `run-coverage`: run tests under coverage with a threshold
//! - `test-hook`: print the arguments

pub mod coverage;
pub mod executor;
pub mod notebooks;
pub mod pycodestyle;
pub mod unittests;

pub use executor::{ToolCommand, ToolOutput};

/// The installable hooks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    AssertVersionAdvance,
    RunPycodestyle,
    ClearIpynbCells,
    RunIpynb,
    RunRunUnittests,
    RunCoverage,
    TestHook,
}

impl HookKind {
    pub const ALL: [HookKind; 7] = [
        HookKind::AssertVersionAdvance,
        HookKind::RunPycodestyle,
        HookKind::ClearIpynbCells,
        HookKind::RunIpynb,
        HookKind::RunRunUnittests,
        HookKind::RunCoverage,
        HookKind::TestHook,
    ];

    /// Executable name, also the pre-commit hook id
    pub fn name(&self) -> &'static str {
        match self {
            HookKind::AssertVersionAdvance => "assert-version-advance",
            HookKind::RunPycodestyle => "run-pycodestyle",
            HookKind::ClearIpynbCells => "clear-ipynb-cells",
            HookKind::RunIpynb => "run-ipynb",
            HookKind::RunRunUnittests => "run-run-unittests",
            HookKind::RunCoverage => "run-coverage",
            HookKind::TestHook => "test-hook",
        }
    }

    pub fn about(&self) -> &'static str {
        match self {
            HookKind::AssertVersionAdvance => {
                "Refuse to push a version that is not ahead of local tags and the remote"
            }
            HookKind::RunPycodestyle => "Run pycodestyle, failing on errors and tolerating warnings",
            HookKind::ClearIpynbCells => "Clear outputs and execution counts of notebooks",
            HookKind::RunIpynb => "Execute notebooks in place with jupyter nbconvert",
            HookKind::RunRunUnittests => "Run tests/run_unittests.py",
            HookKind::RunCoverage => "Run the tests under coverage and enforce a threshold",
            HookKind::TestHook => "Print the received arguments and exit 0",
        }
    }
}

impl std::fmt::Display for HookKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

//! Pre-commit hooks for Python projects, with a version-advance gate that
//! refuses to push a version older than what was already tagged or published.

pub mod boundary;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod gate;
pub mod git;
pub mod hooks;
pub mod logging;
pub mod remote;
pub mod ui;

pub use error::{HookError, Result};

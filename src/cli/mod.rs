//! Command-line layer shared by the hook binaries

pub mod args;
pub mod orchestration;

pub use args::{CommonArgs, HookArgs, VersionGateArgs};

use crate::ui;
use std::process::ExitCode;

/// Convert a hook exit code to a process exit code.
///
/// Codes outside `0..=255` report as 1.
pub fn exit_code(code: i32) -> ExitCode {
    match u8::try_from(code) {
        Ok(code) => ExitCode::from(code),
        Err(_) => ExitCode::FAILURE,
    }
}

/// Report the outcome of a workflow; errors print in red and exit 1
pub fn finish(result: anyhow::Result<i32>) -> ExitCode {
    match result {
        Ok(code) => exit_code(code),
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

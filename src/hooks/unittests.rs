use crate::config::UnittestsConfig;
use crate::error::{HookError, Result};
use crate::hooks::executor::ToolCommand;
use std::path::Path;

/// Run the project's unit test script and return its exit code.
///
/// # Arguments
/// * `config` - Interpreter and script path, relative to `workdir`
/// * `workdir` - Project root
///
/// # Returns
/// * `Ok(code)` - Exit code of the test script
/// * `Err` - If the script is missing or the interpreter can't be started
pub fn run_unittests(config: &UnittestsConfig, workdir: &Path) -> Result<i32> {
    if !workdir.join(&config.script).is_file() {
        return Err(HookError::config(format!(
            "Test script {} does not exist",
            config.script.display()
        )));
    }

    let argv: Vec<String> = config.python.split_whitespace().map(str::to_string).collect();
    ToolCommand::from_argv(&argv)?
        .arg(config.script.to_string_lossy())
        .status(Some(workdir))
}

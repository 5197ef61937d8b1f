use crate::error::{HookError, Result};
use std::path::Path;
use std::process::Command;

/// Captured result of an external tool run
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// An external program plus its arguments
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCommand {
    program: String,
    args: Vec<String>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        ToolCommand {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Build from a configured argv, e.g. `["jupyter", "nbconvert", ...]`
    ///
    /// # Returns
    /// * `Err` - If `argv` is empty
    pub fn from_argv(argv: &[String]) -> Result<Self> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| HookError::config("Tool command must not be empty"))?;
        Ok(ToolCommand::new(program.clone()).args(args.iter().cloned()))
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    fn command(&self, workdir: Option<&Path>) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = workdir {
            cmd.current_dir(dir);
        }
        cmd
    }

    fn spawn_error(&self, e: std::io::Error) -> HookError {
        HookError::tool(format!("Failed to execute {}: {}", self, e))
    }

    /// Run with inherited stdio and return the exit code
    ///
    /// A process killed by a signal reports exit code 1.
    ///
    /// # Arguments
    /// * `workdir` - Directory to run in, the current one when `None`
    ///
    /// # Returns
    /// * `Ok(code)` - The program ran, successfully or not
    /// * `Err` - If the program could not be started
    pub fn status(&self, workdir: Option<&Path>) -> Result<i32> {
        tracing::debug!(command = %self, "running");
        let status = self
            .command(workdir)
            .status()
            .map_err(|e| self.spawn_error(e))?;
        Ok(status.code().unwrap_or(1))
    }

    /// Run and capture stdout and stderr
    pub fn output(&self, workdir: Option<&Path>) -> Result<ToolOutput> {
        tracing::debug!(command = %self, "running with captured output");
        let output = self
            .command(workdir)
            .output()
            .map_err(|e| self.spawn_error(e))?;

        Ok(ToolOutput {
            code: output.status.code().unwrap_or(1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

impl std::fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

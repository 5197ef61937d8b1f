//! Run the project's test entry point under coverage and enforce a threshold.

use crate::config::CoverageConfig;
use crate::error::{HookError, Result};
use crate::hooks::executor::ToolCommand;
use crate::ui;
use std::path::Path;

/// Total percentage of a `coverage report` table.
///
/// Reads the last column of the `TOTAL` row. Reports of a single file have
/// no such row; the last row ending in `%` is used instead.
pub fn parse_total_percentage(report: &str) -> Option<f64> {
    let rows: Vec<&str> = report
        .lines()
        .map(str::trim)
        .filter(|line| line.ends_with('%'))
        .collect();

    let row = rows
        .iter()
        .find(|line| line.starts_with("TOTAL"))
        .or_else(|| rows.last())?;

    row.split_whitespace()
        .last()?
        .trim_end_matches('%')
        .parse()
        .ok()
}

/// `python` may hold a launcher with arguments, e.g. `poetry run python`
fn coverage_command(config: &CoverageConfig) -> Result<ToolCommand> {
    let argv: Vec<String> = config.python.split_whitespace().map(str::to_string).collect();
    Ok(ToolCommand::from_argv(&argv)?.args(["-m", "coverage"]))
}

/// Run coverage with `config` in `workdir`.
///
/// # Returns
/// * `Ok(0)` - The tests passed and coverage reached the threshold
/// * `Ok(1)` - The tests failed or coverage is below the threshold
/// * `Err` - If no test file is configured, or the tool output can't be read
pub fn run_coverage(config: &CoverageConfig, source: &str, workdir: &Path, verbose: u8) -> Result<i32> {
    let verbose = verbose.max(config.verbose);
    if verbose > 2 {
        ui::display_settings(
            source,
            &[
                ("file", format!("{:?}", config.file)),
                ("threshold", config.threshold.to_string()),
                ("verbose", verbose.to_string()),
                ("python", config.python.clone()),
            ],
        );
    }

    let file = config.file.as_ref().ok_or_else(|| {
        HookError::config("[tool.run_coverage] needs a 'file' naming the test entry point")
    })?;
    if !workdir.join(file).is_file() {
        return Err(HookError::config(format!(
            "Coverage test file {} does not exist",
            file.display()
        )));
    }

    let code = coverage_command(config)?
        .arg("run")
        .arg(file.to_string_lossy())
        .status(Some(workdir))?;
    if code != 0 {
        ui::display_error(&format!("Tests in {} failed with exit code {}", file.display(), code));
        return Ok(1);
    }

    let report = coverage_command(config)?.arg("report").output(Some(workdir))?;
    if !report.success() {
        return Err(HookError::tool(format!(
            "coverage report failed: {}",
            report.stderr.trim()
        )));
    }
    print!("{}", report.stdout);

    let percentage = parse_total_percentage(&report.stdout).ok_or_else(|| {
        HookError::tool("Cannot find the total percentage in the coverage report")
    })?;

    if percentage >= config.threshold {
        ui::display_success(&format!(
            "Coverage {}% meets the threshold of {}%",
            percentage, config.threshold
        ));
        Ok(0)
    } else {
        ui::display_error(&format!(
            "Coverage {}% is below the threshold of {}%",
            percentage, config.threshold
        ));
        Ok(1)
    }
}

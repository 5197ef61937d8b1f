//! Lint Python files with pycodestyle; errors fail the hook, warnings don't.

use crate::config::PycodestyleConfig;
use crate::error::{HookError, Result};
use crate::hooks::executor::ToolCommand;
use crate::ui;

/// Report lines of one file, split by severity
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleReport {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

/// Classify pycodestyle report lines (`path:row:col: CODE message`).
///
/// A line is dropped when its code is in `excluded_errors` or when it
/// contains any of `excluded_lines`. Drops are reported when `verbose > 1`.
///
/// # Returns
/// * `Err` - If a line's code starts with neither `E` nor `W`
pub fn sort_warnings_and_errors<'a, I>(
    lines: I,
    excluded_lines: &[String],
    excluded_errors: &[String],
    verbose: u8,
) -> Result<StyleReport>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut report = StyleReport::default();

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let code = line.split_whitespace().nth(1).ok_or_else(|| {
            HookError::tool(format!("Cannot decide type ('E' or 'W') of line {}", line))
        })?;

        if excluded_errors.iter().any(|excluded| excluded == code) {
            if verbose > 1 {
                ui::display_status(&format!(
                    "Line {} was excluded, because error was filtered.",
                    line
                ));
            }
            continue;
        }

        if excluded_lines.iter().any(|fragment| line.contains(fragment.as_str())) {
            if verbose > 1 {
                ui::display_status(&format!("Line {} was filtered.", line));
            }
            continue;
        }

        if code.starts_with('E') {
            report.errors.push(line.to_string());
        } else if code.starts_with('W') {
            report.warnings.push(line.to_string());
        } else {
            return Err(HookError::tool(format!(
                "Cannot decide type ('E' or 'W') of line {}",
                line
            )));
        }
    }

    Ok(report)
}

/// Lint one file and classify the result
pub fn check_file(file: &str, config: &PycodestyleConfig, verbose: u8) -> Result<StyleReport> {
    let output = ToolCommand::from_argv(&config.command)?
        .arg(format!("--max-line-length={}", config.max_line_length))
        .arg(file)
        .output(None)?;

    // pycodestyle exits 1 when it reports anything; other failures print nothing to stdout
    if !output.success() && output.stdout.trim().is_empty() {
        return Err(HookError::tool(format!(
            "pycodestyle failed on {} with exit code {}: {}",
            file,
            output.code,
            output.stderr.trim()
        )));
    }

    sort_warnings_and_errors(
        output.stdout.lines(),
        &config.excluded_lines,
        &config.excluded_errors,
        verbose,
    )
}

/// Run pycodestyle over `filenames`.
///
/// # Returns
/// * `Ok(0)` - No errors remain after filtering
/// * `Ok(1)` - At least one error remains
pub fn run_pycodestyle(filenames: &[String], config: &PycodestyleConfig, verbose: u8) -> Result<i32> {
    let verbose = verbose.max(config.verbose);
    let mut total_errors = 0;
    let mut total_warnings = 0;

    for file in filenames {
        let report = check_file(file, config, verbose)?;
        println!("{} total warnings in {}", report.warnings.len(), file);
        total_warnings += report.warnings.len();

        if !report.errors.is_empty() {
            for line in &report.errors {
                println!("{}", line);
            }
            total_errors += report.errors.len();
        }
    }

    if total_errors > 0 {
        ui::display_error(&format!(
            "pycodestyle found a total of {} errors in the paths {:?}.",
            total_errors, filenames
        ));
        Ok(1)
    } else {
        ui::display_success(&format!(
            "pycodestyle found no errors and {} warnings.",
            total_warnings
        ));
        Ok(0)
    }
}

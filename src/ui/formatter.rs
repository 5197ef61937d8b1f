//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from the
//! hooks themselves. Functions here only print; the `format_*` helpers are
//! pure and testable.

use crate::boundary::BoundaryWarning;
use crate::domain::SemanticVersion;
use crate::gate::{GateOutcome, GateReport, PassReason};
use console::style;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
///
/// Shows a yellow warning icon followed by the warning message.
///
/// # Arguments
/// * `warning` - The boundary warning to display
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Render an optional maximum, `none` when the input set was empty
pub fn format_optional_version(version: Option<&SemanticVersion>) -> String {
    version.map_or_else(|| "none".to_string(), ToString::to_string)
}

/// One line per compared version, aligned on the value column
pub fn format_gate_summary(report: &GateReport) -> Vec<String> {
    vec![
        format!("  Local version:      {}", report.local_version),
        format!(
            "  Max local tag:      {}",
            format_optional_version(report.max_local_tag.as_ref())
        ),
        format!(
            "  Max remote version: {}",
            format_optional_version(report.max_remote_version.as_ref())
        ),
        format!(
            "  Max remote tag:     {}",
            format_optional_version(report.max_remote_tag.as_ref())
        ),
        format!("  Remote commits:     {}", report.remote_commits),
    ]
}

/// Display the versions the gate compared and its verdict.
///
/// Warnings go to stderr first; a violation is printed as an error.
///
/// # Arguments
/// * `report` - Result of [crate::gate::VersionGate::evaluate]
pub fn display_gate_report(report: &GateReport) {
    for warning in &report.warnings {
        display_boundary_warning(warning);
    }

    println!("\n{}", style("Version check").bold());
    for line in format_gate_summary(report) {
        println!("{}", line);
    }

    match &report.outcome {
        GateOutcome::Pass(PassReason::Aligned) => {
            display_success("Local version, tags and remote are aligned")
        }
        GateOutcome::Pass(PassReason::Advanced) => display_success(&format!(
            "Version {} may be pushed",
            report.local_version
        )),
        GateOutcome::Fail(violation) => display_error(&violation.to_string()),
    }
}

/// Display effective settings and where they came from.
///
/// # Arguments
/// * `source` - Description of the configuration origin
/// * `settings` - Name/value pairs in display order
pub fn display_settings(source: &str, settings: &[(&str, String)]) {
    println!("{} {}", style("Settings from").bold(), source);
    for (name, value) in settings {
        println!("  {} = {}", style(name).cyan(), value);
    }
}

//! User interface module.
//!
//! Hooks run non-interactively under a pre-commit driver, so this module
//! only re-exports the display functions of [formatter].

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_boundary_warning, display_error, display_gate_report, display_settings,
    display_status, display_success,
};

//! Jupyter notebook hooks: clearing outputs natively, executing via nbconvert.

use crate::boundary::BoundaryWarning;
use crate::config::NotebookConfig;
use crate::error::{HookError, Result};
use crate::hooks::executor::ToolCommand;
use crate::ui;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Serializer, Value};
use std::fs;
use std::path::Path;

const NOTEBOOK_SUFFIX: &str = ".ipynb";

pub fn is_notebook(path: &str) -> bool {
    path.ends_with(NOTEBOOK_SUFFIX)
}

fn cells_mut(notebook: &mut Value) -> Result<&mut Vec<Value>> {
    notebook
        .get_mut("cells")
        .and_then(Value::as_array_mut)
        .ok_or_else(|| HookError::notebook("notebook has no 'cells' list"))
}

/// Reset outputs and execution counts of every code cell.
///
/// Markdown and raw cells are left untouched.
///
/// # Returns
/// * `Ok(true)` - If anything changed
pub fn clear_cells(notebook: &mut Value) -> Result<bool> {
    let mut changed = false;

    for cell in cells_mut(notebook)? {
        let Some(fields) = cell.as_object_mut() else {
            return Err(HookError::notebook("cell is not an object"));
        };
        if fields.get("cell_type").and_then(Value::as_str) != Some("code") {
            continue;
        }

        let empty_outputs = Value::Array(Vec::new());
        if fields.get("outputs") != Some(&empty_outputs) {
            fields.insert("outputs".to_string(), empty_outputs);
            changed = true;
        }
        if fields.get("execution_count") != Some(&Value::Null) {
            fields.insert("execution_count".to_string(), Value::Null);
            changed = true;
        }
    }

    Ok(changed)
}

pub fn read_notebook(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| {
        HookError::notebook(format!("{} is not valid JSON: {}", path.display(), e))
    })
}

/// Serialize the way nbformat writes notebooks: sorted keys, one-space
/// indent, trailing newline
pub fn to_nbformat_string(notebook: &Value) -> Result<String> {
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b" "));
    notebook.serialize(&mut serializer)?;
    buffer.push(b'\n');

    String::from_utf8(buffer).map_err(|e| HookError::notebook(e.to_string()))
}

/// Clear one notebook file in place, writing only when it changed
pub fn clear_notebook(path: &Path) -> Result<bool> {
    let mut notebook = read_notebook(path)?;
    let changed = clear_cells(&mut notebook)?;
    if changed {
        fs::write(path, to_nbformat_string(&notebook)?)?;
    }
    Ok(changed)
}

/// Clear outputs of every notebook in `filenames`.
///
/// # Returns
/// * `Ok(1)` - If any notebook was rewritten
/// * `Ok(0)` - If all notebooks were already clean
pub fn clear_notebooks(filenames: &[String]) -> Result<i32> {
    let mut modified = 0;

    for filename in filenames {
        if !is_notebook(filename) {
            ui::display_boundary_warning(&BoundaryWarning::SkippedFile {
                path: filename.clone(),
                reason: "not a .ipynb file".to_string(),
            });
            continue;
        }

        if clear_notebook(Path::new(filename))? {
            ui::display_status(&format!("Cleared cells of {}", filename));
            modified += 1;
        } else {
            tracing::debug!(notebook = %filename, "already clean");
        }
    }

    Ok(if modified > 0 { 1 } else { 0 })
}

/// Execute every notebook in `filenames` in place.
///
/// # Returns
/// * `Ok(1)` - If no argument is a notebook
/// * `Ok(code)` - The first non-zero exit code of the executing tool, else 0
pub fn run_notebooks(filenames: &[String], config: &NotebookConfig) -> Result<i32> {
    if !filenames.iter().any(|f| is_notebook(f)) {
        ui::display_error("No .ipynb files were passed");
        return Ok(1);
    }

    for filename in filenames {
        if !is_notebook(filename) {
            ui::display_boundary_warning(&BoundaryWarning::SkippedFile {
                path: filename.clone(),
                reason: "not a .ipynb file".to_string(),
            });
            continue;
        }

        ui::display_status(&format!("Running notebook {}", filename));
        let code = ToolCommand::from_argv(&config.command)?
            .arg(filename.as_str())
            .status(None)?;
        if code != 0 {
            ui::display_error(&format!("Failed to run notebook at {}.", filename));
            return Ok(code);
        }
    }

    Ok(0)
}

//! Determines the version the working tree is about to publish.
//!
//! The version is read from a manifest field or a literal declaration. No
//! project code is ever executed.

use crate::domain::SemanticVersion;
use crate::error::{HookError, Result};
use crate::gate::declarations;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Where the local version was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVersion {
    pub version: SemanticVersion,
    pub source: PathBuf,
}

/// Resolve the local version of the project rooted at `root`.
///
/// Lookup order:
/// 1. `version_file`, when given
/// 2. `pyproject.toml` (`project.version` or `tool.poetry.version`)
/// 3. `Cargo.toml` (`package.version`)
/// 4. `setup.py`, a literal `version=` argument or a `__version__` in a
///    `.py` file whose path appears quoted in `setup.py`
pub fn resolve(root: &Path, version_file: Option<&Path>) -> Result<LocalVersion> {
    if let Some(file) = version_file {
        let path = if file.is_absolute() {
            file.to_path_buf()
        } else {
            root.join(file)
        };
        return from_file(&path)?
            .map(|version| LocalVersion {
                version,
                source: path.clone(),
            })
            .ok_or_else(|| {
                HookError::version(format!(
                    "Could not determine the local version from {}",
                    path.display()
                ))
            });
    }

    for manifest in ["pyproject.toml", "Cargo.toml"] {
        let path = root.join(manifest);
        if path.is_file() {
            if let Some(version) = from_manifest(&path)? {
                return Ok(LocalVersion {
                    version,
                    source: path,
                });
            }
        }
    }

    let setup = root.join("setup.py");
    if setup.is_file() {
        if let Some(found) = from_setup_script(root, &setup)? {
            return Ok(found);
        }
    }

    Err(HookError::version(
        "Could not determine the local version. Add a version to pyproject.toml, \
         Cargo.toml or setup.py, or pass --version-file.",
    ))
}

fn from_file(path: &Path) -> Result<Option<SemanticVersion>> {
    if path.extension().is_some_and(|ext| ext == "toml") {
        return from_manifest(path);
    }

    let source = fs::read_to_string(path)?;
    Ok(declarations::assignments(&source)
        .into_iter()
        .next()
        .or_else(|| declarations::keyword_argument(&source)))
}

/// Version field of a TOML manifest
fn from_manifest(path: &Path) -> Result<Option<SemanticVersion>> {
    let manifest: toml::Value = toml::from_str(&fs::read_to_string(path)?)?;

    let candidates = [
        manifest.get("project").and_then(|t| t.get("version")),
        manifest
            .get("tool")
            .and_then(|t| t.get("poetry"))
            .and_then(|t| t.get("version")),
        manifest.get("package").and_then(|t| t.get("version")),
    ];

    let found = candidates.into_iter().flatten().find_map(toml::Value::as_str);
    match found {
        Some(text) => SemanticVersion::parse(text).map(Some),
        None => Ok(None),
    }
}

fn quoted_python_path() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"["']([^"'\s]+\.py)["']"#).expect("quoted path pattern is valid")
    })
}

fn from_setup_script(root: &Path, setup: &Path) -> Result<Option<LocalVersion>> {
    let source = fs::read_to_string(setup)?;

    if let Some(version) = declarations::keyword_argument(&source) {
        return Ok(Some(LocalVersion {
            version,
            source: setup.to_path_buf(),
        }));
    }

    for captures in quoted_python_path().captures_iter(&source) {
        let candidate = root.join(&captures[1]);
        if !candidate.is_file() {
            continue;
        }
        let content = fs::read_to_string(&candidate)?;
        if let Some(version) = declarations::assignments(&content).into_iter().next() {
            tracing::debug!(file = %candidate.display(), "version read from file referenced by setup.py");
            return Ok(Some(LocalVersion {
                version,
                source: candidate,
            }));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, rel: &str, content: &str) {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_pyproject_project_version() {
        let dir = TempDir::new().unwrap();
        write(&dir, "pyproject.toml", "[project]\nname = \"pkg\"\nversion = \"1.4.0\"\n");

        let found = resolve(dir.path(), None).unwrap();
        assert_eq!(found.version, SemanticVersion::new(1, 4, 0));
        assert!(found.source.ends_with("pyproject.toml"));
    }

    #[test]
    fn test_poetry_version() {
        let dir = TempDir::new().unwrap();
        write(&dir, "pyproject.toml", "[tool.poetry]\nversion = \"0.3.0\"\n");

        assert_eq!(
            resolve(dir.path(), None).unwrap().version,
            SemanticVersion::new(0, 3, 0)
        );
    }

    #[test]
    fn test_cargo_manifest() {
        let dir = TempDir::new().unwrap();
        write(&dir, "Cargo.toml", "[package]\nname = \"x\"\nversion = \"2.1.0\"\n");

        assert_eq!(
            resolve(dir.path(), None).unwrap().version,
            SemanticVersion::new(2, 1, 0)
        );
    }

    #[test]
    fn test_pyproject_without_version_falls_through_to_setup() {
        let dir = TempDir::new().unwrap();
        write(&dir, "pyproject.toml", "[tool.run_pycodestyle]\nmax_line_length = 90\n");
        write(&dir, "setup.py", "from setuptools import setup\nsetup(name='x', version='0.9.0')\n");

        let found = resolve(dir.path(), None).unwrap();
        assert_eq!(found.version, SemanticVersion::new(0, 9, 0));
        assert!(found.source.ends_with("setup.py"));
    }

    #[test]
    fn test_setup_py_exec_idiom() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "setup.py",
            "exec(Path('pkg/_version.py').read_text())\nsetup(name='pkg', version=__version__)\n",
        );
        write(&dir, "pkg/_version.py", "__version__ = \"0.0.5\"\n");

        let found = resolve(dir.path(), None).unwrap();
        assert_eq!(found.version, SemanticVersion::new(0, 0, 5));
        assert!(found.source.ends_with("pkg/_version.py"));
    }

    #[test]
    fn test_explicit_version_file() {
        let dir = TempDir::new().unwrap();
        write(&dir, "pyproject.toml", "[project]\nversion = \"1.0.0\"\n");
        write(&dir, "src/about.py", "version = '3.0.0'\n");

        let found = resolve(dir.path(), Some(Path::new("src/about.py"))).unwrap();
        assert_eq!(found.version, SemanticVersion::new(3, 0, 0));
    }

    #[test]
    fn test_explicit_version_file_without_version() {
        let dir = TempDir::new().unwrap();
        write(&dir, "empty.py", "print('hi')\n");

        let err = resolve(dir.path(), Some(Path::new("empty.py"))).unwrap_err();
        assert!(err.to_string().contains("Could not determine the local version"));
    }

    #[test]
    fn test_nothing_found() {
        let dir = TempDir::new().unwrap();
        let err = resolve(dir.path(), None).unwrap_err();
        assert!(matches!(err, HookError::Version(_)));
    }

    #[test]
    fn test_manifest_version_must_be_semver() {
        let dir = TempDir::new().unwrap();
        write(&dir, "pyproject.toml", "[project]\nversion = \"1.0\"\n");

        assert!(resolve(dir.path(), None).is_err());
    }
}

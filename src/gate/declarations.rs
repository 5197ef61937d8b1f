//! Static extraction of version declarations from source text
//!
//! Sources are parsed as Python. Only assignment statements count, with a
//! single `__version__` or `version` name target and a string literal value:
//! `__version__ = "1.2.3"`. Assignments nested in classes, functions and
//! control flow count too. Anything computed, annotated, chained or
//! tuple-assigned yields nothing, as do keyword arguments.

use crate::domain::SemanticVersion;
use regex::Regex;
use rustpython_parser::{ast, Parse};
use std::sync::OnceLock;

fn keyword_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"\bversion[ \t]*=[ \t]*(?:"([^"\\]*)"|'([^'\\]*)')"#)
            .expect("keyword pattern is valid")
    })
}

/// Why a file's declarations could not be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unscannable {
    /// The bytes are not UTF-8
    NotUtf8,
    /// The text does not parse as Python
    Syntax,
}

/// Extracts version declarations from source files
#[derive(Debug, Clone)]
pub struct DeclarationScanner {
    suffixes: Vec<String>,
}

impl DeclarationScanner {
    pub fn new(suffixes: Vec<String>) -> Self {
        DeclarationScanner { suffixes }
    }

    /// File name suffixes worth reading
    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    /// Declarations in raw file content.
    pub fn scan_bytes(&self, content: &[u8]) -> Result<Vec<SemanticVersion>, Unscannable> {
        let text = std::str::from_utf8(content).map_err(|_| Unscannable::NotUtf8)?;
        parse_assignments(text)
    }
}

impl Default for DeclarationScanner {
    fn default() -> Self {
        DeclarationScanner::new(vec![".py".to_string()])
    }
}

/// SemVer values of every `__version__`/`version` assignment in `source`.
///
/// Fails with [Unscannable::Syntax] when `source` is not valid Python.
pub fn parse_assignments(source: &str) -> Result<Vec<SemanticVersion>, Unscannable> {
    let suite = ast::Suite::parse(source, "<source>").map_err(|_| Unscannable::Syntax)?;
    let mut versions = Vec::new();
    collect(&suite, &mut versions);
    Ok(versions)
}

/// Like [parse_assignments], with invalid source yielding nothing
pub fn assignments(source: &str) -> Vec<SemanticVersion> {
    parse_assignments(source).unwrap_or_default()
}

fn collect(body: &[ast::Stmt], versions: &mut Vec<SemanticVersion>) {
    for stmt in body {
        match stmt {
            ast::Stmt::Assign(assign) => versions.extend(declared_version(assign)),
            ast::Stmt::FunctionDef(def) => collect(&def.body, versions),
            ast::Stmt::AsyncFunctionDef(def) => collect(&def.body, versions),
            ast::Stmt::ClassDef(class) => collect(&class.body, versions),
            ast::Stmt::If(branch) => {
                collect(&branch.body, versions);
                collect(&branch.orelse, versions);
            }
            ast::Stmt::For(for_loop) => {
                collect(&for_loop.body, versions);
                collect(&for_loop.orelse, versions);
            }
            ast::Stmt::AsyncFor(for_loop) => {
                collect(&for_loop.body, versions);
                collect(&for_loop.orelse, versions);
            }
            ast::Stmt::While(while_loop) => {
                collect(&while_loop.body, versions);
                collect(&while_loop.orelse, versions);
            }
            ast::Stmt::With(with) => collect(&with.body, versions),
            ast::Stmt::AsyncWith(with) => collect(&with.body, versions),
            ast::Stmt::Try(block) => {
                collect(&block.body, versions);
                for handler in &block.handlers {
                    match handler {
                        ast::ExceptHandler::ExceptHandler(handler) => collect(&handler.body, versions),
                    }
                }
                collect(&block.orelse, versions);
                collect(&block.finalbody, versions);
            }
            ast::Stmt::TryStar(block) => {
                collect(&block.body, versions);
                for handler in &block.handlers {
                    match handler {
                        ast::ExceptHandler::ExceptHandler(handler) => collect(&handler.body, versions),
                    }
                }
                collect(&block.orelse, versions);
                collect(&block.finalbody, versions);
            }
            ast::Stmt::Match(matched) => {
                for case in &matched.cases {
                    collect(&case.body, versions);
                }
            }
            _ => {}
        }
    }
}

fn declared_version(assign: &ast::StmtAssign) -> Option<SemanticVersion> {
    let [ast::Expr::Name(target)] = assign.targets.as_slice() else {
        return None;
    };
    if target.id.as_str() != "__version__" && target.id.as_str() != "version" {
        return None;
    }

    match assign.value.as_ref() {
        ast::Expr::Constant(ast::ExprConstant {
            value: ast::Constant::Str(text),
            ..
        }) => SemanticVersion::try_parse(text),
        _ => None,
    }
}

/// First `version="x.y.z"` keyword argument, as passed to a setup call
pub fn keyword_argument(source: &str) -> Option<SemanticVersion> {
    keyword_pattern()
        .captures_iter(source)
        .find_map(|captures| {
            captures
                .get(1)
                .or_else(|| captures.get(2))
                .and_then(|m| SemanticVersion::try_parse(m.as_str()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(versions: Vec<SemanticVersion>) -> Vec<String> {
        versions.into_iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_simple_assignments() {
        let source = "__version__ = \"1.2.3\"\nversion = '0.4.0'\n";
        assert_eq!(strings(assignments(source)), vec!["1.2.3", "0.4.0"]);
    }

    #[test]
    fn test_nested_and_commented() {
        let source = "class A:\n    version = \"2.0.0-rc.1\"  # pinned\n\nif True:\n    __version__ = '3.0.0'\n";
        assert_eq!(strings(assignments(source)), vec!["2.0.0-rc.1", "3.0.0"]);
    }

    #[test]
    fn test_ignores_other_patterns() {
        let source = r#"
my_version = "1.0.0"
__version__: str = "1.0.0"
__version__ = get_version()
__version__, other = "1.0.0", 2
__version__ = version = "1.0.0"
version = "not-a-version"
version == "1.0.0"
version = 1
"#;
        assert!(assignments(source).is_empty());
    }

    #[test]
    fn test_keyword_argument_on_own_line_is_not_an_assignment() {
        let source = "setup(\n    name=\"pkg\",\n    version=\"1.2.0\"\n)\n";
        assert_eq!(parse_assignments(source), Ok(vec![]));
    }

    #[test]
    fn test_syntax_error_yields_nothing() {
        let source = "def f(:\n__version__ = \"9.0.0\"\n";
        assert_eq!(parse_assignments(source), Err(Unscannable::Syntax));
        assert!(assignments(source).is_empty());
    }

    #[test]
    fn test_skips_docstrings() {
        let source = r#"
"""Example:

    __version__ = "9.9.9"
"""
__version__ = "1.0.0"
'''single line docstring'''
version = "1.1.0"
"#;
        assert_eq!(strings(assignments(source)), vec!["1.0.0", "1.1.0"]);
    }

    #[test]
    fn test_scan_bytes() {
        let scanner = DeclarationScanner::default();
        assert_eq!(scanner.scan_bytes(&[0xff, 0xfe, 0x00]), Err(Unscannable::NotUtf8));
        assert_eq!(scanner.scan_bytes(b"version = (\n"), Err(Unscannable::Syntax));
        assert_eq!(
            scanner.scan_bytes(b"__version__ = '3.1.4'\n"),
            Ok(vec![SemanticVersion::new(3, 1, 4)])
        );
    }

    #[test]
    fn test_keyword_argument() {
        let setup = "setup(name='pkg',\n      version='0.7.1',\n      license='MIT')\n";
        assert_eq!(keyword_argument(setup), Some(SemanticVersion::new(0, 7, 1)));

        let indirect = "setup(name='pkg', version=__version__)\n";
        assert_eq!(keyword_argument(indirect), None);
    }

    #[test]
    fn test_default_suffixes() {
        assert_eq!(DeclarationScanner::default().suffixes(), &[".py".to_string()]);
    }
}

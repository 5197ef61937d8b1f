use crate::error::Result;
use std::fs;
use std::path::Path;

/// Key of the token line in the vault file
pub const TOKEN_KEY: &str = "GIT_API_OAUTH";

/// Read the API token from a vault file.
///
/// The file is optional: a missing file, or one without a
/// `GIT_API_OAUTH=<token>` line, means unauthenticated access.
pub fn read_token(path: &Path) -> Result<Option<String>> {
    if !path.is_file() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)?;
    let token = content.lines().find_map(|line| {
        let (key, value) = line.trim().split_once('=')?;
        if key.trim() != TOKEN_KEY {
            return None;
        }
        let value = value.trim().trim_matches('"');
        (!value.is_empty()).then(|| value.to_string())
    });

    if token.is_none() {
        tracing::debug!(vault = %path.display(), "vault file has no {} entry", TOKEN_KEY);
    }

    Ok(token)
}

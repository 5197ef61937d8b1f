use std::fmt;

fn short_hash(commit: &str) -> &str {
    commit.get(..7).unwrap_or(commit)
}

/// Non-fatal conditions met while a hook runs.
/// These don't change the outcome but should be reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// No SemVer tag is reachable from the local branch
    NoLocalTags { branch: String },
    /// The remote has no SemVer tags
    NoRemoteTags,
    /// A remote source file is not valid UTF-8 and was not scanned
    UndecodableFile { path: String, commit: String },
    /// A remote source file does not parse and was not scanned
    UnparsableFile { path: String, commit: String },
    /// A hook argument was not a file the hook handles
    SkippedFile { path: String, reason: String },
    /// The vault file exists but holds no token
    MissingToken { vault: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoLocalTags { branch } => {
                write!(f, "No version tags found on local branch '{}'", branch)
            }
            BoundaryWarning::NoRemoteTags => write!(f, "No version tags found on the remote"),
            BoundaryWarning::UndecodableFile { path, commit } => {
                write!(f, "Skipping '{}' at {}: not valid UTF-8", path, short_hash(commit))
            }
            BoundaryWarning::UnparsableFile { path, commit } => {
                write!(f, "Skipping '{}' at {}: syntax error", path, short_hash(commit))
            }
            BoundaryWarning::SkippedFile { path, reason } => {
                write!(f, "Skipping '{}': {}", path, reason)
            }
            BoundaryWarning::MissingToken { vault } => {
                write!(
                    f,
                    "Vault file '{}' has no GIT_API_OAUTH entry, using anonymous API access",
                    vault
                )
            }
        }
    }
}

use crate::error::{HookError, Result};
use git2::Oid;
use std::fmt;

/// Identity of a single commit, local or remote.
///
/// Equality is equality of the underlying object hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommitRef(Oid);

impl CommitRef {
    pub fn new(oid: Oid) -> Self {
        CommitRef(oid)
    }

    /// Parse a full hexadecimal SHA
    pub fn from_sha(sha: &str) -> Result<Self> {
        Oid::from_str(sha)
            .map(CommitRef)
            .map_err(|e| HookError::remote(format!("Invalid commit sha '{}': {}", sha, e)))
    }

    pub fn oid(&self) -> Oid {
        self.0
    }

    /// Abbreviated hash for display
    pub fn short(&self) -> String {
        let full = self.0.to_string();
        full[..7.min(full.len())].to_string()
    }
}

impl From<Oid> for CommitRef {
    fn from(oid: Oid) -> Self {
        CommitRef(oid)
    }
}

impl fmt::Display for CommitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

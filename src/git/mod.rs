//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the repository
//! queries the version gate needs, so the gate can run against a real
//! repository or an in-memory one in tests.
//!
//! # Overview
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: An in-memory implementation for testing
//!
//! # Usage
//!
//! ```rust
//! # use pre_commit_hooks::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> pre_commit_hooks::Result<()> {
//! let commits = repo.branch_commits("main")?;
//! for (name, commit) in repo.tags()? {
//!     if commits.contains(&commit) {
//!         println!("{} is on main", name);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::CommitRef;
use crate::error::Result;
use git2::Oid;

/// A file inside a commit tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path relative to the repository root, `/` separated
    pub path: String,
    /// Blob holding the file content
    pub blob: Oid,
}

/// Read-only repository queries used by the version gate
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Lookups that can legitimately
/// miss (a commit, a remote) return `Ok(None)`; everything else maps the
/// underlying `git2::Error` into [crate::error::HookError].
pub trait Repository {
    /// Every commit reachable from the tip of a local branch, newest first
    ///
    /// # Arguments
    /// * `branch_name` - The name of the branch (e.g., "main")
    ///
    /// # Returns
    /// * `Err` - If the branch doesn't exist or the walk fails
    fn branch_commits(&self, branch_name: &str) -> Result<Vec<CommitRef>>;

    /// All tags with the commit they point at
    ///
    /// Annotated tags are peeled to their commit. Tags that do not point at
    /// a commit are left out.
    fn tags(&self) -> Result<Vec<(String, CommitRef)>>;

    /// Look up a commit by its full SHA
    ///
    /// # Returns
    /// * `Ok(Some(commit))` - The commit exists locally
    /// * `Ok(None)` - The object database doesn't contain it
    /// * `Err` - If the SHA is malformed or there's a Git error
    fn resolve_commit(&self, sha: &str) -> Result<Option<CommitRef>>;

    /// Names of all configured remotes
    fn remote_names(&self) -> Result<Vec<String>>;

    /// URL of a remote, `None` if no remote has that name
    fn remote_url(&self, remote_name: &str) -> Result<Option<String>>;

    /// Files in the commit's tree whose name ends with one of `suffixes`
    ///
    /// The tree is walked recursively. An empty `suffixes` slice matches
    /// every file.
    fn source_files(&self, commit: CommitRef, suffixes: &[String]) -> Result<Vec<SourceFile>>;

    /// Raw content of a blob
    fn blob_content(&self, blob: Oid) -> Result<Vec<u8>>;
}

/// Whether `path` ends with one of `suffixes` (everything matches an empty list)
pub(crate) fn matches_suffix(path: &str, suffixes: &[String]) -> bool {
    suffixes.is_empty() || suffixes.iter().any(|suffix| path.ends_with(suffix.as_str()))
}

//! Read-only access to the hosting service of a remote
//!
//! [RemoteApi] is the seam the version gate depends on; [GitHubApi] talks to
//! the GitHub REST API and tests substitute in-memory implementations.

pub mod github;
pub mod vault;

pub use github::GitHubApi;
pub use vault::read_token;

use crate::error::Result;

/// Remote hosting queries needed by the version gate
pub trait RemoteApi {
    /// SHA of the head commit of a remote branch
    ///
    /// # Returns
    /// * `Err` - If the branch doesn't exist remotely or the request fails
    fn branch_head(&self, branch: &str) -> Result<String>;

    /// One page of commit SHAs reachable from `sha`, newest first
    ///
    /// Pages are numbered from 1. A page shorter than `per_page` is the last.
    fn commit_page(&self, sha: &str, page: usize, per_page: usize) -> Result<Vec<String>>;

    /// Names of all tags on the remote, without the `refs/tags/` prefix
    fn tag_names(&self) -> Result<Vec<String>>;
}

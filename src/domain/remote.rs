use crate::error::{HookError, Result};
use std::fmt;

/// Owner and repository name of a hosted remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSlug {
    pub owner: String,
    pub repo: String,
}

impl RemoteSlug {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        RemoteSlug {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Extract the slug from a remote URL.
    ///
    /// Supports:
    /// - `git@github.com:owner/repo.git`
    /// - `https://github.com/owner/repo(.git)`
    /// - `ssh://git@github.com:22/owner/repo.git`
    pub fn from_url(url: &str) -> Result<Self> {
        let trimmed = url.trim().trim_end_matches('/');
        let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);

        let path = match trimmed.split_once("://") {
            // scheme://[user@]host[:port]/owner/repo
            Some((_, rest)) => rest.split_once('/').map(|(_, path)| path),
            // [user@]host:owner/repo
            None => trimmed.split_once(':').map(|(_, path)| path),
        }
        .ok_or_else(|| HookError::remote(format!("Cannot parse remote url '{}'", url)))?;

        let mut segments = path.rsplit('/').filter(|s| !s.is_empty());
        match (segments.next(), segments.next()) {
            (Some(repo), Some(owner)) => Ok(RemoteSlug::new(owner, repo)),
            _ => Err(HookError::remote(format!(
                "Remote url '{}' does not name an owner and repository",
                url
            ))),
        }
    }

    /// API path prefix, e.g. `repos/owner/repo`
    pub fn api_path(&self) -> String {
        format!("repos/{}/{}", self.owner, self.repo)
    }
}

impl fmt::Display for RemoteSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scp_like_url() {
        let slug = RemoteSlug::from_url("git@github.com:kevinsawade/pre-commit-hooks.git").unwrap();
        assert_eq!(slug, RemoteSlug::new("kevinsawade", "pre-commit-hooks"));
    }

    #[test]
    fn test_https_url() {
        let slug = RemoteSlug::from_url("https://github.com/owner/repo.git").unwrap();
        assert_eq!(slug, RemoteSlug::new("owner", "repo"));

        let slug = RemoteSlug::from_url("https://github.com/owner/repo/").unwrap();
        assert_eq!(slug, RemoteSlug::new("owner", "repo"));
    }

    #[test]
    fn test_ssh_url_with_port() {
        let slug = RemoteSlug::from_url("ssh://git@github.com:22/owner/repo.git").unwrap();
        assert_eq!(slug, RemoteSlug::new("owner", "repo"));
    }

    #[test]
    fn test_repo_name_ending_in_git_letters() {
        // only the literal ".git" suffix is removed
        let slug = RemoteSlug::from_url("git@github.com:owner/digit").unwrap();
        assert_eq!(slug.repo, "digit");
    }

    #[test]
    fn test_invalid_urls() {
        assert!(RemoteSlug::from_url("not a url").is_err());
        assert!(RemoteSlug::from_url("https://github.com/").is_err());
        assert!(RemoteSlug::from_url("git@github.com:repo-only").is_err());
    }

    #[test]
    fn test_api_path() {
        assert_eq!(RemoteSlug::new("a", "b").api_path(), "repos/a/b");
    }
}

use crate::domain::CommitRef;
use crate::error::{HookError, Result};
use crate::git::{matches_suffix, SourceFile};
use git2::{Oid, Repository as Git2Repo};
use std::path::{Path, PathBuf};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    /// Root of the working tree, `None` for bare repositories
    pub fn workdir(&self) -> Option<PathBuf> {
        self.repo.workdir().map(Path::to_path_buf)
    }
}

impl super::Repository for Git2Repository {
    fn branch_commits(&self, branch_name: &str) -> Result<Vec<CommitRef>> {
        let branch = self
            .repo
            .find_branch(branch_name, git2::BranchType::Local)
            .map_err(|e| {
                HookError::config(format!("Cannot find branch '{}': {}", branch_name, e))
            })?;

        let head = branch.get().target().ok_or_else(|| {
            HookError::config(format!("Branch '{}' has no target", branch_name))
        })?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.push(head)?;

        let mut commits = Vec::new();
        for oid_result in revwalk {
            commits.push(CommitRef::new(oid_result?));
        }

        Ok(commits)
    }

    fn tags(&self) -> Result<Vec<(String, CommitRef)>> {
        let names = self.repo.tag_names(None)?;
        let mut tags = Vec::new();

        for name in names.iter().flatten() {
            let reference = self.repo.find_reference(&format!("refs/tags/{}", name))?;
            match reference.peel_to_commit() {
                Ok(commit) => tags.push((name.to_string(), CommitRef::new(commit.id()))),
                Err(e) => {
                    tracing::debug!(tag = name, error = %e, "tag does not point at a commit");
                }
            }
        }

        Ok(tags)
    }

    fn resolve_commit(&self, sha: &str) -> Result<Option<CommitRef>> {
        let oid = Oid::from_str(sha)?;

        match self.repo.find_commit(oid) {
            Ok(commit) => Ok(Some(CommitRef::new(commit.id()))),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn remote_names(&self) -> Result<Vec<String>> {
        let names = self.repo.remotes()?;

        Ok(names.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn remote_url(&self, remote_name: &str) -> Result<Option<String>> {
        match self.repo.find_remote(remote_name) {
            Ok(remote) => Ok(remote.url().map(|url| url.to_string())),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) if e.class() == git2::ErrorClass::Config => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn source_files(&self, commit: CommitRef, suffixes: &[String]) -> Result<Vec<SourceFile>> {
        let tree = self.repo.find_commit(commit.oid())?.tree()?;
        let mut files = Vec::new();

        tree.walk(git2::TreeWalkMode::PreOrder, |root, entry| {
            if entry.kind() == Some(git2::ObjectType::Blob) {
                if let Some(name) = entry.name() {
                    let path = format!("{}{}", root, name);
                    if matches_suffix(&path, suffixes) {
                        files.push(SourceFile {
                            path,
                            blob: entry.id(),
                        });
                    }
                }
            }
            git2::TreeWalkResult::Ok
        })?;

        Ok(files)
    }

    fn blob_content(&self, blob: Oid) -> Result<Vec<u8>> {
        let blob = self.repo.find_blob(blob)?;

        Ok(blob.content().to_vec())
    }
}

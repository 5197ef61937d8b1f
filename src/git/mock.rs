use crate::domain::CommitRef;
use crate::error::{HookError, Result};
use crate::git::{matches_suffix, Repository, SourceFile};
use git2::Oid;
use std::collections::HashMap;

/// Mock repository for testing without actual git operations
///
/// Commits are identified by a small integer seed; [MockRepository::commit_ref]
/// turns the seed into a deterministic hash. Blob ids are derived from
/// content so identical files share a blob, as in a real object database.
pub struct MockRepository {
    branches: HashMap<String, Vec<CommitRef>>,
    tags: Vec<(String, CommitRef)>,
    remotes: Vec<(String, String)>,
    trees: HashMap<CommitRef, Vec<(String, Oid)>>,
    blobs: HashMap<Oid, Vec<u8>>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            branches: HashMap::new(),
            tags: Vec::new(),
            remotes: Vec::new(),
            trees: HashMap::new(),
            blobs: HashMap::new(),
        }
    }

    /// Deterministic commit identity for a seed
    pub fn commit_ref(seed: u32) -> CommitRef {
        let mut bytes = [0u8; 20];
        bytes[..4].copy_from_slice(&seed.to_be_bytes());
        bytes[19] = 0xc0;
        CommitRef::new(Oid::from_bytes(&bytes).expect("20 bytes is a valid oid"))
    }

    /// Add a commit with an empty tree; its seed identifies it afterwards
    pub fn add_commit(&mut self, seed: u32) -> CommitRef {
        let commit = Self::commit_ref(seed);
        self.trees.entry(commit).or_default();
        commit
    }

    /// Add a file to a commit's tree, creating the commit if needed
    pub fn add_file(&mut self, seed: u32, path: impl Into<String>, content: impl Into<Vec<u8>>) {
        let commit = self.add_commit(seed);
        let content = content.into();
        let blob = Oid::hash_object(git2::ObjectType::Blob, &content)
            .expect("hashing in memory cannot fail");
        self.blobs.insert(blob, content);
        self.trees
            .entry(commit)
            .or_default()
            .push((path.into(), blob));
    }

    /// Set the commits reachable from a branch, newest first
    pub fn set_branch(&mut self, branch: impl Into<String>, seeds: &[u32]) {
        let commits = seeds.iter().map(|seed| self.add_commit(*seed)).collect();
        self.branches.insert(branch.into(), commits);
    }

    /// Add a tag pointing to a commit
    pub fn add_tag(&mut self, name: impl Into<String>, seed: u32) {
        let commit = self.add_commit(seed);
        self.tags.push((name.into(), commit));
    }

    /// Add a remote
    pub fn add_remote(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.remotes.push((name.into(), url.into()));
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn branch_commits(&self, branch_name: &str) -> Result<Vec<CommitRef>> {
        self.branches
            .get(branch_name)
            .cloned()
            .ok_or_else(|| HookError::config(format!("Cannot find branch '{}'", branch_name)))
    }

    fn tags(&self) -> Result<Vec<(String, CommitRef)>> {
        Ok(self.tags.clone())
    }

    fn resolve_commit(&self, sha: &str) -> Result<Option<CommitRef>> {
        let commit = CommitRef::from_sha(sha)?;
        Ok(self.trees.contains_key(&commit).then_some(commit))
    }

    fn remote_names(&self) -> Result<Vec<String>> {
        Ok(self.remotes.iter().map(|(name, _)| name.clone()).collect())
    }

    fn remote_url(&self, remote_name: &str) -> Result<Option<String>> {
        Ok(self
            .remotes
            .iter()
            .find(|(name, _)| name == remote_name)
            .map(|(_, url)| url.clone()))
    }

    fn source_files(&self, commit: CommitRef, suffixes: &[String]) -> Result<Vec<SourceFile>> {
        let tree = self
            .trees
            .get(&commit)
            .ok_or_else(|| HookError::config(format!("Unknown commit {}", commit)))?;

        Ok(tree
            .iter()
            .filter(|(path, _)| matches_suffix(path, suffixes))
            .map(|(path, blob)| SourceFile {
                path: path.clone(),
                blob: *blob,
            })
            .collect())
    }

    fn blob_content(&self, blob: Oid) -> Result<Vec<u8>> {
        self.blobs
            .get(&blob)
            .cloned()
            .ok_or_else(|| HookError::config(format!("Unknown blob {}", blob)))
    }
}

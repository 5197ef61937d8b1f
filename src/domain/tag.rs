use crate::domain::{CommitRef, SemanticVersion};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Represents a git tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
}

impl Tag {
    /// Create a new tag from a string
    pub fn new(name: impl Into<String>) -> Self {
        Tag { name: name.into() }
    }

    /// Interpret the tag as a semantic version once `prefix` is removed.
    ///
    /// With an empty prefix the whole name must be SemVer, so "v1.2.3" only
    /// counts when the prefix is "v".
    pub fn semver(&self, prefix: &str) -> Option<SemanticVersion> {
        let version_part = self.name.strip_prefix(prefix)?;
        SemanticVersion::try_parse(version_part)
    }
}

/// Tags grouped by the commit they point at
#[derive(Debug, Clone, Default)]
pub struct TagMap {
    by_commit: HashMap<CommitRef, BTreeSet<String>>,
}

impl TagMap {
    /// Build the map, keeping only tags whose commit is in `reachable`
    pub fn build<I>(tags: I, reachable: &HashSet<CommitRef>) -> Self
    where
        I: IntoIterator<Item = (String, CommitRef)>,
    {
        let mut by_commit: HashMap<CommitRef, BTreeSet<String>> = HashMap::new();
        for (name, commit) in tags {
            if reachable.contains(&commit) {
                by_commit.entry(commit).or_default().insert(name);
            }
        }
        TagMap { by_commit }
    }

    pub fn len(&self) -> usize {
        self.by_commit.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_commit.is_empty()
    }

    /// Distinct semantic versions among the tag names
    pub fn semvers(&self, prefix: &str) -> BTreeSet<SemanticVersion> {
        self.by_commit
            .values()
            .flatten()
            .filter_map(|name| Tag::new(name.as_str()).semver(prefix))
            .collect()
    }
}

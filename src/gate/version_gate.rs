use crate::boundary::BoundaryWarning;
use crate::domain::{CommitRef, SemanticVersion, Tag, TagMap};
use crate::error::{HookError, Result};
use crate::gate::{DeclarationScanner, Unscannable};
use crate::git::Repository;
use crate::remote::RemoteApi;
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// Commits requested per page of remote history
pub const COMMITS_PER_PAGE: usize = 100;

/// Pages of remote history read before giving up
pub const MAX_COMMIT_PAGES: usize = 100;

/// Why a push may not proceed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// A local tag on the branch is newer than the working version
    BehindLocalTag {
        local_version: SemanticVersion,
        max_local_tag: SemanticVersion,
    },
    /// The remote already published a newer version
    BehindRemote {
        local_version: SemanticVersion,
        max_remote_version: SemanticVersion,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::BehindLocalTag {
                local_version,
                max_local_tag,
            } => write!(
                f,
                "The current local version of the software {} does not match the highest \
                 version in the local tags ({}). Either create this tag before pushing or \
                 advance the version.",
                local_version, max_local_tag
            ),
            Violation::BehindRemote {
                local_version,
                max_remote_version,
            } => write!(
                f,
                "The maximum remote version is {}. You are trying to push a smaller version \
                 ({}). This operation is forbidden.",
                max_remote_version, local_version
            ),
        }
    }
}

/// Why a push may proceed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassReason {
    /// Local version, local tags, remote tags and remote sources all agree
    Aligned,
    /// Local version is at least as new as everything published
    Advanced,
}

/// Result of the gate decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    Pass(PassReason),
    Fail(Violation),
}

impl GateOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, GateOutcome::Pass(_))
    }
}

/// Everything the decision was based on
#[derive(Debug, Clone)]
pub struct GateReport {
    pub local_version: SemanticVersion,
    pub max_local_tag: Option<SemanticVersion>,
    pub max_remote_version: Option<SemanticVersion>,
    pub max_remote_tag: Option<SemanticVersion>,
    pub remote_commits: usize,
    pub warnings: Vec<BoundaryWarning>,
    pub outcome: GateOutcome,
}

/// Apply the decision rules, in order:
///
/// 1. local version below the newest local tag: fail
/// 2. all four versions equal: pass
/// 3. local version below the newest remote version: fail
/// 4. otherwise: pass
///
/// A missing maximum (no tags, no declarations) never fails a rule and
/// never counts as equal.
pub fn decide(
    local_version: &SemanticVersion,
    max_local_tag: Option<&SemanticVersion>,
    max_remote_version: Option<&SemanticVersion>,
    max_remote_tag: Option<&SemanticVersion>,
) -> GateOutcome {
    if let Some(tag) = max_local_tag {
        if local_version < tag {
            return GateOutcome::Fail(Violation::BehindLocalTag {
                local_version: local_version.clone(),
                max_local_tag: tag.clone(),
            });
        }
    }

    let aligned = [max_remote_version, max_remote_tag, max_local_tag]
        .iter()
        .all(|candidate| *candidate == Some(local_version));
    if aligned {
        return GateOutcome::Pass(PassReason::Aligned);
    }

    if let Some(remote) = max_remote_version {
        if local_version < remote {
            return GateOutcome::Fail(Violation::BehindRemote {
                local_version: local_version.clone(),
                max_remote_version: remote.clone(),
            });
        }
    }

    GateOutcome::Pass(PassReason::Advanced)
}

/// Settings of one gate run
#[derive(Debug, Clone)]
pub struct GateOptions {
    /// Branch whose local and remote history is compared
    pub branch: String,
    /// Prefix stripped from tag names before SemVer parsing
    pub tag_prefix: String,
}

impl Default for GateOptions {
    fn default() -> Self {
        GateOptions {
            branch: "main".to_string(),
            tag_prefix: String::new(),
        }
    }
}

/// Compares the local version with local and remote history
pub struct VersionGate<'a, R: Repository, A: RemoteApi> {
    repo: &'a R,
    api: &'a A,
    scanner: DeclarationScanner,
    options: GateOptions,
}

impl<'a, R: Repository, A: RemoteApi> VersionGate<'a, R, A> {
    pub fn new(repo: &'a R, api: &'a A, scanner: DeclarationScanner, options: GateOptions) -> Self {
        VersionGate {
            repo,
            api,
            scanner,
            options,
        }
    }

    /// Run the full check for `local_version`
    pub fn evaluate(&self, local_version: &SemanticVersion) -> Result<GateReport> {
        let mut warnings = Vec::new();

        let local_tags = self.local_tag_versions()?;
        if local_tags.is_empty() {
            warnings.push(BoundaryWarning::NoLocalTags {
                branch: self.options.branch.clone(),
            });
        }

        let remote_commits = self.remote_commits()?;
        tracing::info!(count = remote_commits.len(), "resolved remote history");

        let remote_tags = self.remote_tag_versions()?;
        if remote_tags.is_empty() {
            warnings.push(BoundaryWarning::NoRemoteTags);
        }

        let mut remote_versions = self.remote_declarations(&remote_commits, &mut warnings)?;
        remote_versions.extend(remote_tags.iter().cloned());

        let max_local_tag = local_tags.last().cloned();
        let max_remote_tag = remote_tags.last().cloned();
        let max_remote_version = remote_versions.last().cloned();

        tracing::debug!(
            local = %local_version,
            max_local_tag = ?max_local_tag.as_ref().map(ToString::to_string),
            max_remote_version = ?max_remote_version.as_ref().map(ToString::to_string),
            max_remote_tag = ?max_remote_tag.as_ref().map(ToString::to_string),
            "comparing versions"
        );

        let outcome = decide(
            local_version,
            max_local_tag.as_ref(),
            max_remote_version.as_ref(),
            max_remote_tag.as_ref(),
        );

        Ok(GateReport {
            local_version: local_version.clone(),
            max_local_tag,
            max_remote_version,
            max_remote_tag,
            remote_commits: remote_commits.len(),
            warnings,
            outcome,
        })
    }

    /// SemVer tags on commits reachable from the branch
    pub fn local_tag_versions(&self) -> Result<BTreeSet<SemanticVersion>> {
        let commits: HashSet<CommitRef> = self
            .repo
            .branch_commits(&self.options.branch)?
            .into_iter()
            .collect();
        let tag_map = TagMap::build(self.repo.tags()?, &commits);
        tracing::debug!(tags = tag_map.len(), "local tags on branch");

        Ok(tag_map.semvers(&self.options.tag_prefix))
    }

    /// Remote history of the branch, resolved to local commits
    ///
    /// Fails when a remote commit is not present locally, or when the
    /// history is longer than [MAX_COMMIT_PAGES] pages of
    /// [COMMITS_PER_PAGE] commits.
    pub fn remote_commits(&self) -> Result<Vec<CommitRef>> {
        let head = self.api.branch_head(&self.options.branch)?;
        let mut seen = HashSet::new();
        let mut commits = Vec::new();

        let head_commit = self.resolve(&head)?;
        seen.insert(head_commit);
        commits.push(head_commit);

        // one page past the bound tells a history of exactly the bound
        // from a longer one
        let mut page = 1;
        loop {
            let shas = self.api.commit_page(&head, page, COMMITS_PER_PAGE)?;
            let mut added = 0;
            for sha in &shas {
                let commit = self.resolve(sha)?;
                if seen.insert(commit) {
                    commits.push(commit);
                    added += 1;
                }
            }
            tracing::debug!(page, received = shas.len(), added, "remote commit page");

            if page > MAX_COMMIT_PAGES && added > 0 {
                return Err(HookError::remote(format!(
                    "Too many commits: the remote history exceeds {} pages of {} commits ({}). \
                     Time to reevaluate.",
                    MAX_COMMIT_PAGES,
                    COMMITS_PER_PAGE,
                    MAX_COMMIT_PAGES * COMMITS_PER_PAGE
                )));
            }
            if shas.len() < COMMITS_PER_PAGE || added == 0 {
                return Ok(commits);
            }
            page += 1;
        }
    }

    /// SemVer tags on the remote
    pub fn remote_tag_versions(&self) -> Result<BTreeSet<SemanticVersion>> {
        Ok(self
            .api
            .tag_names()?
            .into_iter()
            .filter_map(|name| Tag::new(name).semver(&self.options.tag_prefix))
            .collect())
    }

    /// Versions declared in any source file of any of `commits`
    ///
    /// Each blob is read once even when many commits share it.
    pub fn remote_declarations(
        &self,
        commits: &[CommitRef],
        warnings: &mut Vec<BoundaryWarning>,
    ) -> Result<BTreeSet<SemanticVersion>> {
        let mut versions = BTreeSet::new();
        let mut scanned = HashSet::new();

        for commit in commits {
            for file in self.repo.source_files(*commit, self.scanner.suffixes())? {
                if !scanned.insert(file.blob) {
                    continue;
                }
                let content = self.repo.blob_content(file.blob)?;
                match self.scanner.scan_bytes(&content) {
                    Ok(found) => versions.extend(found),
                    Err(Unscannable::NotUtf8) => warnings.push(BoundaryWarning::UndecodableFile {
                        path: file.path,
                        commit: commit.short(),
                    }),
                    Err(Unscannable::Syntax) => warnings.push(BoundaryWarning::UnparsableFile {
                        path: file.path,
                        commit: commit.short(),
                    }),
                }
            }
        }

        Ok(versions)
    }

    fn resolve(&self, sha: &str) -> Result<CommitRef> {
        self.repo.resolve_commit(sha)?.ok_or_else(|| {
            HookError::remote(format!(
                "Remote commit {} is not known locally. This might be because the remote \
                 has commits you have not fetched yet. Run `git fetch --all` and retry.",
                sha
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRepository;
    use std::cell::Cell;

    fn v(text: &str) -> SemanticVersion {
        SemanticVersion::parse(text).unwrap()
    }

    /// In-memory remote serving a linear history, newest first
    struct FakeRemote {
        history: Vec<String>,
        tags: Vec<String>,
        pages_served: Cell<usize>,
    }

    impl FakeRemote {
        fn new(seeds: &[u32], tags: &[&str]) -> Self {
            FakeRemote {
                history: seeds
                    .iter()
                    .map(|seed| MockRepository::commit_ref(*seed).to_string())
                    .collect(),
                tags: tags.iter().map(|t| t.to_string()).collect(),
                pages_served: Cell::new(0),
            }
        }
    }

    impl RemoteApi for FakeRemote {
        fn branch_head(&self, branch: &str) -> Result<String> {
            if branch != "main" {
                return Err(HookError::remote("no such branch"));
            }
            Ok(self.history[0].clone())
        }

        fn commit_page(&self, _sha: &str, page: usize, per_page: usize) -> Result<Vec<String>> {
            self.pages_served.set(self.pages_served.get() + 1);
            let start = (page - 1) * per_page;
            Ok(self
                .history
                .iter()
                .skip(start)
                .take(per_page)
                .cloned()
                .collect())
        }

        fn tag_names(&self) -> Result<Vec<String>> {
            Ok(self.tags.clone())
        }
    }

    /// Repository with `count` linear commits seeded `count..1`, newest first
    fn linear_repo(count: u32) -> (MockRepository, Vec<u32>) {
        let mut repo = MockRepository::new();
        let seeds: Vec<u32> = (1..=count).rev().collect();
        repo.set_branch("main", &seeds);
        (repo, seeds)
    }

    fn gate<'a>(repo: &'a MockRepository, api: &'a FakeRemote) -> VersionGate<'a, MockRepository, FakeRemote> {
        VersionGate::new(repo, api, DeclarationScanner::default(), GateOptions::default())
    }

    #[test]
    fn test_decide_all_aligned_passes() {
        let version = v("1.2.0");
        let outcome = decide(&version, Some(&version), Some(&version), Some(&version));
        assert_eq!(outcome, GateOutcome::Pass(PassReason::Aligned));
    }

    #[test]
    fn test_decide_behind_local_tag_fails_regardless_of_remote() {
        let local = v("1.0.0");
        let tag = v("1.1.0");
        for remote in [None, Some(v("0.1.0")), Some(v("5.0.0"))] {
            let outcome = decide(&local, Some(&tag), remote.as_ref(), remote.as_ref());
            assert!(matches!(
                outcome,
                GateOutcome::Fail(Violation::BehindLocalTag { .. })
            ));
        }
    }

    #[test]
    fn test_decide_behind_remote_version_fails() {
        let outcome = decide(&v("1.0.0"), Some(&v("1.0.0")), Some(&v("1.2.0")), Some(&v("1.0.0")));
        assert_eq!(
            outcome,
            GateOutcome::Fail(Violation::BehindRemote {
                local_version: v("1.0.0"),
                max_remote_version: v("1.2.0"),
            })
        );
    }

    #[test]
    fn test_decide_advanced_passes() {
        let outcome = decide(&v("2.0.0"), Some(&v("1.1.0")), Some(&v("1.2.0")), Some(&v("1.1.0")));
        assert_eq!(outcome, GateOutcome::Pass(PassReason::Advanced));
    }

    #[test]
    fn test_decide_without_any_history_passes() {
        assert_eq!(
            decide(&v("0.1.0"), None, None, None),
            GateOutcome::Pass(PassReason::Advanced)
        );
    }

    #[test]
    fn test_decide_prerelease_is_behind_release_tag() {
        let outcome = decide(&v("1.1.0-rc.1"), Some(&v("1.1.0")), None, None);
        assert!(!outcome.is_pass());
    }

    #[test]
    fn test_decide_build_metadata_counts_as_aligned() {
        let outcome = decide(
            &v("1.0.0+local"),
            Some(&v("1.0.0")),
            Some(&v("1.0.0+ci")),
            Some(&v("1.0.0")),
        );
        assert_eq!(outcome, GateOutcome::Pass(PassReason::Aligned));
    }

    #[test]
    fn test_violation_messages() {
        let behind_tag = Violation::BehindLocalTag {
            local_version: v("1.0.0"),
            max_local_tag: v("1.1.0"),
        };
        assert!(behind_tag.to_string().contains("(1.1.0)"));
        assert!(behind_tag.to_string().contains("create this tag"));

        let behind_remote = Violation::BehindRemote {
            local_version: v("1.0.0"),
            max_remote_version: v("1.2.0"),
        };
        assert!(behind_remote.to_string().contains("maximum remote version is 1.2.0"));
        assert!(behind_remote.to_string().contains("forbidden"));
    }

    #[test]
    fn test_remote_history_of_250_commits_takes_three_pages() {
        let (repo, seeds) = linear_repo(250);
        let api = FakeRemote::new(&seeds, &[]);

        let commits = gate(&repo, &api).remote_commits().unwrap();

        assert_eq!(commits.len(), 250);
        assert_eq!(api.pages_served.get(), 3);
        let distinct: HashSet<_> = commits.iter().collect();
        assert_eq!(distinct.len(), 250);
    }

    #[test]
    fn test_remote_history_of_exactly_one_page_boundary() {
        let (repo, seeds) = linear_repo(200);
        let api = FakeRemote::new(&seeds, &[]);

        let commits = gate(&repo, &api).remote_commits().unwrap();

        assert_eq!(commits.len(), 200);
        // pages 1 and 2 are full, page 3 comes back empty
        assert_eq!(api.pages_served.get(), 3);
    }

    #[test]
    fn test_remote_history_at_page_bound_passes() {
        let count = (MAX_COMMIT_PAGES * COMMITS_PER_PAGE) as u32;
        let (repo, seeds) = linear_repo(count);
        let api = FakeRemote::new(&seeds, &[]);

        let commits = gate(&repo, &api).remote_commits().unwrap();

        assert_eq!(commits.len(), count as usize);
        assert_eq!(api.pages_served.get(), MAX_COMMIT_PAGES + 1);
    }

    #[test]
    fn test_remote_history_beyond_page_bound_is_fatal() {
        let count = (MAX_COMMIT_PAGES * COMMITS_PER_PAGE) as u32 + 1;
        let (repo, seeds) = linear_repo(count);
        let api = FakeRemote::new(&seeds, &[]);

        let err = gate(&repo, &api).remote_commits().unwrap_err();

        assert!(err.to_string().contains("Too many commits"));
        assert_eq!(api.pages_served.get(), MAX_COMMIT_PAGES + 1);
    }

    #[test]
    fn test_unknown_remote_commit_is_fatal() {
        let (repo, _) = linear_repo(3);
        // the remote is one commit ahead of the local clone
        let api = FakeRemote::new(&[99, 3, 2, 1], &[]);

        let err = gate(&repo, &api).remote_commits().unwrap_err();
        assert!(err.to_string().contains("git fetch --all"));
    }

    #[test]
    fn test_local_tags_only_count_on_branch() {
        let (mut repo, _) = linear_repo(3);
        repo.add_tag("0.1.0", 1);
        repo.add_tag("0.2.0", 3);
        repo.add_tag("not-semver", 2);
        repo.add_tag("9.0.0", 50); // on another branch

        let api = FakeRemote::new(&[3, 2, 1], &[]);
        let tags = gate(&repo, &api).local_tag_versions().unwrap();

        assert_eq!(tags.into_iter().collect::<Vec<_>>(), vec![v("0.1.0"), v("0.2.0")]);
    }

    #[test]
    fn test_tag_prefix_option() {
        let (mut repo, _) = linear_repo(1);
        repo.add_tag("v1.0.0", 1);
        repo.add_tag("1.5.0", 1);
        let api = FakeRemote::new(&[1], &["v2.0.0", "2.5.0"]);
        let options = GateOptions {
            branch: "main".to_string(),
            tag_prefix: "v".to_string(),
        };
        let gate = VersionGate::new(&repo, &api, DeclarationScanner::default(), options);

        assert_eq!(gate.local_tag_versions().unwrap().len(), 1);
        assert_eq!(
            gate.remote_tag_versions().unwrap().into_iter().collect::<Vec<_>>(),
            vec![v("2.0.0")]
        );
    }

    #[test]
    fn test_remote_declarations_skip_unreadable_files() {
        let (mut repo, _) = linear_repo(2);
        repo.add_file(1, "pkg/_version.py", "__version__ = \"0.9.0\"\n");
        repo.add_file(2, "pkg/_version.py", "__version__ = \"1.2.0\"\n");
        repo.add_file(2, "pkg/binary.py", vec![0xffu8, 0xfe, 0x00]);
        repo.add_file(2, "pkg/broken.py", "def f(:\n__version__ = \"9.0.0\"\n");
        repo.add_file(2, "setup.py", "setup(\n    name=\"pkg\",\n    version=\"8.0.0\"\n)\n");
        repo.add_file(2, "README.md", "version = \"7.0.0\"\n");

        let api = FakeRemote::new(&[2, 1], &[]);
        let gate = gate(&repo, &api);
        let commits = vec![MockRepository::commit_ref(2), MockRepository::commit_ref(1)];
        let mut warnings = Vec::new();

        let versions = gate.remote_declarations(&commits, &mut warnings).unwrap();

        assert_eq!(versions.into_iter().collect::<Vec<_>>(), vec![v("0.9.0"), v("1.2.0")]);
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().any(
            |w| matches!(w, BoundaryWarning::UndecodableFile { path, .. } if path == "pkg/binary.py")
        ));
        assert!(warnings.iter().any(
            |w| matches!(w, BoundaryWarning::UnparsableFile { path, .. } if path == "pkg/broken.py")
        ));
    }

    #[test]
    fn test_evaluate_fails_when_remote_source_is_ahead() {
        let (mut repo, seeds) = linear_repo(3);
        repo.add_tag("1.0.0", 2);
        repo.add_file(3, "pkg/_version.py", "__version__ = \"1.2.0\"\n");
        let api = FakeRemote::new(&seeds, &["1.0.0"]);

        let report = gate(&repo, &api).evaluate(&v("1.0.0")).unwrap();

        assert_eq!(report.max_remote_version, Some(v("1.2.0")));
        assert_eq!(report.max_remote_tag, Some(v("1.0.0")));
        assert_eq!(report.remote_commits, 3);
        assert!(matches!(
            report.outcome,
            GateOutcome::Fail(Violation::BehindRemote { .. })
        ));
    }

    #[test]
    fn test_evaluate_passes_when_everything_aligned() {
        let (mut repo, seeds) = linear_repo(2);
        repo.add_tag("1.1.0", 2);
        repo.add_file(2, "pkg/_version.py", "__version__ = \"1.1.0\"\n");
        let api = FakeRemote::new(&seeds, &["1.1.0"]);

        let report = gate(&repo, &api).evaluate(&v("1.1.0")).unwrap();

        assert_eq!(report.outcome, GateOutcome::Pass(PassReason::Aligned));
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_evaluate_passes_for_new_major_version() {
        let (mut repo, seeds) = linear_repo(2);
        repo.add_tag("1.1.0", 1);
        repo.add_file(2, "setup.py", "version = \"1.2.0\"\n");
        let api = FakeRemote::new(&seeds, &["1.1.0"]);

        let report = gate(&repo, &api).evaluate(&v("2.0.0")).unwrap();

        assert_eq!(report.outcome, GateOutcome::Pass(PassReason::Advanced));
    }

    #[test]
    fn test_evaluate_warns_without_tags() {
        let (repo, seeds) = linear_repo(1);
        let api = FakeRemote::new(&seeds, &[]);

        let report = gate(&repo, &api).evaluate(&v("0.1.0")).unwrap();

        assert!(report.outcome.is_pass());
        assert!(report.warnings.contains(&BoundaryWarning::NoRemoteTags));
        assert!(report.warnings.contains(&BoundaryWarning::NoLocalTags {
            branch: "main".to_string()
        }));
    }
}

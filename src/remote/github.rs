use crate::domain::RemoteSlug;
use crate::error::{HookError, Result};
use crate::remote::RemoteApi;
use reqwest::blocking::{Client, Response};
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Default GitHub REST endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const BRANCHES_PER_PAGE: usize = 100;

#[derive(Debug, Deserialize)]
struct BranchEntry {
    name: String,
    commit: CommitEntry,
}

#[derive(Debug, Deserialize)]
struct CommitEntry {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct TagRefEntry {
    #[serde(rename = "ref")]
    reference: String,
}

/// The refs endpoint answers with a bare object when exactly one ref matches
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

/// Blocking client for the GitHub REST API of one repository
pub struct GitHubApi {
    client: Client,
    repo_url: String,
    token: Option<String>,
}

impl GitHubApi {
    /// Create a client for `slug` under `api_url`
    ///
    /// # Arguments
    /// * `api_url` - API root, e.g. [DEFAULT_API_URL]
    /// * `slug` - Owner and repository
    /// * `token` - Optional token sent as a bearer credential
    pub fn new(api_url: &str, slug: &RemoteSlug, token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("pre-commit-hooks/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(GitHubApi {
            client,
            repo_url: format!("{}/{}", api_url.trim_end_matches('/'), slug.api_path()),
            token,
        })
    }

    fn send(&self, path: &str, query: &[(&str, String)]) -> Result<Response> {
        let url = format!("{}/{}", self.repo_url, path);
        tracing::debug!(%url, ?query, "GET");

        let mut request = self
            .client
            .get(&url)
            .query(query)
            .header(ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        Ok(request.send()?)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let response = self.send(path, query)?;
        let status = response.status();
        if !status.is_success() {
            return Err(HookError::remote(format!(
                "GET {}/{} returned {}",
                self.repo_url, path, status
            )));
        }

        Ok(response.json()?)
    }
}

impl RemoteApi for GitHubApi {
    fn branch_head(&self, branch: &str) -> Result<String> {
        let mut page = 1;
        loop {
            let branches: Vec<BranchEntry> = self.get_json(
                "branches",
                &[
                    ("per_page", BRANCHES_PER_PAGE.to_string()),
                    ("page", page.to_string()),
                ],
            )?;

            let count = branches.len();
            if let Some(entry) = branches.into_iter().find(|b| b.name == branch) {
                return Ok(entry.commit.sha);
            }
            if count < BRANCHES_PER_PAGE {
                return Err(HookError::remote(format!(
                    "Branch '{}' does not exist on the remote",
                    branch
                )));
            }
            page += 1;
        }
    }

    fn commit_page(&self, sha: &str, page: usize, per_page: usize) -> Result<Vec<String>> {
        let commits: Vec<CommitEntry> = self.get_json(
            "commits",
            &[
                ("per_page", per_page.to_string()),
                ("sha", sha.to_string()),
                ("page", page.to_string()),
            ],
        )?;

        Ok(commits.into_iter().map(|c| c.sha).collect())
    }

    fn tag_names(&self) -> Result<Vec<String>> {
        let response = self.send("git/refs/tags", &[])?;
        if response.status() == StatusCode::NOT_FOUND {
            // GitHub answers 404 for a repository without tags
            return Ok(Vec::new());
        }
        if !response.status().is_success() {
            return Err(HookError::remote(format!(
                "GET {}/git/refs/tags returned {}",
                self.repo_url,
                response.status()
            )));
        }

        let refs: OneOrMany<TagRefEntry> = response.json()?;
        Ok(refs
            .into_vec()
            .into_iter()
            .filter_map(|r| r.reference.strip_prefix("refs/tags/").map(str::to_string))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn api(server: &MockServer, token: Option<&str>) -> GitHubApi {
        GitHubApi::new(
            &server.base_url(),
            &RemoteSlug::new("owner", "repo"),
            token.map(str::to_string),
        )
        .unwrap()
    }

    #[test]
    fn test_branch_head() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/repos/owner/repo/branches")
                .query_param("per_page", "100")
                .query_param("page", "1");
            then.status(200).json_body(json!([
                {"name": "develop", "commit": {"sha": "aaa"}},
                {"name": "main", "commit": {"sha": "bbb"}}
            ]));
        });

        assert_eq!(api(&server, None).branch_head("main").unwrap(), "bbb");
        mock.assert();
    }

    #[test]
    fn test_branch_head_missing_branch() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/repos/owner/repo/branches");
            then.status(200)
                .json_body(json!([{"name": "develop", "commit": {"sha": "aaa"}}]));
        });

        let err = api(&server, None).branch_head("main").unwrap_err();
        assert!(err.to_string().contains("'main' does not exist"));
    }

    #[test]
    fn test_bearer_token_is_sent() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/repos/owner/repo/branches")
                .header("authorization", "Bearer s3cret")
                .header_exists("user-agent");
            then.status(200)
                .json_body(json!([{"name": "main", "commit": {"sha": "ccc"}}]));
        });

        assert_eq!(api(&server, Some("s3cret")).branch_head("main").unwrap(), "ccc");
        mock.assert();
    }

    #[test]
    fn test_commit_page_query() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/repos/owner/repo/commits")
                .query_param("per_page", "100")
                .query_param("sha", "head")
                .query_param("page", "2");
            then.status(200).json_body(json!([{"sha": "c1"}, {"sha": "c2"}]));
        });

        let shas = api(&server, None).commit_page("head", 2, 100).unwrap();
        assert_eq!(shas, vec!["c1".to_string(), "c2".to_string()]);
        mock.assert();
    }

    #[test]
    fn test_http_failure_is_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/repos/owner/repo/commits");
            then.status(500);
        });

        let err = api(&server, None).commit_page("head", 1, 100).unwrap_err();
        assert!(matches!(err, HookError::Remote(_)));
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn test_tag_names_strip_prefix() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/repos/owner/repo/git/refs/tags");
            then.status(200).json_body(json!([
                {"ref": "refs/tags/1.0.0"},
                {"ref": "refs/tags/stable"},
                {"ref": "refs/tags/sss1.0.0"}
            ]));
        });

        let tags = api(&server, None).tag_names().unwrap();
        assert_eq!(tags, vec!["1.0.0", "stable", "sss1.0.0"]);
    }

    #[test]
    fn test_tag_names_single_object() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/repos/owner/repo/git/refs/tags");
            then.status(200).json_body(json!({"ref": "refs/tags/0.1.0"}));
        });

        assert_eq!(api(&server, None).tag_names().unwrap(), vec!["0.1.0"]);
    }

    #[test]
    fn test_tag_names_not_found_means_no_tags() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/repos/owner/repo/git/refs/tags");
            then.status(404).json_body(json!({"message": "Not Found"}));
        });

        assert!(api(&server, None).tag_names().unwrap().is_empty());
    }
}

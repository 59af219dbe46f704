//! GitHub (REST v3) commit retrieval across all branches.
//!
//! Endpoints used:
//!   * GET /repos/{owner}/{repo}/branches
//!   * GET /repos/{owner}/{repo}/commits?sha={branch}
//!
//! Commit pages are chained through the `Link` response header.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::ProviderConfig;
use crate::error::{CredentialError, FetchError, FetchResult};
use crate::model::{Commit, Credentials, TakeWhile};

use super::http::{HttpResponse, RequestConfig};
use super::paging::{fetch_all_pages, Page};
use super::traits::{CredentialStore, HttpTransport};

const UNKNOWN_AUTHOR: &str = "unknown";

#[derive(Debug, Deserialize)]
struct GitHubBranch {
    name: String,
}

#[derive(Debug, Deserialize)]
struct GitHubAuthor {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubCommitter {
    date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct GitHubCommitData {
    #[serde(default)]
    message: String,
    author: Option<GitHubAuthor>,
    committer: GitHubCommitter,
}

#[derive(Debug, Deserialize)]
struct GitHubCommit {
    sha: String,
    commit: GitHubCommitData,
}

impl GitHubCommit {
    fn to_commit(&self) -> Commit {
        let author = self
            .commit
            .author
            .as_ref()
            .and_then(|a| a.name.clone())
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());

        Commit {
            id: self.sha.clone(),
            author,
            message: self.commit.message.clone(),
            date: self.commit.committer.date,
        }
    }
}

/// GitHub adapter
#[derive(Debug, Clone)]
pub struct GitHubCommits<H, S> {
    http: H,
    store: S,
    config: ProviderConfig,
}

impl<H: HttpTransport, S: CredentialStore> GitHubCommits<H, S> {
    pub fn new(http: H, store: S, config: ProviderConfig) -> Self {
        Self {
            http,
            store,
            config,
        }
    }

    pub fn is_authorized(&self) -> bool {
        self.store.is_initialized(&self.config.token)
    }

    pub fn authorize(&self, username: &str, password: &str) -> Result<(), CredentialError> {
        self.store
            .set(&self.config.token, &Credentials::new(username, password))
    }

    /// Fetch the commits reachable from every branch of `owner/repository`.
    ///
    /// Branches are fetched concurrently and merged in branch-listing order;
    /// a commit on several branches is kept once, at its first position.
    /// Empty `repository` or `owner` yields an empty list without any request.
    pub async fn get_commits_by_repo(
        &self,
        repository: &str,
        owner: &str,
        take_while: Option<&TakeWhile>,
    ) -> FetchResult<Vec<Commit>> {
        if repository.is_empty() || owner.is_empty() {
            return Ok(Vec::new());
        }

        let credentials = self.store.get(&self.config.token)?;
        let request = RequestConfig::new(credentials, owner);

        let branches = self.get_branches(repository, owner, &request).await?;
        debug!(
            owner = %owner,
            repository = %repository,
            branches = branches.len(),
            "Listed GitHub branches"
        );

        let commits_url = self.config.commits_url_for(owner, repository);
        let fetches: Vec<_> = branches
            .iter()
            .map(|branch| self.get_branch_commits(&commits_url, &branch.name, &request, take_while))
            .collect();
        let per_branch = try_join_all(fetches).await?;

        let fetched: usize = per_branch.iter().map(Vec::len).sum();
        let unique = unique_by(per_branch.into_iter().flatten(), |c| c.sha.clone());
        let commits: Vec<Commit> = unique.iter().map(GitHubCommit::to_commit).collect();

        info!(
            owner = %owner,
            repository = %repository,
            branches = branches.len(),
            fetched,
            count = commits.len(),
            "Fetched GitHub commits"
        );

        Ok(commits)
    }

    async fn get_branches(
        &self,
        repository: &str,
        owner: &str,
        request: &RequestConfig,
    ) -> FetchResult<Vec<GitHubBranch>> {
        let url = self
            .config
            .branches_url_for(owner, repository)
            .ok_or_else(|| FetchError::InvalidUrl("no branch listing endpoint".to_string()))?;

        let response = self.http.get(&url, request).await?;
        if !response.is_ok() {
            return Err(FetchError::RequestFailed {
                status: response.status,
                status_text: response.status_text,
            });
        }

        Ok(serde_json::from_str(&response.body)?)
    }

    async fn get_branch_commits(
        &self,
        commits_url: &str,
        branch: &str,
        request: &RequestConfig,
        take_while: Option<&TakeWhile>,
    ) -> FetchResult<Vec<GitHubCommit>> {
        let url = Url::parse_with_params(commits_url, &[("sha", branch)])
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", commits_url, e)))?;

        let stop_on = take_while.map(|take_while| {
            move |items: &[GitHubCommit]| items.iter().any(|raw| take_while(&raw.to_commit()))
        });
        let should_stop = stop_on
            .as_ref()
            .map(|f| f as &(dyn Fn(&[GitHubCommit]) -> bool + Sync));

        let pages =
            fetch_all_pages(&self.http, url.as_str(), request, split_page, should_stop).await?;

        debug!(branch = %branch, pages = pages.len(), "Fetched branch commits");

        Ok(pages.into_iter().flat_map(|page| page.items).collect())
    }
}

fn split_page(response: &HttpResponse, body: Vec<GitHubCommit>) -> Page<GitHubCommit> {
    let next = response.header("link").and_then(next_link);
    Page::new(body, next)
}

/// Extract the `rel="next"` target from an RFC 8288 `Link` header.
pub fn next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();

        let is_next = parts.any(|param| {
            let param = param.trim();
            param
                .strip_prefix("rel=")
                .map(|rel| rel.trim_matches('"').split_whitespace().any(|r| r == "next"))
                .unwrap_or(false)
        });

        if !is_next {
            return None;
        }

        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(String::from)
    })
}

/// Keep the first occurrence of each key, preserving order
fn unique_by<T, K, I, F>(items: I, key: F) -> Vec<T>
where
    I: IntoIterator<Item = T>,
    K: std::hash::Hash + Eq,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(key(item)))
        .collect()
}

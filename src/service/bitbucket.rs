//! BitBucket Cloud (REST 2.0) commit retrieval.
//!
//! Endpoint: `GET /2.0/repositories/{owner}/{repo}/commits`, paged through the
//! `next` field of each response body. BitBucket returns a single linear
//! history, so no branch fan-out or deduplication is done.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::ProviderConfig;
use crate::error::{CredentialError, FetchResult};
use crate::model::{Commit, Credentials, TakeWhile};

use super::http::{HttpResponse, RequestConfig};
use super::paging::{fetch_all_pages, Page};
use super::traits::{CredentialStore, HttpTransport};

const UNKNOWN_AUTHOR: &str = "unknown";

#[derive(Debug, Deserialize)]
struct BitbucketPage {
    #[serde(default)]
    values: Vec<BitbucketCommit>,
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BitbucketCommit {
    hash: String,
    #[serde(default)]
    author: Option<BitbucketAuthor>,
    #[serde(default)]
    message: String,
    date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct BitbucketAuthor {
    raw: Option<String>,
    user: Option<BitbucketUser>,
}

#[derive(Debug, Deserialize)]
struct BitbucketUser {
    display_name: Option<String>,
}

impl BitbucketCommit {
    /// Prefer the linked account's display name over the raw author string
    fn author_name(&self) -> String {
        let author = self.author.as_ref();
        author
            .and_then(|a| a.user.as_ref())
            .and_then(|u| u.display_name.clone())
            .or_else(|| author.and_then(|a| a.raw.clone()))
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string())
    }

    fn to_commit(&self) -> Commit {
        Commit {
            id: self.hash.clone(),
            author: self.author_name(),
            message: self.message.clone(),
            date: self.date,
        }
    }
}

/// BitBucket adapter
#[derive(Debug, Clone)]
pub struct BitbucketCommits<H, S> {
    http: H,
    store: S,
    config: ProviderConfig,
}

impl<H: HttpTransport, S: CredentialStore> BitbucketCommits<H, S> {
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

    /// Fetch all commits of `owner/repository`, newest first.
    ///
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
        let url = self.config.commits_url_for(owner, repository);

        debug!(url = %url, "Fetching BitBucket commits");

        let stop_on = take_while.map(|take_while| {
            move |items: &[BitbucketCommit]| items.iter().any(|raw| take_while(&raw.to_commit()))
        });
        let should_stop = stop_on
            .as_ref()
            .map(|f| f as &(dyn Fn(&[BitbucketCommit]) -> bool + Sync));

        let pages = fetch_all_pages(&self.http, &url, &request, split_page, should_stop).await?;

        let commits: Vec<Commit> = pages
            .iter()
            .flat_map(|page| page.items.iter())
            .map(BitbucketCommit::to_commit)
            .collect();

        info!(
            owner = %owner,
            repository = %repository,
            pages = pages.len(),
            count = commits.len(),
            "Fetched BitBucket commits"
        );

        Ok(commits)
    }
}

fn split_page(_: &HttpResponse, body: BitbucketPage) -> Page<BitbucketCommit> {
    Page::new(body.values, body.next)
}

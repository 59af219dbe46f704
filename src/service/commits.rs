//! Provider-agnostic entry point for commit retrieval.
//!
//! `CommitClient` wraps one concrete adapter per provider and dispatches on
//! the enum variant, so callers use a single `get_commits_by_repo` contract
//! regardless of where the repository is hosted.

use tracing::debug;

use crate::config::{ProviderConfig, ServiceConfig};
use crate::error::{AppResult, CredentialError, FetchResult};
use crate::model::{Commit, Provider, TakeWhile};

use super::bitbucket::BitbucketCommits;
use super::credentials::FileCredentialStore;
use super::github::GitHubCommits;
use super::http::ReqwestTransport;
use super::traits::{CredentialStore, HttpTransport};

/// Commit retrieval for one provider
#[derive(Debug, Clone)]
pub enum CommitClient<H, S> {
    GitHub(GitHubCommits<H, S>),
    BitBucket(BitbucketCommits<H, S>),
}

impl<H: HttpTransport, S: CredentialStore> CommitClient<H, S> {
    pub fn new(provider: Provider, http: H, store: S, config: &ServiceConfig) -> Self {
        let provider_config = ProviderConfig::for_provider(provider, config);
        debug!(provider = %provider, commits_url = %provider_config.commits_url, "Creating commit client");

        match provider {
            Provider::GitHub => Self::GitHub(GitHubCommits::new(http, store, provider_config)),
            Provider::BitBucket => {
                Self::BitBucket(BitbucketCommits::new(http, store, provider_config))
            }
        }
    }

    /// Build a client from a provider name such as `"github"`.
    ///
    /// Unknown names are a configuration error; there is no default provider.
    pub fn from_name(name: &str, http: H, store: S, config: &ServiceConfig) -> AppResult<Self> {
        let provider: Provider = name.parse()?;
        Ok(Self::new(provider, http, store, config))
    }

    pub fn provider(&self) -> Provider {
        match self {
            Self::GitHub(_) => Provider::GitHub,
            Self::BitBucket(_) => Provider::BitBucket,
        }
    }

    pub fn is_authorized(&self) -> bool {
        match self {
            Self::GitHub(c) => c.is_authorized(),
            Self::BitBucket(c) => c.is_authorized(),
        }
    }

    pub fn authorize(&self, username: &str, password: &str) -> Result<(), CredentialError> {
        match self {
            Self::GitHub(c) => c.authorize(username, password),
            Self::BitBucket(c) => c.authorize(username, password),
        }
    }

    pub async fn get_commits_by_repo(
        &self,
        repository: &str,
        owner: &str,
        take_while: Option<&TakeWhile>,
    ) -> FetchResult<Vec<Commit>> {
        match self {
            Self::GitHub(c) => c.get_commits_by_repo(repository, owner, take_while).await,
            Self::BitBucket(c) => c.get_commits_by_repo(repository, owner, take_while).await,
        }
    }
}

impl CommitClient<ReqwestTransport, FileCredentialStore> {
    /// Client talking to the real provider API with credentials from the home directory
    pub fn connect(provider: Provider, config: &ServiceConfig) -> AppResult<Self> {
        let http = ReqwestTransport::new(config)?;
        let store = FileCredentialStore::new()?;
        Ok(Self::new(provider, http, store, config))
    }
}

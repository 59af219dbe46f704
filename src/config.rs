use std::time::Duration;

use crate::model::Provider;

pub const GITHUB_API: &str = "https://api.github.com";
pub const BITBUCKET_API: &str = "https://api.bitbucket.org/2.0";

#[derive(Debug, Clone)]
pub struct Timeouts {
    pub http_request: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            http_request: Duration::from_secs(30),
        }
    }
}

impl Timeouts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_http_request(mut self, timeout: Duration) -> Self {
        self.http_request = timeout;
        self
    }
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub timeouts: Timeouts,
    /// Base URL of the GitHub REST API
    pub github_api: String,
    /// Base URL of the BitBucket 2.0 REST API
    pub bitbucket_api: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            timeouts: Timeouts::default(),
            github_api: GITHUB_API.to_string(),
            bitbucket_api: BITBUCKET_API.to_string(),
        }
    }
}

impl ServiceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn with_github_api(mut self, base: impl Into<String>) -> Self {
        self.github_api = base.into();
        self
    }

    pub fn with_bitbucket_api(mut self, base: impl Into<String>) -> Self {
        self.bitbucket_api = base.into();
        self
    }
}

/// Endpoint templates and credential token for one provider.
///
/// Templates carry `{owner}` and `{repo}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub commits_url: String,
    /// Branch listing endpoint, only used by providers with branch fan-out
    pub branches_url: Option<String>,
    pub token: String,
}

impl ProviderConfig {
    pub fn for_provider(provider: Provider, config: &ServiceConfig) -> Self {
        match provider {
            Provider::GitHub => {
                let base = config.github_api.trim_end_matches('/');
                Self {
                    commits_url: format!("{}/repos/{{owner}}/{{repo}}/commits", base),
                    branches_url: Some(format!("{}/repos/{{owner}}/{{repo}}/branches", base)),
                    token: provider.token_name().to_string(),
                }
            }
            Provider::BitBucket => {
                let base = config.bitbucket_api.trim_end_matches('/');
                Self {
                    commits_url: format!("{}/repositories/{{owner}}/{{repo}}/commits", base),
                    branches_url: None,
                    token: provider.token_name().to_string(),
                }
            }
        }
    }

    pub fn commits_url_for(&self, owner: &str, repository: &str) -> String {
        fill_template(&self.commits_url, owner, repository)
    }

    pub fn branches_url_for(&self, owner: &str, repository: &str) -> Option<String> {
        self.branches_url
            .as_deref()
            .map(|template| fill_template(template, owner, repository))
    }
}

fn fill_template(template: &str, owner: &str, repository: &str) -> String {
    template
        .replace("{owner}", owner)
        .replace("{repo}", repository)
}

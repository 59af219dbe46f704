use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Supported commit-hosting services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    GitHub,
    BitBucket,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::GitHub, Provider::BitBucket];

    /// Display name used in prompts and reports
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::GitHub => "GitHub",
            Provider::BitBucket => "BitBucket",
        }
    }

    /// Name of the credential token file for this provider
    pub fn token_name(&self) -> &'static str {
        match self {
            Provider::GitHub => ".github_token",
            Provider::BitBucket => ".bitbucket_token",
        }
    }

    /// Detect the provider from a remote URL or host name
    pub fn from_url(url: &str) -> Option<Self> {
        let url = url.to_ascii_lowercase();
        if url.contains("github") {
            Some(Provider::GitHub)
        } else if url.contains("bitbucket") {
            Some(Provider::BitBucket)
        } else {
            None
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Provider {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "github" => Ok(Provider::GitHub),
            "bitbucket" => Ok(Provider::BitBucket),
            other => Err(AppError::Configuration(format!(
                "Unknown provider type '{}' (expected github or bitbucket)",
                other
            ))),
        }
    }
}

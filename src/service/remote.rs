//! Prompt defaults inferred from the local checkout's `origin` remote.

use std::path::Path;

use git2::Repository;
use tracing::debug;

use crate::model::Provider;

/// Where the checkout in the working directory is hosted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteInfo {
    pub provider: Option<Provider>,
    pub owner: String,
    pub repository: String,
}

/// Inspect the repository containing `path`.
///
/// Returns `None` when `path` is not inside a git checkout, the checkout has
/// no `origin` remote, or the remote URL cannot be split into owner and name.
pub fn detect(path: &Path) -> Option<RemoteInfo> {
    let repo = match Repository::discover(path) {
        Ok(repo) => repo,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "No git repository found");
            return None;
        }
    };

    let remote = match repo.find_remote("origin") {
        Ok(remote) => remote,
        Err(e) => {
            debug!(error = %e, "No origin remote");
            return None;
        }
    };

    let info = remote.url().and_then(parse_remote_url);
    debug!(url = ?remote.url(), info = ?info, "Inspected origin remote");
    info
}

/// Split a remote URL into provider, owner and repository name.
///
/// Accepts `https://host/owner/repo(.git)`, `ssh://git@host/owner/repo(.git)`
/// and the scp-like `git@host:owner/repo(.git)` form.
pub fn parse_remote_url(url: &str) -> Option<RemoteInfo> {
    let url = url.trim();

    let path = if let Some((_, rest)) = url.split_once("://") {
        rest.split_once('/').map(|(_, path)| path)?
    } else {
        url.split_once(':').map(|(_, path)| path)?
    };

    let mut segments = path
        .trim_end_matches('/')
        .trim_end_matches(".git")
        .rsplit('/')
        .filter(|s| !s.is_empty());
    let repository = segments.next()?;
    let owner = segments.next()?;

    Some(RemoteInfo {
        provider: Provider::from_url(url),
        owner: owner.to_string(),
        repository: repository.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_https() {
        let info = parse_remote_url("https://github.com/rust-lang/cargo.git").unwrap();
        assert_eq!(info.provider, Some(Provider::GitHub));
        assert_eq!(info.owner, "rust-lang");
        assert_eq!(info.repository, "cargo");
    }

    #[test]
    fn test_parse_scp_like() {
        let info = parse_remote_url("git@bitbucket.org:atlassian/python-bitbucket.git").unwrap();
        assert_eq!(info.provider, Some(Provider::BitBucket));
        assert_eq!(info.owner, "atlassian");
        assert_eq!(info.repository, "python-bitbucket");
    }

    #[test]
    fn test_parse_ssh_without_suffix() {
        let info = parse_remote_url("ssh://git@github.com/owner/repo/").unwrap();
        assert_eq!(info.owner, "owner");
        assert_eq!(info.repository, "repo");
    }

    #[test]
    fn test_parse_unknown_host() {
        let info = parse_remote_url("https://git.example.com/team/tool").unwrap();
        assert_eq!(info.provider, None);
        assert_eq!(info.owner, "team");
    }

    #[test]
    fn test_parse_rejects_incomplete() {
        assert_eq!(parse_remote_url("https://github.com/"), None);
        assert_eq!(parse_remote_url("https://github.com/only"), None);
        assert_eq!(parse_remote_url("not a url"), None);
    }

    #[test]
    fn test_detect_reads_origin() {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        repo.remote("origin", "https://github.com/ada/engine.git")
            .unwrap();

        let info = detect(dir.path()).unwrap();
        assert_eq!(info.provider, Some(Provider::GitHub));
        assert_eq!(info.owner, "ada");
        assert_eq!(info.repository, "engine");
    }

    #[test]
    fn test_detect_without_origin() {
        let dir = TempDir::new().unwrap();
        Repository::init(dir.path()).unwrap();
        assert_eq!(detect(dir.path()), None);
    }
}

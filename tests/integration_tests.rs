//! Integration tests for commit retrieval
//!
//! Providers are replaced by a scripted transport, so these tests exercise
//! paging, branch fan-out, deduplication and error handling end to end
//! without network access.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};

use git_velocity::model::TakeWhile;
use git_velocity::service::{
    FileCredentialStore, HttpResponse, MemoryCredentialStore, RequestConfig, Velocity,
    VelocityFormat,
};
use git_velocity::{
    AppError, CommitClient, CredentialError, Credentials, FetchError, FetchResult, HttpTransport,
    Provider, ServiceConfig,
};

/// Answers from a URL-to-response table and records every request.
///
/// Unknown URLs answer 404.
#[derive(Debug, Clone, Default)]
struct ScriptedTransport {
    responses: Arc<Mutex<HashMap<String, HttpResponse>>>,
    requests: Arc<Mutex<Vec<(String, RequestConfig)>>>,
}

impl ScriptedTransport {
    fn new() -> Self {
        Self::default()
    }

    fn with_response(self, url: impl Into<String>, response: HttpResponse) -> Self {
        self.responses.lock().unwrap().insert(url.into(), response);
        self
    }

    fn with_json(self, url: impl Into<String>, body: &Value) -> Self {
        self.with_response(url, HttpResponse::ok(body.to_string()))
    }

    fn calls(&self) -> Vec<String> {
        self.requests().into_iter().map(|(url, _)| url).collect()
    }

    fn requests(&self) -> Vec<(String, RequestConfig)> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpTransport for ScriptedTransport {
    fn get(
        &self,
        url: &str,
        request: &RequestConfig,
    ) -> impl Future<Output = FetchResult<HttpResponse>> + Send {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), request.clone()));
        let response = self
            .responses
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_else(|| HttpResponse::new(404, ""));
        async move { Ok(response) }
    }
}

const GITHUB: &str = "http://github.test";
const BITBUCKET: &str = "http://bitbucket.test/2.0";

const GH_BRANCHES: &str = "http://github.test/repos/ada/engine/branches";
const BB_COMMITS: &str = "http://bitbucket.test/2.0/repositories/ada/engine/commits";

fn config() -> ServiceConfig {
    ServiceConfig::default()
        .with_github_api(GITHUB)
        .with_bitbucket_api(BITBUCKET)
}

fn store() -> MemoryCredentialStore {
    MemoryCredentialStore::new()
        .with(".github_token", Credentials::new("ada", "pw"))
        .with(".bitbucket_token", Credentials::new("ada", "pw"))
}

fn client(provider: Provider, http: &ScriptedTransport) -> CommitClient<ScriptedTransport, MemoryCredentialStore> {
    CommitClient::new(provider, http.clone(), store(), &config())
}

fn base_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap()
}

fn branch_url(branch: &str) -> String {
    format!("http://github.test/repos/ada/engine/commits?sha={}", branch)
}

/// GitHub commit objects `sha-{start}..sha-{end}`, newest first
fn gh_commits(range: std::ops::Range<usize>) -> Value {
    let commits: Vec<Value> = range
        .map(|i| {
            json!({
                "sha": format!("sha-{}", i),
                "commit": {
                    "author": { "name": format!("Author {}", i) },
                    "committer": { "date": (base_date() - Duration::hours(i as i64)).to_rfc3339() },
                    "message": format!("Commit {}", i)
                }
            })
        })
        .collect();
    Value::Array(commits)
}

fn gh_branches(names: &[&str]) -> Value {
    Value::Array(names.iter().map(|n| json!({ "name": n })).collect())
}

fn bb_page(range: std::ops::Range<usize>, next: Option<&str>) -> Value {
    let values: Vec<Value> = range
        .map(|i| {
            json!({
                "hash": format!("hash-{}", i),
                "author": { "raw": format!("Author {} <a{}@example.com>", i, i) },
                "message": format!("Commit {}\n", i),
                "date": (base_date() - Duration::days(i as i64)).to_rfc3339()
            })
        })
        .collect();
    json!({ "values": values, "next": next })
}

fn ids(commits: &[git_velocity::Commit]) -> Vec<&str> {
    commits.iter().map(|c| c.id.as_str()).collect()
}

#[tokio::test]
async fn test_empty_inputs_make_no_requests() {
    for provider in Provider::ALL {
        let http = ScriptedTransport::new();
        let client = client(provider, &http);

        assert!(client.get_commits_by_repo("", "ada", None).await.unwrap().is_empty());
        assert!(client.get_commits_by_repo("engine", "", None).await.unwrap().is_empty());
        assert!(http.calls().is_empty());
    }
}

#[tokio::test]
async fn test_bitbucket_single_page() {
    let http = ScriptedTransport::new().with_json(BB_COMMITS, &bb_page(0..5, None));

    let commits = client(Provider::BitBucket, &http)
        .get_commits_by_repo("engine", "ada", None)
        .await
        .unwrap();

    assert_eq!(commits.len(), 5);
    assert_eq!(commits[0].id, "hash-0");
    assert_eq!(commits[0].author, "Author 0 <a0@example.com>");
    assert_eq!(commits[0].summary(), "Commit 0");
    assert_eq!(http.calls(), vec![BB_COMMITS]);
}

#[tokio::test]
async fn test_bitbucket_two_pages_in_order() {
    let page2 = "http://bitbucket.test/2.0/repositories/ada/engine/commits?page=2";
    let http = ScriptedTransport::new()
        .with_json(BB_COMMITS, &bb_page(0..4, Some(page2)))
        .with_json(page2, &bb_page(4..8, None));

    let commits = client(Provider::BitBucket, &http)
        .get_commits_by_repo("engine", "ada", None)
        .await
        .unwrap();

    assert_eq!(
        ids(&commits),
        vec!["hash-0", "hash-1", "hash-2", "hash-3", "hash-4", "hash-5", "hash-6", "hash-7"]
    );
    assert_eq!(http.calls(), vec![BB_COMMITS, page2]);
}

#[tokio::test]
async fn test_bitbucket_empty_repository() {
    let http = ScriptedTransport::new().with_json(BB_COMMITS, &json!({ "values": [] }));

    let commits = client(Provider::BitBucket, &http)
        .get_commits_by_repo("engine", "ada", None)
        .await
        .unwrap();

    assert!(commits.is_empty());
}

#[tokio::test]
async fn test_github_single_branch() {
    let http = ScriptedTransport::new()
        .with_json(GH_BRANCHES, &gh_branches(&["main"]))
        .with_json(branch_url("main"), &gh_commits(0..4));

    let commits = client(Provider::GitHub, &http)
        .get_commits_by_repo("engine", "ada", None)
        .await
        .unwrap();

    assert_eq!(ids(&commits), vec!["sha-0", "sha-1", "sha-2", "sha-3"]);
    assert_eq!(commits[2].author, "Author 2");
    assert_eq!(http.calls()[0], GH_BRANCHES);
}

#[tokio::test]
async fn test_github_identical_branches_deduplicate() {
    let http = ScriptedTransport::new()
        .with_json(GH_BRANCHES, &gh_branches(&["main", "release"]))
        .with_json(branch_url("main"), &gh_commits(0..4))
        .with_json(branch_url("release"), &gh_commits(0..4));

    let commits = client(Provider::GitHub, &http)
        .get_commits_by_repo("engine", "ada", None)
        .await
        .unwrap();

    assert_eq!(commits.len(), 4);
}

#[tokio::test]
async fn test_github_disjoint_branches_concatenate() {
    let http = ScriptedTransport::new()
        .with_json(GH_BRANCHES, &gh_branches(&["main", "develop"]))
        .with_json(branch_url("main"), &gh_commits(0..4))
        .with_json(branch_url("develop"), &gh_commits(4..8));

    let commits = client(Provider::GitHub, &http)
        .get_commits_by_repo("engine", "ada", None)
        .await
        .unwrap();

    assert_eq!(
        ids(&commits),
        vec!["sha-0", "sha-1", "sha-2", "sha-3", "sha-4", "sha-5", "sha-6", "sha-7"]
    );
}

#[tokio::test]
async fn test_github_overlapping_branches_keep_first_occurrence() {
    let http = ScriptedTransport::new()
        .with_json(GH_BRANCHES, &gh_branches(&["main", "develop"]))
        .with_json(branch_url("main"), &gh_commits(0..4))
        .with_json(branch_url("develop"), &gh_commits(2..6));

    let commits = client(Provider::GitHub, &http)
        .get_commits_by_repo("engine", "ada", None)
        .await
        .unwrap();

    assert_eq!(commits.len(), 6);
    assert_eq!(
        ids(&commits),
        vec!["sha-0", "sha-1", "sha-2", "sha-3", "sha-4", "sha-5"]
    );
}

#[tokio::test]
async fn test_github_branch_names_are_encoded() {
    let http = ScriptedTransport::new()
        .with_json(GH_BRANCHES, &gh_branches(&["feature/paging"]))
        .with_json(branch_url("feature%2Fpaging"), &gh_commits(0..2));

    let commits = client(Provider::GitHub, &http)
        .get_commits_by_repo("engine", "ada", None)
        .await
        .unwrap();

    assert_eq!(commits.len(), 2);
}

#[tokio::test]
async fn test_github_follows_link_header() {
    let page2 = "http://github.test/repositories/1/commits?sha=main&page=2";
    let link = format!(
        r#"<{}>; rel="next", <http://github.test/repositories/1/commits?sha=main&page=2>; rel="last""#,
        page2
    );
    let http = ScriptedTransport::new()
        .with_json(GH_BRANCHES, &gh_branches(&["main"]))
        .with_response(
            branch_url("main"),
            HttpResponse::ok(gh_commits(0..3).to_string()).with_header("Link", link),
        )
        .with_json(page2, &gh_commits(3..5));

    let commits = client(Provider::GitHub, &http)
        .get_commits_by_repo("engine", "ada", None)
        .await
        .unwrap();

    assert_eq!(ids(&commits), vec!["sha-0", "sha-1", "sha-2", "sha-3", "sha-4"]);
    assert_eq!(http.calls().last().map(String::as_str), Some(page2));
}

#[tokio::test]
async fn test_every_request_carries_credentials_and_owner_agent() {
    let bb_page2 = "http://bitbucket.test/2.0/repositories/ada/engine/commits?page=2";
    let gh_page2 = "http://github.test/repositories/1/commits?sha=main&page=2";
    let link = format!(r#"<{}>; rel="next""#, gh_page2);

    let bitbucket = ScriptedTransport::new()
        .with_json(BB_COMMITS, &bb_page(0..2, Some(bb_page2)))
        .with_json(bb_page2, &bb_page(2..4, None));
    let github = ScriptedTransport::new()
        .with_json(GH_BRANCHES, &gh_branches(&["main", "develop"]))
        .with_response(
            branch_url("main"),
            HttpResponse::ok(gh_commits(0..2).to_string()).with_header("Link", link),
        )
        .with_json(gh_page2, &gh_commits(2..4))
        .with_json(branch_url("develop"), &gh_commits(4..6));

    for (provider, http, expected_calls) in [
        (Provider::BitBucket, bitbucket, 2),
        (Provider::GitHub, github, 4),
    ] {
        let client = CommitClient::new(
            provider,
            http.clone(),
            MemoryCredentialStore::new()
                .with(provider.token_name(), Credentials::new("ada", "s3cret")),
            &config(),
        );
        client.get_commits_by_repo("engine", "grace", None).await.unwrap();

        let requests = http.requests();
        assert_eq!(requests.len(), expected_calls, "{:?}", provider);
        for (url, request) in requests {
            assert_eq!(request.credentials, Credentials::new("ada", "s3cret"), "{}", url);
            assert_eq!(request.user_agent, "grace", "{}", url);
        }
    }
}

#[tokio::test]
async fn test_non_200_page_fails_whole_retrieval() {
    let page2 = "http://bitbucket.test/2.0/repositories/ada/engine/commits?page=2";
    let http = ScriptedTransport::new()
        .with_json(BB_COMMITS, &bb_page(0..4, Some(page2)))
        .with_response(page2, HttpResponse::new(500, "oops"));

    let result = client(Provider::BitBucket, &http)
        .get_commits_by_repo("engine", "ada", None)
        .await;

    match result {
        Err(FetchError::RequestFailed {
            status,
            status_text,
        }) => {
            assert_eq!(status, 500);
            assert_eq!(status_text, "Internal Server Error");
        }
        other => panic!("expected RequestFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_failing_branch_aborts_github_retrieval() {
    let http = ScriptedTransport::new()
        .with_json(GH_BRANCHES, &gh_branches(&["main", "gone"]))
        .with_json(branch_url("main"), &gh_commits(0..4));

    let result = client(Provider::GitHub, &http)
        .get_commits_by_repo("engine", "ada", None)
        .await;

    assert!(matches!(
        result,
        Err(FetchError::RequestFailed { status: 404, .. })
    ));
}

#[tokio::test]
async fn test_branch_listing_failure() {
    let http = ScriptedTransport::new().with_response(GH_BRANCHES, HttpResponse::new(401, ""));

    let result = client(Provider::GitHub, &http)
        .get_commits_by_repo("engine", "ada", None)
        .await;

    match result {
        Err(err) => assert_eq!(err.to_string(), "Request failed: 401 - Unauthorized"),
        Ok(commits) => panic!("expected failure, got {} commits", commits.len()),
    }
}

#[tokio::test]
async fn test_invalid_body_is_decode_error() {
    let http = ScriptedTransport::new().with_response(BB_COMMITS, HttpResponse::ok("<html>"));

    let result = client(Provider::BitBucket, &http)
        .get_commits_by_repo("engine", "ada", None)
        .await;

    assert!(matches!(result, Err(FetchError::Decode(_))));
}

#[tokio::test]
async fn test_retrieval_is_idempotent() {
    let http = ScriptedTransport::new()
        .with_json(GH_BRANCHES, &gh_branches(&["main", "develop"]))
        .with_json(branch_url("main"), &gh_commits(0..4))
        .with_json(branch_url("develop"), &gh_commits(2..6));
    let client = client(Provider::GitHub, &http);

    let first = client.get_commits_by_repo("engine", "ada", None).await.unwrap();
    let second = client.get_commits_by_repo("engine", "ada", None).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_take_while_stops_paging() {
    let page2 = "http://bitbucket.test/2.0/repositories/ada/engine/commits?page=2";
    let http = ScriptedTransport::new()
        .with_json(BB_COMMITS, &bb_page(0..4, Some(page2)))
        .with_json(page2, &bb_page(4..8, None));

    let stop_at = |commit: &git_velocity::Commit| commit.id == "hash-2";
    let take_while: &TakeWhile = &stop_at;

    let commits = client(Provider::BitBucket, &http)
        .get_commits_by_repo("engine", "ada", Some(take_while))
        .await
        .unwrap();

    assert_eq!(commits.len(), 4);
    assert_eq!(http.calls(), vec![BB_COMMITS]);
}

#[tokio::test]
async fn test_take_while_stops_one_github_branch_only() {
    let main_page2 = "http://github.test/repositories/1/commits?sha=main&page=2";
    let link = format!(r#"<{}>; rel="next""#, main_page2);
    let http = ScriptedTransport::new()
        .with_json(GH_BRANCHES, &gh_branches(&["main", "develop"]))
        .with_response(
            branch_url("main"),
            HttpResponse::ok(gh_commits(0..4).to_string()).with_header("Link", link),
        )
        .with_json(main_page2, &gh_commits(4..8))
        .with_json(branch_url("develop"), &gh_commits(2..12));

    let stop_at = |commit: &git_velocity::Commit| commit.id == "sha-1";
    let take_while: &TakeWhile = &stop_at;

    let commits = client(Provider::GitHub, &http)
        .get_commits_by_repo("engine", "ada", Some(take_while))
        .await
        .unwrap();

    let calls = http.calls();
    assert!(!calls.iter().any(|url| url == main_page2));
    assert!(calls.contains(&branch_url("develop")));
    assert_eq!(
        ids(&commits),
        vec![
            "sha-0", "sha-1", "sha-2", "sha-3", "sha-4", "sha-5", "sha-6", "sha-7", "sha-8",
            "sha-9", "sha-10", "sha-11"
        ]
    );
}

#[tokio::test]
async fn test_early_stop_does_not_change_velocity() {
    // Two pages of daily commits; the second page is entirely older than last week
    let page2 = "http://bitbucket.test/2.0/repositories/ada/engine/commits?page=2";
    let http = ScriptedTransport::new()
        .with_json(BB_COMMITS, &bb_page(0..12, Some(page2)))
        .with_json(page2, &bb_page(12..30, None));
    let client = client(Provider::BitBucket, &http);

    let velocity = Velocity::new(VelocityFormat::Week);
    let now = base_date() + Duration::minutes(1);
    let stop = velocity.stop_predicate(now);
    let take_while: &TakeWhile = &stop;

    let full = client.get_commits_by_repo("engine", "ada", None).await.unwrap();
    let calls_full = http.calls().len();
    let partial = client
        .get_commits_by_repo("engine", "ada", Some(take_while))
        .await
        .unwrap();
    let calls_partial = http.calls().len() - calls_full;

    assert_eq!(calls_full, 2);
    assert_eq!(calls_partial, 1);

    let full_report = velocity.summarize(&full, now);
    let partial_report = velocity.summarize(&partial, now);
    assert_eq!(full_report.current, partial_report.current);
    assert_eq!(full_report.previous, partial_report.previous);
    assert_eq!(full_report.current_buckets, partial_report.current_buckets);
}

#[tokio::test]
async fn test_missing_credentials_fail_before_requests() {
    let http = ScriptedTransport::new().with_json(GH_BRANCHES, &gh_branches(&["main"]));
    let client = CommitClient::new(
        Provider::GitHub,
        http.clone(),
        MemoryCredentialStore::new(),
        &config(),
    );

    let result = client.get_commits_by_repo("engine", "ada", None).await;

    assert!(matches!(
        result,
        Err(FetchError::Credentials(CredentialError::Missing(_)))
    ));
    assert!(http.calls().is_empty());
}

#[tokio::test]
async fn test_file_credentials_after_authorize() {
    let dir = tempfile::TempDir::new().unwrap();
    let http = ScriptedTransport::new().with_json(BB_COMMITS, &bb_page(0..2, None));
    let client = CommitClient::new(
        Provider::BitBucket,
        http.clone(),
        FileCredentialStore::with_dir(dir.path()),
        &config(),
    );

    assert!(!client.is_authorized());
    client.authorize("ada", "pw").unwrap();
    assert!(client.is_authorized());
    assert!(dir.path().join(".bitbucket_token").is_file());

    let commits = client.get_commits_by_repo("engine", "ada", None).await.unwrap();
    assert_eq!(commits.len(), 2);
}

#[test]
fn test_unknown_provider_is_configuration_error() {
    let result = CommitClient::from_name(
        "gitlab",
        ScriptedTransport::new(),
        store(),
        &config(),
    );
    assert!(matches!(result, Err(AppError::Configuration(_))));
}

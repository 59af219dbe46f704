mod bitbucket;
mod commits;
mod credentials;
mod github;
mod http;
mod paging;
pub mod remote;
mod traits;
pub mod velocity;

pub use bitbucket::BitbucketCommits;
pub use commits::CommitClient;
pub use credentials::{FileCredentialStore, MemoryCredentialStore};
pub use github::{next_link, GitHubCommits};
pub use http::{HttpResponse, ReqwestTransport, RequestConfig};
#[cfg(test)]
pub(crate) use http::ScriptedTransport;
pub use paging::{fetch_all_pages, Page};
pub use traits::{CredentialStore, HttpTransport};
pub use velocity::{DayBucket, Velocity, VelocityFormat, VelocityReport, WindowedCommits};

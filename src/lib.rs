//! git-velocity - commit velocity for GitHub and BitBucket repositories
//!
//! Pulls a repository's commit history from the hosting provider's REST API,
//! buckets it into the current and previous week, month or year, and shows
//! the result as a console report or a terminal dashboard.
//!
//! # Architecture
//!
//! - [`service`]: paged retrieval, provider adapters, the [`CommitClient`]
//!   façade, credential storage and velocity bucketing
//! - [`model`]: commits, credentials and providers
//! - [`cli`]: flags and interactive prompts
//! - [`output`]: plain console report
//! - [`app`] and [`ui`]: the terminal dashboard
//!
//! # Example
//!
//! ```rust,no_run
//! use git_velocity::{CommitClient, Provider, ServiceConfig};
//!
//! #[tokio::main]
//! async fn main() -> git_velocity::AppResult<()> {
//!     let client = CommitClient::connect(Provider::GitHub, &ServiceConfig::default())?;
//!     let commits = client.get_commits_by_repo("cargo", "rust-lang", None).await?;
//!     println!("{} commits", commits.len());
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod event;
pub mod logging;
pub mod model;
pub mod output;
pub mod service;
pub mod tui;
pub mod ui;
pub mod util;

// Re-export commonly used types at the crate root
pub use app::App;
pub use config::{ServiceConfig, Timeouts};
pub use error::{AppError, AppResult, CredentialError, FetchError, FetchResult};
pub use model::{Commit, Credentials, Provider};
pub use service::{CommitClient, CredentialStore, HttpTransport};
pub use tui::Tui;

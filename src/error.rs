use thiserror::Error;

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Terminal error: {0}")]
    Terminal(String),
}

/// Errors raised while retrieving commits from a provider
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request failed: {status} - {status_text}")]
    RequestFailed { status: u16, status_text: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    Credentials(#[from] CredentialError),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return FetchError::Network(format!("request timed out: {}", e));
        }
        FetchError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Decode(e.to_string())
    }
}

/// Credential store errors
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("No credentials stored for {0}")]
    Missing(String),

    #[error("Credentials for {token} are malformed: {reason}")]
    Malformed { token: String, reason: String },

    #[error("Could not determine home directory")]
    NoHomeDir,

    #[error("Failed to write credentials: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors setting up the log file
#[derive(Error, Debug)]
pub enum LogError {
    #[error("Could not determine the local data directory")]
    NoDataDir,

    #[error("Failed to open log file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to install log subscriber: {0}")]
    Subscriber(String),
}

impl From<dialoguer::Error> for AppError {
    fn from(e: dialoguer::Error) -> Self {
        AppError::Prompt(e.to_string())
    }
}

impl From<CredentialError> for AppError {
    fn from(e: CredentialError) -> Self {
        AppError::Fetch(FetchError::Credentials(e))
    }
}

/// Result type alias for app operations
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for commit retrieval
pub type FetchResult<T> = Result<T, FetchError>;

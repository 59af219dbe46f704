use crate::error::{CredentialError, FetchResult};
use crate::model::Credentials;

use super::http::{HttpResponse, RequestConfig};

/// A single authenticated HTTP GET.
///
/// Non-200 statuses are returned as responses, not errors; the caller
/// decides what a failed status means.
pub trait HttpTransport: Clone + Send + Sync {
    fn get(
        &self,
        url: &str,
        request: &RequestConfig,
    ) -> impl std::future::Future<Output = FetchResult<HttpResponse>> + Send;
}

/// Key-value store for provider credentials, keyed by token name.
pub trait CredentialStore: Clone + Send + Sync {
    fn is_initialized(&self, token: &str) -> bool;

    fn get(&self, token: &str) -> Result<Credentials, CredentialError>;

    fn set(&self, token: &str, credentials: &Credentials) -> Result<(), CredentialError>;
}

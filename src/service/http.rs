use std::collections::HashMap;
use std::future::Future;
#[cfg(test)]
use std::sync::{Arc, Mutex};

use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::config::ServiceConfig;
use crate::error::FetchResult;
use crate::model::Credentials;

use super::traits::HttpTransport;

/// Per-request settings shared by every page of one retrieval
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// Sent as HTTP Basic authentication
    pub credentials: Credentials,
    /// Providers ask for a user agent identifying the caller; the repository owner is used
    pub user_agent: String,
}

impl RequestConfig {
    pub fn new(credentials: Credentials, owner: impl Into<String>) -> Self {
        Self {
            credentials,
            user_agent: owner.into(),
        }
    }
}

/// A fully buffered HTTP response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    /// Header names are stored lowercased
    headers: HashMap<String, String>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        let status_text = StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown")
            .to_string();

        Self {
            status,
            status_text,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// A 200 response with the given body
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    /// Add a header value; repeated headers are joined with `", "` as in RFC 9110
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        self.headers
            .entry(name.to_ascii_lowercase())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK.as_u16()
    }
}

/// Transport backed by a shared `reqwest` client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &ServiceConfig) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(config.timeouts.http_request)
            .build()?;

        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(
        &self,
        url: &str,
        request: &RequestConfig,
    ) -> impl Future<Output = FetchResult<HttpResponse>> + Send {
        let builder = self
            .client
            .get(url)
            .basic_auth(
                &request.credentials.username,
                Some(&request.credentials.password),
            )
            .header(USER_AGENT, &request.user_agent)
            .header(ACCEPT, "application/json");
        let url = url.to_string();

        async move {
            debug!(url = %url, "GET");
            let resp = builder.send().await?;

            let status = resp.status();
            let mut response = HttpResponse::new(status.as_u16(), "");
            for (name, value) in resp.headers() {
                if let Ok(value) = value.to_str() {
                    response = response.with_header(name.as_str(), value);
                }
            }
            response.body = resp.text().await?;

            debug!(url = %url, status = status.as_u16(), bytes = response.body.len(), "Response");
            Ok(response)
        }
    }
}

/// In-memory transport that answers from a fixed URL-to-response table.
///
/// Unknown URLs answer 404. Every request is recorded in call order.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub(crate) struct ScriptedTransport {
    responses: Arc<Mutex<HashMap<String, HttpResponse>>>,
    requests: Arc<Mutex<Vec<(String, RequestConfig)>>>,
}

#[cfg(test)]
impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_response(self, url: impl Into<String>, response: HttpResponse) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(url.into(), response);
        self
    }

    pub(crate) fn with_json(self, url: impl Into<String>, body: &serde_json::Value) -> Self {
        self.with_response(url, HttpResponse::ok(body.to_string()))
    }

    /// URLs requested so far, in order
    pub(crate) fn calls(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    pub(crate) fn requests(&self) -> Vec<(String, RequestConfig)> {
        self.requests.lock().unwrap().clone()
    }
}

#[cfg(test)]
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

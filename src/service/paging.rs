use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{FetchError, FetchResult};

use super::http::{HttpResponse, RequestConfig};
use super::traits::HttpTransport;

/// One retrieved page: its items in provider order and the URL of the next page
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next: Option<String>) -> Self {
        Self { items, next }
    }
}

/// Fetch `initial_url` and every page after it.
///
/// Each body is decoded as `B` and split by `extract_page` into items and a
/// continuation URL. Paging ends when no continuation is left, or right after
/// a page for which `should_stop` returns true. Any status other than 200
/// fails the whole call.
pub async fn fetch_all_pages<H, B, T, F>(
    http: &H,
    initial_url: &str,
    request: &RequestConfig,
    extract_page: F,
    should_stop: Option<&(dyn Fn(&[T]) -> bool + Sync)>,
) -> FetchResult<Vec<Page<T>>>
where
    H: HttpTransport,
    B: DeserializeOwned,
    T: Send,
    F: Fn(&HttpResponse, B) -> Page<T> + Send,
{
    let mut pages = Vec::new();
    let mut url = initial_url.to_string();

    loop {
        let response = http.get(&url, request).await?;

        if !response.is_ok() {
            debug!(url = %url, status = response.status, "Page request failed");
            return Err(FetchError::RequestFailed {
                status: response.status,
                status_text: response.status_text,
            });
        }

        let body: B = serde_json::from_str(&response.body)?;
        let page = extract_page(&response, body);
        let stop = should_stop.is_some_and(|f| f(&page.items));

        debug!(
            url = %url,
            page = pages.len() + 1,
            count = page.items.len(),
            has_next = page.next.is_some(),
            stop,
            "Fetched page"
        );

        let next = if stop { None } else { page.next.clone() };
        pages.push(page);

        match next {
            Some(next_url) => url = next_url,
            None => break,
        }
    }

    Ok(pages)
}

//! Offset pagination over Congress.gov list endpoints.
//!
//! [`collect_pages`] drives a page-fetch closure until the upstream runs dry,
//! signals no next page, or the requested cap is reached. A failing page
//! stops the walk and the items gathered so far are returned.

use std::future::Future;

use congress_api::types::SearchPagination;
use congress_api::unwrap_payload;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::CongressError;

/// Position of the next page request. Lives only for one `collect_pages` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub offset: u64,
    pub page_size: u64,
    pub items_collected: usize,
    /// Largest total the upstream has reported so far, if any.
    pub total_reported: Option<u64>,
}

/// One page of raw items plus the upstream's pagination hints.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub items: Vec<Value>,
    /// `Some(false)` means the upstream says this is the last page.
    pub has_next: Option<bool>,
    pub total: Option<u64>,
    /// Upstream `request` echo, passed through to result envelopes.
    pub request: Option<Value>,
}

impl Page {
    /// Builds a page from a Congress.gov envelope, where items sit under
    /// `key` and hints under `pagination.next` / `pagination.count`.
    pub fn from_envelope(envelope: &Value, key: &str) -> Self {
        let items = match unwrap_payload(envelope, key).payload() {
            Some(Value::Array(items)) => items.clone(),
            Some(_) => {
                tracing::warn!("Expected a list under '{}', got an object. Treating page as empty.", key);
                Vec::new()
            }
            None => Vec::new(),
        };
        let pagination = envelope.get("pagination").filter(|p| p.is_object());
        Self {
            items,
            has_next: pagination.map(|p| p.get("next").is_some_and(|n| !n.is_null())),
            total: pagination.and_then(|p| p.get("count")).and_then(Value::as_u64),
            request: envelope.get("request").cloned(),
        }
    }
}

/// When to stop collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopPolicy {
    /// Keep going until the upstream runs out of pages.
    UntilExhausted,
    /// Stop once this many valid items have been collected.
    AtMost(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EmptyPage,
    CapReached,
    NoNextPage,
    FetchFailed,
}

/// Items gathered by [`collect_pages`].
#[derive(Debug, Clone)]
pub struct Collected<T> {
    pub items: Vec<T>,
    pub total_reported: Option<u64>,
    pub pages_fetched: u32,
    /// Items dropped because they failed validation.
    pub skipped: usize,
    pub stop_reason: StopReason,
    pub last_request: Option<Value>,
}

impl<T> Collected<T> {
    /// Upstream total when reported, otherwise the number collected.
    pub fn total_found(&self) -> u64 {
        match self.total_reported {
            Some(total) if total > 0 => total,
            _ => self.items.len() as u64,
        }
    }

    /// Truncates to `limit` items for presentation, returning the list and an
    /// envelope that keeps the recall count and delivered count apart.
    pub fn present(self, limit: usize) -> (Vec<T>, SearchPagination) {
        let total_found = self.total_found();
        let mut items = self.items;
        items.truncate(limit);
        let pagination = SearchPagination {
            total_found,
            returned_to_llm: items.len(),
            limit_applied_in_tool: limit,
        };
        (items, pagination)
    }
}

/// Deserializes each item, dropping and logging the ones that fail.
pub(crate) fn validate_items<T: DeserializeOwned>(label: &str, items: Vec<Value>) -> (Vec<T>, usize) {
    let mut valid = Vec::with_capacity(items.len());
    let mut skipped = 0;
    for item in items {
        match serde_json::from_value::<T>(item.clone()) {
            Ok(v) => valid.push(v),
            Err(e) => {
                skipped += 1;
                tracing::warn!("Skipping invalid {} item: {} - Item: {}", label, e, item);
            }
        }
    }
    (valid, skipped)
}

/// Walks pages starting at offset 0.
///
/// Per page: an empty page ends the walk; items are validated one by one;
/// the walk ends when `policy`'s cap is met or `has_next` is `Some(false)`;
/// otherwise the offset advances by `page_size`. An error from `fetch_page`
/// is logged and ends the walk with whatever was already collected.
pub async fn collect_pages<T, F, Fut>(
    label: &str,
    page_size: u64,
    policy: StopPolicy,
    mut fetch_page: F,
) -> Collected<T>
where
    T: DeserializeOwned,
    F: FnMut(PageCursor) -> Fut,
    Fut: Future<Output = Result<Page, CongressError>>,
{
    let page_size = page_size.max(1);
    let mut cursor = PageCursor {
        offset: 0,
        page_size,
        items_collected: 0,
        total_reported: None,
    };
    let mut items: Vec<T> = Vec::new();
    let mut skipped = 0;
    let mut pages_fetched = 0;
    let mut last_request = None;

    let stop_reason = loop {
        tracing::debug!(
            "Fetching {} page: offset={}, limit={}",
            label,
            cursor.offset,
            cursor.page_size
        );
        let page = match fetch_page(cursor).await {
            Ok(page) => page,
            Err(e) => {
                tracing::error!(
                    "Error during {} pagination (offset {}): {}. Returning {} collected items.",
                    label,
                    cursor.offset,
                    e,
                    items.len()
                );
                break StopReason::FetchFailed;
            }
        };
        pages_fetched += 1;
        if page.request.is_some() {
            last_request = page.request;
        }
        if let Some(total) = page.total {
            cursor.total_reported = Some(cursor.total_reported.map_or(total, |t| t.max(total)));
        }

        if page.items.is_empty() {
            tracing::debug!("No more {} found at offset {}", label, cursor.offset);
            break StopReason::EmptyPage;
        }

        // Rejected items do not count toward the cap.
        let (valid, dropped) = validate_items::<T>(label, page.items);
        skipped += dropped;
        items.extend(valid);
        cursor.items_collected = items.len();

        if let StopPolicy::AtMost(cap) = policy {
            if items.len() >= cap {
                items.truncate(cap);
                cursor.items_collected = items.len();
                tracing::debug!("Reached cap of {} {}. Stopping pagination.", cap, label);
                break StopReason::CapReached;
            }
        }
        if page.has_next == Some(false) {
            tracing::debug!("Pagination info indicates no next page for {}", label);
            break StopReason::NoNextPage;
        }
        cursor.offset += page_size;
    };

    tracing::info!(
        "Collected {} {} over {} page(s) ({} skipped, stop: {:?})",
        items.len(),
        label,
        pages_fetched,
        skipped,
        stop_reason
    );

    Collected {
        items,
        total_reported: cursor.total_reported,
        pages_fetched,
        skipped,
        stop_reason,
        last_request,
    }
}

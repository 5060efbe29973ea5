//! Bill lookups and bill search against Congress.gov.

use congress_api::types::{
    BillActionSet, BillInfo, BillSearchResults, BillSummarySet, BillType, CosponsorSet,
    TextVersionSet,
};
use congress_api::unwrap_payload;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::CongressClient;
use crate::error::CongressError;
use crate::pagination::{collect_pages, validate_items, Page, StopPolicy};
use crate::validation::validate_search;

/// Page size for cosponsor walks; the API's maximum.
pub const COSPONSOR_PAGE_SIZE: u64 = 250;

/// Knobs for [`CongressClient::search_bills_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Items requested per upstream page.
    pub page_size: u64,
    /// Stop paging once this many valid items are held.
    pub fetch_cap: usize,
    /// Items returned to the caller.
    pub present_limit: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            page_size: 100,
            fetch_cap: 10,
            present_limit: 5,
        }
    }
}

fn bill_path(congress: u32, bill_type: BillType, number: u32) -> String {
    format!("/bill/{}/{}/{}", congress, bill_type.as_path(), number)
}

impl CongressClient {
    /// Core metadata for one bill.
    pub async fn get_bill_info(
        &self,
        congress: u32,
        bill_type: BillType,
        number: u32,
    ) -> Result<BillInfo, CongressError> {
        let path = bill_path(congress, bill_type, number);
        tracing::info!("Executing get_bill_info for {}", path);
        let envelope = self.get_envelope(&path, Vec::new()).await?;
        let call = format!("GET {}", path);
        let url = format!("{}{}", self.api.base_url(), path);

        let bill = match unwrap_payload(&envelope, "bill").payload() {
            Some(obj @ Value::Object(_)) => obj.clone(),
            _ => {
                tracing::error!("Bill info for {} is missing or not a mapping", path);
                return Err(CongressError::structure(&call, &url, "bill"));
            }
        };
        serde_json::from_value(bill).map_err(|e| {
            tracing::error!("Failed to validate bill info for {}: {}", path, e);
            CongressError::structure(&call, &url, "bill")
        })
    }

    pub async fn get_bill_summaries(
        &self,
        congress: u32,
        bill_type: BillType,
        number: u32,
    ) -> Result<BillSummarySet, CongressError> {
        let path = format!("{}/summaries", bill_path(congress, bill_type, number));
        let summaries = self.get_item_list(&path, "summaries").await?;
        Ok(BillSummarySet { summaries })
    }

    pub async fn get_bill_actions(
        &self,
        congress: u32,
        bill_type: BillType,
        number: u32,
    ) -> Result<BillActionSet, CongressError> {
        let path = format!("{}/actions", bill_path(congress, bill_type, number));
        let actions = self.get_item_list(&path, "actions").await?;
        Ok(BillActionSet { actions })
    }

    pub async fn get_bill_text_versions(
        &self,
        congress: u32,
        bill_type: BillType,
        number: u32,
    ) -> Result<TextVersionSet, CongressError> {
        let path = format!("{}/text", bill_path(congress, bill_type, number));
        let text_versions = self.get_item_list(&path, "textVersions").await?;
        Ok(TextVersionSet { text_versions })
    }

    /// Every cosponsor of a bill, walking all pages.
    ///
    /// A page that fails after retries ends the walk; the cosponsors already
    /// collected are returned rather than an error.
    pub async fn get_bill_cosponsors(
        &self,
        congress: u32,
        bill_type: BillType,
        number: u32,
    ) -> CosponsorSet {
        let path = format!("{}/cosponsors", bill_path(congress, bill_type, number));
        tracing::info!("Executing get_bill_cosponsors for {}", path);
        let path = &path;
        let collected = collect_pages(
            "cosponsors",
            COSPONSOR_PAGE_SIZE,
            StopPolicy::UntilExhausted,
            |cursor| async move {
                let params = vec![
                    ("limit".to_string(), cursor.page_size.to_string()),
                    ("offset".to_string(), cursor.offset.to_string()),
                ];
                self.get_envelope(path, params)
                    .await
                    .map(|envelope| Page::from_envelope(&envelope, "cosponsors"))
            },
        )
        .await;
        tracing::info!(
            "Collected {} cosponsors for {} over {} page(s) ({:?})",
            collected.items.len(),
            path,
            collected.pages_fetched,
            collected.stop_reason
        );
        CosponsorSet {
            cosponsors: collected.items,
        }
    }

    /// Searches bills with the default [`SearchOptions`].
    pub async fn search_bills(
        &self,
        query: &str,
        congress: Option<u32>,
    ) -> Result<BillSearchResults, CongressError> {
        self.search_bills_with(query, congress, SearchOptions::default())
            .await
    }

    /// Keyword bill search. Pages until `fetch_cap` items are held, then
    /// returns at most `present_limit` of them alongside the upstream's total.
    ///
    /// The query is sanitized first; one that is empty once control
    /// characters are stripped fails with [`CongressError::InvalidInput`]
    /// before any request is sent.
    pub async fn search_bills_with(
        &self,
        query: &str,
        congress: Option<u32>,
        options: SearchOptions,
    ) -> Result<BillSearchResults, CongressError> {
        let query = validate_search(query)?;
        let query = query.as_str();
        tracing::info!(
            "Executing search_bills: query='{}', congress={:?}. Returning max {} results.",
            query,
            congress,
            options.present_limit
        );
        let collected = collect_pages(
            "bills",
            options.page_size,
            StopPolicy::AtMost(options.fetch_cap),
            |cursor| async move {
                let mut params = vec![
                    ("query".to_string(), query.to_string()),
                    ("limit".to_string(), cursor.page_size.to_string()),
                    ("offset".to_string(), cursor.offset.to_string()),
                ];
                if let Some(c) = congress {
                    params.push(("congress".to_string(), c.to_string()));
                }
                self.get_envelope("/bill", params)
                    .await
                    .map(|envelope| Page::from_envelope(&envelope, "bills"))
            },
        )
        .await;
        let request = collected.last_request.clone();
        let (bills, pagination) = collected.present(options.present_limit);
        tracing::info!(
            "Returning {} of {} bills found for '{}'",
            pagination.returned_to_llm,
            pagination.total_found,
            query
        );
        Ok(BillSearchResults {
            bills,
            pagination,
            request,
        })
    }

    /// Single-page list under `key`; items that fail to decode are skipped.
    async fn get_item_list<T: DeserializeOwned>(
        &self,
        path: &str,
        key: &str,
    ) -> Result<Vec<T>, CongressError> {
        tracing::info!("Executing {} lookup for {}", key, path);
        let envelope = self.get_envelope(path, Vec::new()).await?;
        let raw = list_payload(&envelope, key, path);
        let (items, skipped) = validate_items(key, raw);
        if skipped > 0 {
            tracing::warn!("Skipped {} invalid {} from {}", skipped, key, path);
        }
        tracing::info!("Parsed {} {} from {}", items.len(), key, path);
        Ok(items)
    }
}

/// Items under `key`, or empty with a warning when the payload is not a list.
pub(crate) fn list_payload(envelope: &Value, key: &str, path: &str) -> Vec<Value> {
    match unwrap_payload(envelope, key).payload() {
        Some(Value::Array(items)) => items.clone(),
        Some(other) => {
            tracing::warn!(
                "Expected list for {} at {}, got {}. Returning empty set.",
                key,
                path,
                kind_of(other)
            );
            Vec::new()
        }
        None => {
            tracing::warn!("No {} found at {}. Returning empty set.", key, path);
            Vec::new()
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

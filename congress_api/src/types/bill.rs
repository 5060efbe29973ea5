//! Bill resources returned by the `/bill` endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{Chamber, Party};

/// Core bill metadata from `/bill/{congress}/{type}/{number}`.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BillInfo {
    pub congress: u32,

    /// Legislation type as reported upstream (e.g. "HR", "S").
    #[serde(rename = "type", alias = "bill_type")]
    pub legislation_type: String,

    pub number: String,

    pub title: String,

    #[serde(default)]
    pub origin_chamber: Option<Chamber>,

    #[serde(default)]
    pub latest_action: Option<Value>,

    #[serde(default)]
    pub update_date: Option<String>,
}

/// One official CRS summary.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BillSummary {
    pub text: String,

    #[serde(default)]
    pub update_date: Option<String>,

    #[serde(default)]
    pub action_date: Option<NaiveDate>,

    #[serde(default)]
    pub action_desc: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct BillSummarySet {
    pub summaries: Vec<BillSummary>,
}

/// One entry in a bill's action history.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BillAction {
    pub action_date: NaiveDate,

    pub text: String,

    #[serde(default)]
    pub action_code: Option<String>,

    /// Roll calls attached to this action, passed through untouched.
    #[serde(default)]
    pub recorded_votes: Vec<Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct BillActionSet {
    pub actions: Vec<BillAction>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Cosponsor {
    pub bioguide_id: String,

    #[serde(default)]
    pub district: Option<u32>,

    pub first_name: String,

    pub last_name: String,

    pub party: Party,

    pub state: String,

    pub sponsorship_date: NaiveDate,

    pub is_original_cosponsor: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct CosponsorSet {
    pub cosponsors: Vec<Cosponsor>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TextVersionFormat {
    pub url: String,

    /// e.g. "PDF", "Formatted Text".
    #[serde(rename = "type")]
    pub format_type: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TextVersion {
    #[serde(rename = "type")]
    pub version_type: String,

    #[serde(default)]
    pub date: Option<String>,

    pub formats: Vec<TextVersionFormat>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TextVersionSet {
    pub text_versions: Vec<TextVersion>,
}

/// A bill as listed by the `/bill` search endpoint.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BillSearchResultItem {
    pub congress: u32,

    pub number: String,

    pub title: String,

    #[serde(rename = "type", alias = "bill_type")]
    pub legislation_type: String,

    #[serde(default)]
    pub latest_action: Option<Value>,

    #[serde(default)]
    pub update_date: Option<String>,
}

/// Describes how a search result list was truncated before delivery.
///
/// `total_found` is what the upstream reported (or what was collected when it
/// reported nothing); `returned_to_llm` is how many items are in the list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SearchPagination {
    pub total_found: u64,
    pub returned_to_llm: usize,
    pub limit_applied_in_tool: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BillSearchResults {
    pub bills: Vec<BillSearchResultItem>,
    pub pagination: SearchPagination,
    #[serde(default)]
    pub request: Option<Value>,
}

//! Member records from the `/member` endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MemberInfo {
    pub bioguide_id: String,

    pub name: String,

    #[serde(default)]
    pub depiction: Option<Value>,

    #[serde(default)]
    pub party_history: Option<Vec<Value>>,

    #[serde(default)]
    pub terms: Option<Value>,

    #[serde(default)]
    pub direct_order_name: Option<String>,

    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,

    #[serde(default)]
    pub state: Option<String>,

    /// Party name as listed for the member's latest term.
    #[serde(default)]
    pub party_name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct MemberSearchResults {
    pub members: Vec<MemberInfo>,
    #[serde(default)]
    pub pagination: Option<Value>,
    #[serde(default)]
    pub request: Option<Value>,
}

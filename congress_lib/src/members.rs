//! Member search.

use congress_api::types::{Chamber, MemberInfo, MemberSearchResults};

use crate::bills::list_payload;
use crate::client::CongressClient;
use crate::error::CongressError;
use crate::pagination::validate_items;
use crate::validation::{validate_search, validate_state};

/// Upstream page size for member search. Only the first page is read.
pub const MEMBER_SEARCH_LIMIT: u32 = 20;

/// Filters for [`CongressClient::find_member`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberQuery {
    pub name: String,
    pub congress: Option<u32>,
    pub chamber: Option<Chamber>,
    pub state: Option<String>,
}

impl MemberQuery {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Query parameters, after sanitizing the name and checking the state.
    pub(crate) fn to_params(&self) -> Result<Vec<(String, String)>, CongressError> {
        let mut params = vec![
            ("q".to_string(), validate_search(&self.name)?),
            ("limit".to_string(), MEMBER_SEARCH_LIMIT.to_string()),
        ];
        if let Some(congress) = self.congress {
            params.push(("congress".to_string(), congress.to_string()));
        }
        if let Some(chamber) = self.chamber {
            params.push(("chamber".to_string(), chamber.to_string().to_lowercase()));
        }
        if let Some(state) = &self.state {
            params.push(("state".to_string(), validate_state(state)?));
        }
        Ok(params)
    }
}

impl CongressClient {
    /// Looks up members matching `query.name`. Members that fail to decode
    /// are skipped; upstream `pagination` and `request` pass through.
    pub async fn find_member(&self, query: &MemberQuery) -> Result<MemberSearchResults, CongressError> {
        let params = query.to_params()?;
        tracing::info!(
            "Executing find_member: name='{}', congress={:?}, chamber={:?}, state={:?}",
            query.name,
            query.congress,
            query.chamber,
            query.state
        );
        let envelope = self.get_envelope("/member", params).await.map_err(|e| {
            tracing::error!("Error fetching find_member for '{}': {}", query.name, e);
            e
        })?;

        let raw = list_payload(&envelope, "members", "/member");
        let (members, skipped) = validate_items::<MemberInfo>("member", raw);
        if skipped > 0 {
            tracing::warn!("Skipped {} invalid members for search '{}'", skipped, query.name);
        }
        tracing::info!("Parsed {} members for search '{}'", members.len(), query.name);
        Ok(MemberSearchResults {
            members,
            pagination: envelope.get("pagination").cloned(),
            request: envelope.get("request").cloned(),
        })
    }
}

//! One member's positions across a batch of roll calls.

use congress_api::types::Chamber;

use crate::client::CongressClient;
use crate::error::CongressError;
use crate::validation::validate_member_id;
use crate::votes::{MemberId, MemberVoteRecord, VoteRequest};

/// Parameters for [`CongressClient::list_member_vote_details`].
///
/// `member_id` is interpreted in the chamber's identifier space: a BioGuide
/// ID for the House, an LIS ID for the Senate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberVoteQuery {
    pub member_id: String,
    pub chamber: Chamber,
    pub congress: u32,
    pub roll_numbers: Vec<u32>,
    /// Required for the Senate.
    pub session: Option<u32>,
    /// Required for the House.
    pub year: Option<i32>,
}

impl MemberVoteQuery {
    /// Checks chamber requirements and builds one request per roll number.
    pub fn to_requests(&self) -> Result<(MemberId, Vec<VoteRequest>), CongressError> {
        let raw_id = validate_member_id(&self.member_id)?;
        let member = MemberId::for_chamber(self.chamber, &raw_id);
        let requests = match self.chamber {
            Chamber::House => {
                let year = self.year.ok_or_else(|| {
                    CongressError::InvalidInput("year is required for House votes".to_string())
                })?;
                self.roll_numbers
                    .iter()
                    .map(|&roll| VoteRequest::House { year, roll })
                    .collect()
            }
            Chamber::Senate => {
                let session = self.session.ok_or_else(|| {
                    CongressError::InvalidInput("session is required for Senate votes".to_string())
                })?;
                self.roll_numbers
                    .iter()
                    .map(|&number| VoteRequest::Senate {
                        congress: self.congress,
                        session,
                        number,
                    })
                    .collect()
            }
        };
        Ok((member, requests))
    }
}

impl CongressClient {
    /// How `query.member_id` voted on each requested roll call.
    ///
    /// All roll calls are fetched concurrently. Records come back in the
    /// order of `query.roll_numbers`. A roll call that fails to fetch or
    /// parse is logged and left out, as is one where the member has no
    /// position; neither is an error for the batch.
    pub async fn list_member_vote_details(
        &self,
        query: &MemberVoteQuery,
    ) -> Result<Vec<MemberVoteRecord>, CongressError> {
        tracing::info!(
            "Executing list_member_vote_details: member={}, chamber={}, congress={}, session={:?}, year={:?}, rolls={}",
            query.member_id,
            query.chamber,
            query.congress,
            query.session,
            query.year,
            query.roll_numbers.len()
        );
        if query.roll_numbers.is_empty() {
            validate_member_id(&query.member_id)?;
            tracing::warn!("list_member_vote_details called with an empty roll number list");
            return Ok(Vec::new());
        }
        let (member, requests) = query.to_requests()?;

        tracing::debug!("Gathering {} vote detail tasks", requests.len());
        let results = self.fetch_votes(&requests).await;

        let mut records = Vec::new();
        for (request, result) in requests.iter().zip(results) {
            let vote = match result {
                Ok(vote) => vote,
                Err(e) => {
                    tracing::error!("Failed to fetch/parse {} for member {}: {}", request, member, e);
                    continue;
                }
            };
            match vote.position_of(&member) {
                Some(position) => records.push(MemberVoteRecord::new(&vote, position.clone())),
                None => tracing::info!("Member {} position not found in {}", member, request),
            }
        }

        tracing::info!(
            "Found {} vote records for member {} out of {} requested",
            records.len(),
            member,
            requests.len()
        );
        Ok(records)
    }
}

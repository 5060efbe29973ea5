//! Roll-call votes: the chamber-agnostic record and the two feed normalizers.
//!
//! House and Senate documents are unrelated schemas. Each has its own
//! extractor ([`house`], [`senate`]); they share only the vocabularies
//! defined here and the party-tally aggregator.

pub mod house;
pub mod senate;
mod tally;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use congress_api::types::{Chamber, Party};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::client::CongressClient;
use crate::error::CongressError;
use crate::rate_limiter::with_retry;

pub use self::tally::tally_by_party;

/// Normalized vote cast. Chamber-specific spellings ("Aye", "Guilty", ...)
/// are folded into these four; the raw text is not kept.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VoteCast {
    Yea,
    Nay,
    Present,
    #[serde(rename = "Not Voting")]
    NotVoting,
}

impl VoteCast {
    pub const ALL: [VoteCast; 4] = [
        VoteCast::Yea,
        VoteCast::Nay,
        VoteCast::Present,
        VoteCast::NotVoting,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            VoteCast::Yea => "Yea",
            VoteCast::Nay => "Nay",
            VoteCast::Present => "Present",
            VoteCast::NotVoting => "Not Voting",
        }
    }
}

impl fmt::Display for VoteCast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A legislator identifier tagged with the namespace it belongs to.
///
/// House feeds carry BioGuide IDs, Senate feeds carry LIS IDs. The two are
/// different identifier spaces and never compare equal.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(tag = "scheme", content = "id", rename_all = "lowercase")]
pub enum MemberId {
    Bioguide(String),
    Lis(String),
}

impl MemberId {
    /// The identifier scheme a chamber's vote feed uses.
    pub fn for_chamber(chamber: Chamber, raw: &str) -> MemberId {
        match chamber {
            Chamber::House => MemberId::Bioguide(raw.trim().to_string()),
            Chamber::Senate => MemberId::Lis(raw.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MemberId::Bioguide(id) | MemberId::Lis(id) => id,
        }
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberId::Bioguide(id) => write!(f, "bioguide:{}", id),
            MemberId::Lis(id) => write!(f, "lis:{}", id),
        }
    }
}

/// One legislator's position on a roll call.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VotePosition {
    pub member_id: Option<MemberId>,
    pub name: Option<String>,
    /// `None` when the feed's party code is not one we recognize.
    pub party: Option<Party>,
    pub state: Option<String>,
    pub vote_cast: VoteCast,
}

pub type CastCounts = BTreeMap<VoteCast, u32>;
pub type PartyTally = BTreeMap<Party, CastCounts>;

/// A roll-call vote from either chamber.
///
/// `tally` comes from the feed's own totals. `party_tally` is always
/// recomputed from `positions` and may disagree with `tally`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RollCallVote {
    pub chamber: Chamber,
    pub congress: Option<u32>,
    pub session: Option<u32>,
    pub roll_number: Option<u32>,
    pub vote_date: Option<NaiveDate>,
    pub vote_question: Option<String>,
    pub vote_result: Option<String>,
    pub bill_number: Option<String>,
    pub tally: CastCounts,
    /// In document order.
    pub positions: Vec<VotePosition>,
    pub party_tally: PartyTally,
}

impl RollCallVote {
    /// True when congress, session and roll number were all present.
    pub fn is_complete(&self) -> bool {
        self.congress.is_some() && self.session.is_some() && self.roll_number.is_some()
    }

    /// First position recorded for `member`.
    pub fn position_of(&self, member: &MemberId) -> Option<&VotePosition> {
        self.positions
            .iter()
            .find(|p| p.member_id.as_ref() == Some(member))
    }
}

/// How one member voted on one roll call.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MemberVoteRecord {
    pub chamber: Chamber,
    pub congress: Option<u32>,
    pub session: Option<u32>,
    pub roll_number: Option<u32>,
    pub vote_date: Option<NaiveDate>,
    pub vote_question: Option<String>,
    pub bill_number: Option<String>,
    pub member_position: VotePosition,
}

impl MemberVoteRecord {
    pub fn new(vote: &RollCallVote, position: VotePosition) -> Self {
        Self {
            chamber: vote.chamber,
            congress: vote.congress,
            session: vote.session,
            roll_number: vote.roll_number,
            vote_date: vote.vote_date,
            vote_question: vote.vote_question.clone(),
            bill_number: vote.bill_number.clone(),
            member_position: position,
        }
    }
}

/// Identifies one roll-call document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteRequest {
    House { year: i32, roll: u32 },
    Senate { congress: u32, session: u32, number: u32 },
}

impl VoteRequest {
    pub fn chamber(&self) -> Chamber {
        match self {
            VoteRequest::House { .. } => Chamber::House,
            VoteRequest::Senate { .. } => Chamber::Senate,
        }
    }
}

impl fmt::Display for VoteRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteRequest::House { year, roll } => write!(f, "House vote {}-{}", year, roll),
            VoteRequest::Senate {
                congress,
                session,
                number,
            } => write!(f, "Senate vote {}-{}-{}", congress, session, number),
        }
    }
}

/// Digits of `raw` as an integer, ignoring every other character
/// ("2nd" -> 2). `None` when there are no digits or the value overflows.
pub(crate) fn digits_to_int(raw: &str) -> Option<u32> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    match digits.parse::<u32>() {
        Ok(n) => Some(n),
        Err(e) => {
            tracing::warn!("Could not parse int from '{}' (digits '{}'): {}", raw, digits, e);
            None
        }
    }
}

/// Trimmed text, `None` when empty.
pub(crate) fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl CongressClient {
    /// Fetches and normalizes one roll call from the chamber feed `request`
    /// names.
    pub async fn fetch_vote(&self, request: &VoteRequest) -> Result<RollCallVote, CongressError> {
        let call = request.to_string();
        let url = match *request {
            VoteRequest::House { year, roll } => self.feeds.house_vote_url(year, roll),
            VoteRequest::Senate {
                congress,
                session,
                number,
            } => self.feeds.senate_vote_url(congress, session, number),
        };
        tracing::info!("Executing {} from {}", call, url);

        let root = with_retry(&self.feed_limiter, &self.retry, &call, || {
            self.feeds.fetch_document(&url)
        })
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch or parse {} from {}: {}", call, url, e);
            e
        })?;

        let vote = match request.chamber() {
            Chamber::House => house::normalize(&root, &call, &url)?,
            Chamber::Senate => senate::normalize(&root, &call, &url)?,
        };
        tracing::info!(
            "Successfully parsed {} ({}) with {} positions",
            call,
            url,
            vote.positions.len()
        );
        Ok(vote)
    }

    /// Fetches every request concurrently. Results line up with `requests`
    /// by index regardless of completion order; one failure does not
    /// affect the others.
    ///
    /// In-flight fetches are bounded by the feed limiter's capacity.
    pub async fn fetch_votes(
        &self,
        requests: &[VoteRequest],
    ) -> Vec<Result<RollCallVote, CongressError>> {
        let permits = (self.feed_limiter.capacity().ceil() as usize).max(1);
        let semaphore = Arc::new(Semaphore::new(permits));
        let mut join_set = JoinSet::new();

        for (index, request) in requests.iter().copied().enumerate() {
            let client = self.clone();
            let sem = Arc::clone(&semaphore);
            join_set.spawn(async move {
                let _permit = sem.acquire_owned().await.ok();
                (index, client.fetch_vote(&request).await)
            });
        }

        let mut slots: Vec<Option<Result<RollCallVote, CongressError>>> =
            requests.iter().map(|_| None).collect();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, result)) => slots[index] = Some(result),
                Err(e) => tracing::error!("Vote fetch task failed: {}", e),
            }
        }

        slots
            .into_iter()
            .zip(requests)
            .map(|(slot, request)| {
                slot.unwrap_or_else(|| {
                    Err(CongressError::Task {
                        call: request.to_string(),
                        message: "fetch task aborted".to_string(),
                    })
                })
            })
            .collect()
    }

    /// House roll call `roll` of calendar year `year`.
    pub async fn get_house_vote(&self, year: i32, roll: u32) -> Result<RollCallVote, CongressError> {
        self.fetch_vote(&VoteRequest::House { year, roll }).await
    }

    /// Senate vote `number` of the given congress and session.
    pub async fn get_senate_vote(
        &self,
        congress: u32,
        session: u32,
        number: u32,
    ) -> Result<RollCallVote, CongressError> {
        self.fetch_vote(&VoteRequest::Senate {
            congress,
            session,
            number,
        })
        .await
    }
}

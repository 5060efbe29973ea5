//! Core layer for Congress data: rate-limited retrying fetches, offset
//! pagination, bill and member lookups, and House/Senate roll-call
//! normalization into one vote record.
//!
//! Wraps the `congress_api` crate with one token bucket per upstream and a
//! shared retry policy. Everything goes through [`CongressClient`].

pub mod bills;
pub mod client;
pub mod config;
pub mod error;
pub mod member_votes;
pub mod members;
pub mod pagination;
pub mod rate_limiter;
pub mod validation;
pub mod votes;

pub use congress_api;
pub use congress_api::types;

pub use bills::SearchOptions;
pub use client::CongressClient;
pub use config::Config;
pub use error::CongressError;
pub use member_votes::MemberVoteQuery;
pub use members::MemberQuery;
pub use pagination::{collect_pages, Collected, Page, PageCursor, StopPolicy, StopReason};
pub use rate_limiter::{with_retry, RequestTracker, RetryPolicy, TokenBucket, TrackerSummary};
pub use votes::{
    tally_by_party, CastCounts, MemberId, MemberVoteRecord, PartyTally, RollCallVote, VoteCast,
    VotePosition, VoteRequest,
};

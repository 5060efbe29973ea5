//! House Clerk roll-call documents.
//!
//! Layout: `<rollcall-vote>` holding `<vote-metadata>` (identifiers,
//! question, result, totals) and `<vote-data>` (one `<recorded-vote>` per
//! legislator).

use chrono::NaiveDate;
use congress_api::types::{Chamber, Party};
use congress_api::XmlElement;

use super::{
    digits_to_int, non_empty, tally_by_party, CastCounts, MemberId, RollCallVote, VoteCast,
    VotePosition,
};
use crate::error::CongressError;

const ACTION_DATE_FORMAT: &str = "%d-%b-%Y";

/// Folds the Clerk's vote spellings into [`VoteCast`]. Blank or
/// unrecognized text is treated as not voting.
pub fn house_vote_cast(raw: &str) -> VoteCast {
    match raw.trim() {
        "Aye" | "Yea" => VoteCast::Yea,
        "No" | "Nay" => VoteCast::Nay,
        "Present" => VoteCast::Present,
        _ => VoteCast::NotVoting,
    }
}

/// Normalizes a parsed House document fetched from `url`.
///
/// Missing `<vote-metadata>` or `<vote-data>` is a structural error.
/// Everything below them is best-effort: absent fields become `None` and
/// unusable `<recorded-vote>` entries are skipped.
pub fn normalize(root: &XmlElement, call: &str, url: &str) -> Result<RollCallVote, CongressError> {
    let meta = root.descendant("vote-metadata").ok_or_else(|| {
        tracing::error!("Missing <vote-metadata> section in {}", url);
        CongressError::structure(call, url, "<vote-metadata>")
    })?;
    let data = root.descendant("vote-data").ok_or_else(|| {
        tracing::error!("Missing <vote-data> section in {}", url);
        CongressError::structure(call, url, "<vote-data>")
    })?;

    let congress = meta.child_text("congress").and_then(|s| digits_to_int(&s));
    let session = meta.child_text("session").and_then(|s| digits_to_int(&s));
    let roll_number = meta.child_text("rollcall-num").and_then(|s| digits_to_int(&s));
    let vote_date = non_empty(meta.child_text("action-date")).and_then(|raw| {
        match NaiveDate::parse_from_str(&raw, ACTION_DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => {
                tracing::warn!("Could not parse House action-date '{}' for {}", raw, url);
                None
            }
        }
    });

    let tally = match meta
        .child("vote-totals")
        .and_then(|totals| totals.child("totals-by-vote"))
    {
        Some(totals) => totals_by_vote(totals),
        None => {
            tracing::warn!("Could not find <vote-totals>/<totals-by-vote> in {}", url);
            CastCounts::new()
        }
    };

    let mut positions = Vec::new();
    let mut skipped = 0usize;
    for record in data.children("recorded-vote") {
        match recorded_vote(record) {
            Some(position) => positions.push(position),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        tracing::warn!("Skipped {} unusable <recorded-vote> entries in {}", skipped, url);
    }
    if positions.is_empty() {
        tracing::warn!("No <recorded-vote> positions found under <vote-data> in {}", url);
    }

    let party_tally = tally_by_party(&positions);
    Ok(RollCallVote {
        chamber: Chamber::House,
        congress,
        session,
        roll_number,
        vote_date,
        vote_question: non_empty(meta.child_text("vote-question")),
        vote_result: non_empty(meta.child_text("vote-result")),
        bill_number: non_empty(meta.child_text("legis-num")),
        tally,
        positions,
        party_tally,
    })
}

/// Feed totals. A total that is absent or unparseable is left out of the
/// map rather than reported as zero.
fn totals_by_vote(totals: &XmlElement) -> CastCounts {
    let fields = [
        ("yea-total", VoteCast::Yea),
        ("nay-total", VoteCast::Nay),
        ("present-total", VoteCast::Present),
        ("not-voting-total", VoteCast::NotVoting),
    ];
    fields
        .iter()
        .filter_map(|(field, cast)| {
            let count = totals.child_text(field).and_then(|s| digits_to_int(&s))?;
            Some((*cast, count))
        })
        .collect()
}

fn recorded_vote(record: &XmlElement) -> Option<VotePosition> {
    let Some(legislator) = record.child("legislator") else {
        tracing::warn!("Skipping <recorded-vote> without a <legislator> element");
        return None;
    };
    let member_id = legislator
        .attr("name-id")
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| MemberId::for_chamber(Chamber::House, id));
    let name = non_empty(Some(legislator.text()));
    if member_id.is_none() && name.is_none() {
        tracing::warn!("Skipping <recorded-vote> with neither name-id nor name");
        return None;
    }
    if member_id.is_none() {
        if let Some(n) = &name {
            if !n.to_ascii_uppercase().contains("VACANT") {
                tracing::debug!("Missing name-id for legislator '{}'", n);
            }
        }
    }

    let party_raw = legislator.attr("party").unwrap_or_default();
    let party = Party::from_code(party_raw);
    if party.is_none() && !party_raw.trim().is_empty() {
        tracing::debug!("Unrecognized House party code '{}'", party_raw);
    }

    Some(VotePosition {
        member_id,
        name,
        party,
        state: non_empty(legislator.attr("state").map(str::to_string)),
        vote_cast: house_vote_cast(&record.child_text("vote").unwrap_or_default()),
    })
}

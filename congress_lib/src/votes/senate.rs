//! Senate LIS roll-call documents.
//!
//! Layout: `<roll_call_vote>` with identifiers and question text as direct
//! children, a `<count>` block, an optional `<document>` naming the measure,
//! and `<members>` holding one `<member>` per senator.

use chrono::NaiveDateTime;
use congress_api::types::{Chamber, Party};
use congress_api::XmlElement;

use super::{
    digits_to_int, non_empty, tally_by_party, CastCounts, MemberId, RollCallVote, VoteCast,
    VotePosition,
};
use crate::error::CongressError;

const VOTE_DATE_FORMAT: &str = "%B %d, %Y, %I:%M %p";

/// Folds LIS vote spellings into [`VoteCast`]. Impeachment trials record
/// "Guilty"/"Not Guilty".
pub fn senate_vote_cast(raw: &str) -> VoteCast {
    match raw.trim() {
        "Yea" | "Guilty" => VoteCast::Yea,
        "Nay" | "Not Guilty" => VoteCast::Nay,
        "Present" => VoteCast::Present,
        _ => VoteCast::NotVoting,
    }
}

/// Normalizes a parsed Senate document fetched from `url`.
///
/// A document without `<members>` is a structural error. A missing
/// `<count>` yields an all-zero tally.
pub fn normalize(root: &XmlElement, call: &str, url: &str) -> Result<RollCallVote, CongressError> {
    let members = root.child("members").ok_or_else(|| {
        tracing::error!("Missing <members> section in {}", url);
        CongressError::structure(call, url, "<members>")
    })?;

    let vote_date = non_empty(root.child_text("vote_date")).and_then(|raw| {
        match NaiveDateTime::parse_from_str(&raw, VOTE_DATE_FORMAT) {
            Ok(dt) => Some(dt.date()),
            Err(_) => {
                tracing::warn!("Could not parse Senate vote date '{}' for {}", raw, url);
                None
            }
        }
    });

    let tally = match root.child("count") {
        Some(count) => counts(count),
        None => {
            tracing::warn!("Could not find <count> in {}; tally is zero", url);
            VoteCast::ALL.iter().map(|c| (*c, 0)).collect()
        }
    };

    let mut positions = Vec::new();
    let mut skipped = 0usize;
    for member in members.children("member") {
        match member_position(member) {
            Some(position) => positions.push(position),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        tracing::warn!("Skipped {} unusable <member> entries in {}", skipped, url);
    }
    tracing::debug!("Processed {} member positions from {}", positions.len(), url);

    let party_tally = tally_by_party(&positions);
    Ok(RollCallVote {
        chamber: Chamber::Senate,
        congress: root.child_text("congress").and_then(|s| digits_to_int(&s)),
        session: root.child_text("session").and_then(|s| digits_to_int(&s)),
        roll_number: root.child_text("vote_number").and_then(|s| digits_to_int(&s)),
        vote_date,
        vote_question: non_empty(root.child_text("vote_question_text"))
            .or_else(|| non_empty(root.child_text("question"))),
        vote_result: non_empty(root.child_text("vote_result_text"))
            .or_else(|| non_empty(root.child_text("vote_result"))),
        bill_number: root.child("document").and_then(bill_number),
        tally,
        positions,
        party_tally,
    })
}

/// Feed counts. Each missing or unparseable count is zero.
fn counts(count: &XmlElement) -> CastCounts {
    let fields = [
        ("yeas", VoteCast::Yea),
        ("nays", VoteCast::Nay),
        ("present", VoteCast::Present),
        ("absent", VoteCast::NotVoting),
    ];
    fields
        .iter()
        .map(|(field, cast)| {
            let n = count
                .child_text(field)
                .and_then(|s| digits_to_int(&s))
                .unwrap_or(0);
            (*cast, n)
        })
        .collect()
}

/// `document_name`, else `document_type document_number`, with
/// " (Congress N)" appended when `document_congress` is set.
fn bill_number(document: &XmlElement) -> Option<String> {
    let base = non_empty(document.child_text("document_name")).or_else(|| {
        let doc_type = non_empty(document.child_text("document_type"))?;
        let doc_num = non_empty(document.child_text("document_number"))?;
        Some(format!("{} {}", doc_type, doc_num))
    })?;
    match non_empty(document.child_text("document_congress")) {
        Some(congress) => Some(format!("{} (Congress {})", base, congress)),
        None => Some(base),
    }
}

fn member_position(member: &XmlElement) -> Option<VotePosition> {
    let member_id = non_empty(member.child_text("lis_member_id"))
        .map(|id| MemberId::for_chamber(Chamber::Senate, &id));
    let name = non_empty(member.child_text("member_full")).or_else(|| {
        let first = member.child_text("first_name").unwrap_or_default();
        let last = member.child_text("last_name").unwrap_or_default();
        non_empty(Some(format!("{} {}", first.trim(), last.trim())))
    });
    if member_id.is_none() && name.is_none() {
        tracing::warn!("Skipping <member> with neither lis_member_id nor name");
        return None;
    }
    if member_id.is_none() {
        if let Some(n) = &name {
            if !n.to_ascii_uppercase().contains("VACANT") {
                tracing::debug!("Missing LIS member ID for Senator '{}'", n);
            }
        }
    }

    let party_raw = member.child_text("party").unwrap_or_default();
    let party = Party::from_code(&party_raw);
    if party.is_none() && !party_raw.trim().is_empty() {
        tracing::debug!("Unrecognized Senate party code '{}'", party_raw);
    }

    Some(VotePosition {
        member_id,
        name,
        party,
        state: non_empty(member.child_text("state")),
        vote_cast: senate_vote_cast(&member.child_text("vote_cast").unwrap_or_default()),
    })
}

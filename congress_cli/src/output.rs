use congress_lib::types::{BillSearchResultItem, Cosponsor, MemberInfo};
use congress_lib::{MemberVoteRecord, PartyTally, TrackerSummary, VoteCast, VotePosition};
use serde::Serialize;
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Tabled, Serialize)]
struct BillRow {
    #[tabled(rename = "Congress")]
    congress: u32,
    #[tabled(rename = "Bill")]
    bill: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Latest Action")]
    latest_action: String,
}

#[derive(Tabled, Serialize)]
struct CosponsorRow {
    #[tabled(rename = "BioGuide")]
    bioguide_id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Party")]
    party: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Since")]
    since: String,
    #[tabled(rename = "Original")]
    original: String,
}

#[derive(Tabled, Serialize)]
struct MemberRow {
    #[tabled(rename = "BioGuide")]
    bioguide_id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Party")]
    party: String,
    #[tabled(rename = "State")]
    state: String,
}

#[derive(Tabled, Serialize)]
struct PositionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Party")]
    party: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Vote")]
    vote: String,
}

#[derive(Tabled, Serialize)]
struct TallyRow {
    #[tabled(rename = "Party")]
    party: String,
    #[tabled(rename = "Yea")]
    yea: u32,
    #[tabled(rename = "Nay")]
    nay: u32,
    #[tabled(rename = "Present")]
    present: u32,
    #[tabled(rename = "Not Voting")]
    not_voting: u32,
}

#[derive(Tabled, Serialize)]
struct MemberVoteRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Roll")]
    roll: String,
    #[tabled(rename = "Question")]
    question: String,
    #[tabled(rename = "Bill")]
    bill: String,
    #[tabled(rename = "Vote")]
    vote: String,
}

// -- Row builders --

fn opt(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

fn build_bill_rows(bills: &[BillSearchResultItem]) -> Vec<BillRow> {
    bills
        .iter()
        .map(|b| BillRow {
            congress: b.congress,
            bill: format!("{} {}", b.legislation_type, b.number),
            title: b.title.clone(),
            latest_action: b
                .latest_action
                .as_ref()
                .and_then(|a| a.get("text"))
                .and_then(|t| t.as_str())
                .unwrap_or("-")
                .to_string(),
        })
        .collect()
}

fn build_cosponsor_rows(cosponsors: &[Cosponsor]) -> Vec<CosponsorRow> {
    cosponsors
        .iter()
        .map(|c| CosponsorRow {
            bioguide_id: c.bioguide_id.clone(),
            name: format!("{} {}", c.first_name, c.last_name),
            party: c.party.to_string(),
            state: c.state.clone(),
            since: c.sponsorship_date.to_string(),
            original: if c.is_original_cosponsor { "yes" } else { "no" }.to_string(),
        })
        .collect()
}

fn build_member_rows(members: &[MemberInfo]) -> Vec<MemberRow> {
    members
        .iter()
        .map(|m| MemberRow {
            bioguide_id: m.bioguide_id.clone(),
            name: m.name.clone(),
            party: opt(m.party_name.as_deref()),
            state: opt(m.state.as_deref()),
        })
        .collect()
}

fn build_position_rows(positions: &[VotePosition]) -> Vec<PositionRow> {
    positions
        .iter()
        .map(|p| PositionRow {
            id: opt(p.member_id.as_ref().map(|id| id.as_str())),
            name: opt(p.name.as_deref()),
            party: p.party.map(|party| party.to_string()).unwrap_or_else(|| "-".to_string()),
            state: opt(p.state.as_deref()),
            vote: p.vote_cast.to_string(),
        })
        .collect()
}

fn build_tally_rows(tally: &PartyTally) -> Vec<TallyRow> {
    tally
        .iter()
        .map(|(party, counts)| {
            let n = |cast: VoteCast| counts.get(&cast).copied().unwrap_or(0);
            TallyRow {
                party: party.to_string(),
                yea: n(VoteCast::Yea),
                nay: n(VoteCast::Nay),
                present: n(VoteCast::Present),
                not_voting: n(VoteCast::NotVoting),
            }
        })
        .collect()
}

fn build_member_vote_rows(records: &[MemberVoteRecord]) -> Vec<MemberVoteRow> {
    records
        .iter()
        .map(|r| MemberVoteRow {
            date: r.vote_date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string()),
            roll: r.roll_number.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string()),
            question: opt(r.vote_question.as_deref()),
            bill: opt(r.bill_number.as_deref()),
            vote: r.member_position.vote_cast.to_string(),
        })
        .collect()
}

// -- Table output --

pub fn print_bill_search_table(bills: &[BillSearchResultItem]) {
    println!("{}", Table::new(build_bill_rows(bills)));
}

pub fn print_cosponsors_table(cosponsors: &[Cosponsor]) {
    println!("{}", Table::new(build_cosponsor_rows(cosponsors)));
}

pub fn print_members_table(members: &[MemberInfo]) {
    println!("{}", Table::new(build_member_rows(members)));
}

pub fn print_positions_table(positions: &[VotePosition]) {
    println!("{}", Table::new(build_position_rows(positions)));
}

pub fn print_party_tally_table(tally: &PartyTally) {
    println!("{}", Table::new(build_tally_rows(tally)));
}

pub fn print_member_votes_table(records: &[MemberVoteRecord]) {
    println!("{}", Table::new(build_member_vote_rows(records)));
}

pub fn print_stats(label: &str, stats: &TrackerSummary) {
    eprintln!(
        "{}: {} attempts ({} ok, {} retried, {} failed calls), {:.1}s backoff",
        label,
        stats.attempts,
        stats.successes,
        stats.retries,
        stats.failed_calls,
        stats.backoff_secs
    );
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use congress_lib::types::Party;
    use congress_lib::{CastCounts, MemberId};

    fn position(id: Option<&str>, party: Option<Party>, cast: VoteCast) -> VotePosition {
        VotePosition {
            member_id: id.map(|s| MemberId::Bioguide(s.to_string())),
            name: Some("Adams".to_string()),
            party,
            state: None,
            vote_cast: cast,
        }
    }

    #[test]
    fn tally_rows_fill_missing_casts_with_zero() {
        let mut tally = PartyTally::new();
        let mut d = CastCounts::new();
        d.insert(VoteCast::Yea, 3);
        tally.insert(Party::Democrat, d);
        let rows = build_tally_rows(&tally);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].party, "D");
        assert_eq!((rows[0].yea, rows[0].nay, rows[0].not_voting), (3, 0, 0));
    }

    #[test]
    fn position_rows_show_placeholders() {
        let rows = build_position_rows(&[position(None, None, VoteCast::NotVoting)]);
        assert_eq!(rows[0].id, "-");
        assert_eq!(rows[0].party, "-");
        assert_eq!(rows[0].state, "-");
        assert_eq!(rows[0].vote, "Not Voting");
    }

    #[test]
    fn position_table_renders_headers() {
        let rows = build_position_rows(&[position(Some("A000370"), Some(Party::Democrat), VoteCast::Yea)]);
        let rendered = Table::new(rows).to_string();
        assert!(rendered.contains("Vote"));
        assert!(rendered.contains("A000370"));
        assert!(rendered.contains("Yea"));
    }
}

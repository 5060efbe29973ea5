use anyhow::{Context, Result};
use clap::Args;
use congress_lib::types::Chamber;
use congress_lib::validation;
use congress_lib::{CongressClient, MemberVoteQuery};

use crate::output::{
    print_json, print_member_votes_table, print_party_tally_table, print_positions_table,
    OutputFormat,
};

#[derive(Args)]
pub struct VoteArgs {
    /// Chamber: house or senate
    #[arg(long)]
    pub chamber: String,

    /// Roll-call number (House) or vote number (Senate)
    #[arg(long)]
    pub roll: u32,

    /// Calendar year (House only)
    #[arg(long)]
    pub year: Option<i32>,

    /// Congress number (Senate only)
    #[arg(long)]
    pub congress: Option<u32>,

    /// Session number (Senate only)
    #[arg(long)]
    pub session: Option<u32>,

    /// Only print the per-party breakdown
    #[arg(long)]
    pub tally_only: bool,
}

#[derive(Args)]
pub struct MemberVotesArgs {
    /// BioGuide ID (House) or LIS ID (Senate)
    #[arg(long)]
    pub member: String,

    /// Chamber: house or senate
    #[arg(long)]
    pub chamber: String,

    /// Congress number
    #[arg(long)]
    pub congress: u32,

    /// Comma-separated roll-call numbers
    #[arg(long, value_delimiter = ',')]
    pub rolls: Vec<u32>,

    /// Session number (required for Senate)
    #[arg(long)]
    pub session: Option<u32>,

    /// Calendar year (required for House)
    #[arg(long)]
    pub year: Option<i32>,
}

pub async fn run_vote(args: &VoteArgs, client: &CongressClient, format: &OutputFormat) -> Result<()> {
    let vote = match validation::validate_chamber(&args.chamber)? {
        Chamber::House => {
            let year = args.year.context("--year is required for House votes")?;
            client.get_house_vote(year, args.roll).await?
        }
        Chamber::Senate => {
            let congress = args.congress.context("--congress is required for Senate votes")?;
            let session = args.session.context("--session is required for Senate votes")?;
            client.get_senate_vote(congress, session, args.roll).await?
        }
    };

    eprintln!(
        "{} vote {}: {} ({})",
        vote.chamber,
        vote.roll_number.map(|n| n.to_string()).unwrap_or_else(|| "?".to_string()),
        vote.vote_question.as_deref().unwrap_or("-"),
        vote.vote_result.as_deref().unwrap_or("-")
    );

    match format {
        OutputFormat::Json if args.tally_only => print_json(&vote.party_tally),
        OutputFormat::Json => print_json(&vote),
        OutputFormat::Table => {
            print_party_tally_table(&vote.party_tally);
            if !args.tally_only {
                print_positions_table(&vote.positions);
            }
        }
    }
    Ok(())
}

pub async fn run_member_votes(
    args: &MemberVotesArgs,
    client: &CongressClient,
    format: &OutputFormat,
) -> Result<()> {
    let query = MemberVoteQuery {
        member_id: args.member.clone(),
        chamber: validation::validate_chamber(&args.chamber)?,
        congress: args.congress,
        roll_numbers: args.rolls.clone(),
        session: args.session,
        year: args.year,
    };

    let records = client.list_member_vote_details(&query).await?;
    eprintln!(
        "Found {} of {} requested votes for {}",
        records.len(),
        args.rolls.len(),
        args.member
    );

    match format {
        OutputFormat::Table => print_member_votes_table(&records),
        OutputFormat::Json => print_json(&records),
    }
    Ok(())
}

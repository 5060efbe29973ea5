use anyhow::Result;
use clap::Args;
use congress_lib::validation;
use congress_lib::{CongressClient, MemberQuery};

use crate::output::{print_json, print_members_table, OutputFormat};

#[derive(Args)]
pub struct MembersArgs {
    /// Member name to search for
    pub name: String,

    /// Restrict to one Congress
    #[arg(long)]
    pub congress: Option<u32>,

    /// Filter by chamber: house or senate
    #[arg(long)]
    pub chamber: Option<String>,

    /// Filter by US state code (e.g. CA, TX, NY)
    #[arg(long)]
    pub state: Option<String>,
}

pub async fn run(args: &MembersArgs, client: &CongressClient, format: &OutputFormat) -> Result<()> {
    let chamber = match args.chamber.as_deref() {
        Some(c) => Some(validation::validate_chamber(c)?),
        None => None,
    };
    let query = MemberQuery {
        name: args.name.clone(),
        congress: args.congress,
        chamber,
        state: args.state.clone(),
    };

    let results = client.find_member(&query).await?;
    eprintln!("{} members matched '{}'", results.members.len(), args.name);

    match format {
        OutputFormat::Table => print_members_table(&results.members),
        OutputFormat::Json => print_json(&results),
    }
    Ok(())
}

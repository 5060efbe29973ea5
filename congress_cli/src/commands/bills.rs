use anyhow::{bail, Result};
use clap::Args;
use congress_lib::validation;
use congress_lib::CongressClient;

use crate::output::{print_bill_search_table, print_cosponsors_table, print_json, OutputFormat};

#[derive(Args)]
pub struct BillArgs {
    /// Congress number (e.g. 118)
    #[arg(long)]
    pub congress: u32,

    /// Bill type: hr, s, hjres, sjres, hconres, sconres, hres, sres
    #[arg(long = "type")]
    pub bill_type: String,

    /// Bill number
    #[arg(long)]
    pub number: u32,

    /// What to show: info, summaries, actions, text, cosponsors
    #[arg(long, default_value = "info")]
    pub show: String,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Search terms
    pub query: String,

    /// Restrict to one Congress
    #[arg(long)]
    pub congress: Option<u32>,
}

pub async fn run_bill(args: &BillArgs, client: &CongressClient, format: &OutputFormat) -> Result<()> {
    let bill_type = validation::validate_bill_type(&args.bill_type)?;
    let (congress, number) = (args.congress, args.number);

    match args.show.as_str() {
        "info" => print_json(&client.get_bill_info(congress, bill_type, number).await?),
        "summaries" => print_json(&client.get_bill_summaries(congress, bill_type, number).await?),
        "actions" => print_json(&client.get_bill_actions(congress, bill_type, number).await?),
        "text" => print_json(&client.get_bill_text_versions(congress, bill_type, number).await?),
        "cosponsors" => {
            let set = client.get_bill_cosponsors(congress, bill_type, number).await;
            eprintln!("{} cosponsors", set.cosponsors.len());
            match format {
                OutputFormat::Table => print_cosponsors_table(&set.cosponsors),
                OutputFormat::Json => print_json(&set),
            }
        }
        other => bail!(
            "unknown --show value '{}'. Valid values: info, summaries, actions, text, cosponsors",
            other
        ),
    }
    Ok(())
}

pub async fn run_search(args: &SearchArgs, client: &CongressClient, format: &OutputFormat) -> Result<()> {
    let results = client.search_bills(&args.query, args.congress).await?;

    eprintln!(
        "Showing {} of {} bills found",
        results.pagination.returned_to_llm, results.pagination.total_found
    );

    match format {
        OutputFormat::Table => print_bill_search_table(&results.bills),
        OutputFormat::Json => print_json(&results),
    }
    Ok(())
}

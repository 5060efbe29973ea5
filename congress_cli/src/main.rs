mod commands;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use congress_lib::{Config, CongressClient};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "congress")]
#[command(about = "Query bills, members and roll-call votes from Congress.gov and the chamber vote feeds")]
struct Cli {
    /// Output format: table or json
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// Print limiter request counters to stderr when done
    #[arg(long, global = true)]
    stats: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up one bill (info, summaries, actions, text, cosponsors)
    Bill(commands::bills::BillArgs),
    /// Search bills by keyword
    Search(commands::bills::SearchArgs),
    /// Find members by name
    Members(commands::members::MembersArgs),
    /// Show one House or Senate roll-call vote
    Vote(commands::votes::VoteArgs),
    /// Show how one member voted across several roll calls
    MemberVotes(commands::votes::MemberVotesArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn,congress_lib=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        _ => OutputFormat::Table,
    };

    let config = Config::from_env().context("failed to load configuration")?;
    let client = CongressClient::from_config(&config)?;

    match &cli.command {
        Commands::Bill(args) => commands::bills::run_bill(args, &client, &format).await?,
        Commands::Search(args) => commands::bills::run_search(args, &client, &format).await?,
        Commands::Members(args) => commands::members::run(args, &client, &format).await?,
        Commands::Vote(args) => commands::votes::run_vote(args, &client, &format).await?,
        Commands::MemberVotes(args) => {
            commands::votes::run_member_votes(args, &client, &format).await?
        }
    }

    if cli.stats {
        output::print_stats("Congress.gov", &client.api_stats());
        output::print_stats("Vote feeds", &client.feed_stats());
    }

    Ok(())
}

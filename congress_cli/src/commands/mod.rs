//! CLI subcommand implementations.

pub mod bills;
pub mod members;
pub mod votes;

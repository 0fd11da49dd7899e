//! CLI argument definitions using clap derive macros.

use clap::Parser;

use spendpull_core::DEFAULT_MAX_RETRIES;

/// Pull, flatten, and export USAspending contract transaction records.
///
/// Spendpull pages through the spending-by-transaction search endpoint for a
/// fixed set of NAICS categories and writes one deduplicated CSV for the
/// downstream analysis stage.
#[derive(Parser, Debug)]
#[command(name = "spendpull")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Maximum fetch attempts per page request (1-10)
    #[arg(short = 'r', long, default_value_t = DEFAULT_MAX_RETRIES as u8, value_parser = clap::value_parser!(u8).range(1..=10))]
    pub max_retries: u8,
}

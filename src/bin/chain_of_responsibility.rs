//! Chain of Responsibility: feeds a list of requests through
//! Monkey > Squirrel > Dog, then through the Squirrel > Dog subchain.
//!
//! Run with: cargo run --bin chain_of_responsibility

use std::process;

use colored::Colorize;
use design_patterns::{catalog, logging, PatternsConfig, Result};

fn run() -> Result<()> {
    let config = PatternsConfig::load()?;
    logging::init(&config.log_level);

    for line in catalog::chain_transcript(&config.chain)? {
        println!("{line}");
    }
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e}", "error:".red().bold());
        process::exit(1);
    }
}

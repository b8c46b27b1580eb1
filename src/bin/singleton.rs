//! Singleton: two threads race for first access to the process-wide instance
//! with different seeds. Both must print the same value.
//!
//! Run with: cargo run --bin singleton

use std::process;

use colored::Colorize;
use design_patterns::creational::singleton;
use design_patterns::{logging, PatternsConfig, Result};

fn run() -> Result<()> {
    let config = PatternsConfig::load()?;
    logging::init(&config.log_level);

    let seeds = &config.singleton.seeds;
    for line in singleton::client_code(seeds, config.singleton.delay())? {
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

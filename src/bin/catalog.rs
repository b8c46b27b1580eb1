//! Runs the pattern demos by name, or all of them when no name is given.
//!
//! Run with: cargo run --bin catalog -- [builder|abstract-factory|prototype|
//! singleton|adapter|decorator|facade|chain]...

use std::env;
use std::process;

use colored::Colorize;
use design_patterns::catalog::{self, Demo, DEMOS};
use design_patterns::{logging, PatternsConfig, Result};

fn selected(args: &[String]) -> Result<Vec<&'static Demo>> {
    if args.is_empty() {
        return Ok(DEMOS.iter().collect());
    }
    args.iter().map(|name| catalog::find(name)).collect()
}

fn run() -> Result<()> {
    let config = PatternsConfig::load()?;
    logging::init(&config.log_level);

    let args: Vec<String> = env::args().skip(1).collect();
    let demos = selected(&args)?;

    for (i, demo) in demos.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}", format!("=== {} ===", demo.title).bold());
        for line in demo.run(&config)? {
            println!("{line}");
        }
    }
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e}", "error:".red().bold());
        process::exit(1);
    }
}

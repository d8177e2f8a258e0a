//! CLI entry point for the CVD simulation and classification toolkit

use clap::Parser;
use dermalens::io::cli::Cli;

fn main() -> dermalens::Result<()> {
    let cli = Cli::parse();
    cli.run()
}

use anyhow::Result;
use clap::Parser;
use filescout::cli::Cli;

fn main() -> Result<()> {
    env_logger::init();
    Cli::parse().run()
}

use anyhow::Result;
use clap::Parser;
use tallybook::cli::Cli;
use tallybook::logging::setup_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);
    cli.run().await
}

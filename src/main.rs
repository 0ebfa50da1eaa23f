use clap::Parser;
use nexus_mentorship::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::Migrate { revert } => cli::migrate::run(revert).await,
    }
}

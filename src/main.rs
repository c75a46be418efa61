use clap::Parser;
use homeopathika_lookup::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Lookup(args) => cli::lookup::run(args).await,
        Command::Compare(args) => cli::compare::run(args).await,
        Command::Highlight(args) => cli::highlight::run(args).await,
        Command::Sweep => cli::sweep::run().await,
    }
}

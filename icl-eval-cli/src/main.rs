use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod config;
mod context;
mod output;

use cli::{Cli, Commands};
use context::Context;

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "icl_eval=debug"
    } else {
        "icl_eval=info"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = Context::new(&cli)?;

    match cli.command {
        Commands::Prompt(args) => commands::prompt::execute(&ctx, args).await,
        Commands::Score(args) => commands::score::execute(&ctx, args).await,
        Commands::Compare(args) => commands::compare::execute(&ctx, args).await,
        Commands::Scaling(args) => commands::sweeps::scaling(&ctx, args).await,
        Commands::Styles(args) => commands::sweeps::styles(&ctx, args).await,
        Commands::Session(args) => commands::session::execute(&ctx, args).await,
    }
}

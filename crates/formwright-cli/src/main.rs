//! formwright: command-line views over the form builder.

mod cli;
mod commands;
mod formatter;

use std::process;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.global.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match cli.command {
        Commands::List => commands::list::execute(&cli.global),
        Commands::Create => commands::create::execute(&cli.global),
        Commands::Edit(args) => commands::edit::execute(args, &cli.global),
        Commands::Session(args) => commands::session::execute(args, &cli.global).await,
        Commands::Preview(args) => commands::preview::execute(args, &cli.global),
        Commands::Submit(args) => commands::submit::execute(args, &cli.global),
        Commands::Schema => commands::schema::execute(),
    };

    if let Err(error) = result {
        eprintln!("Error: {error:#}");
        process::exit(1);
    }
}

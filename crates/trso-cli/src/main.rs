//! trso CLI - applies SQL migration files to SQLite, DuckDB, or libSQL databases

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;
mod context;
mod logging;

use cli::{Cli, Commands, UpArgs};
use commands::{common, new, status, up};

#[tokio::main]
async fn main() -> ExitCode {
    // Variables already set in the environment take precedence over .env
    let _ = dotenvy::dotenv();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    logging::init(cli.global.verbose);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<common::ExitCode>() {
            Some(code) => ExitCode::from(code.0),
            None => {
                eprintln!("Error: {err:#}");
                ExitCode::from(1)
            }
        },
    }
}

async fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        None => up::execute(&UpArgs::default(), &cli.global).await,
        Some(Commands::Up(args)) => up::execute(args, &cli.global).await,
        Some(Commands::Status) => status::execute(&cli.global).await,
        Some(Commands::New(args)) => new::execute(args, &cli.global).await,
    }
}

mod analytics;
mod cli;
mod db;
mod error;
mod fmt;
mod models;
mod settings;
mod store;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{CategoriesCommands, Cli, Commands, TxCommands, UsersCommands};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Users { command } => match command {
            UsersCommands::Add { name } => cli::users::add(&name),
            UsersCommands::List => cli::users::list(),
        },
        Commands::Categories { command } => match command {
            CategoriesCommands::Add { name, kind, user } => {
                cli::categories::add(&name, &kind, user.as_deref())
            }
            CategoriesCommands::List { user } => cli::categories::list(user.as_deref()),
        },
        Commands::Tx { command } => match command {
            TxCommands::Add {
                user,
                title,
                amount,
                kind,
                category,
                date,
            } => cli::tx::add(&user, &title, amount, &kind, &category, date.as_deref()),
            TxCommands::List { user, from, to } => {
                cli::tx::list(&user, from.as_deref(), to.as_deref())
            }
        },
        Commands::Summary { user, from, to, json } => {
            cli::analytics::summary(&user, from.as_deref(), to.as_deref(), json)
        }
        Commands::Breakdown { user, kind, from, to, json } => {
            cli::analytics::breakdown(&user, &kind, from.as_deref(), to.as_deref(), json)
        }
        Commands::Trends { user, months, json } => cli::analytics::trends(&user, months, json),
        Commands::Anomalies { user, json } => cli::analytics::anomalies(&user, json),
        Commands::Insights { user, json } => cli::analytics::insights(&user, json),
        Commands::Demo => cli::demo::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

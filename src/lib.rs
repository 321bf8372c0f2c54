pub mod cli;
pub mod clients;
pub mod config;
pub mod constants;
pub mod db;
pub mod entities;
pub mod models;
pub mod services;
pub mod viewer;

use clap::Parser;
use tracing_subscriber::EnvFilter;

pub use config::Config;

use cli::{Cli, Commands};

pub async fn run() -> anyhow::Result<()> {
    let config = Config::load()?;
    config.validate()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => cli::cmd_init(),
        Commands::Auth { token } => cli::cmd_auth(&config, &token),
        Commands::Search { query } => cli::cmd_search(&config, &query.join(" ")).await,
        Commands::Add { query } => cli::cmd_add(&config, &query.join(" ")).await,
        Commands::Remove { id } => cli::cmd_remove(&config, &id).await,
        Commands::List => cli::cmd_list(&config).await,
        Commands::Info { id } => cli::cmd_info(&config, &id).await,
        Commands::Shared => cli::cmd_shared(&config).await,
        Commands::Graph { json } => cli::cmd_graph(&config, json).await,
    }
}

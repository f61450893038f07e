pub mod commands;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "accounts-api")]
#[command(about = "Accounts API - create, update and delete accounts over HTTP")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Port to listen on (overrides PORT)")]
    pub port: Option<u16>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve,

    #[command(about = "Create the accounts table if it does not exist")]
    InitDb,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::from_env();
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    tracing::info!("Starting Accounts API in {:?} mode", config.environment);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => commands::serve::handle(config).await,
        Commands::InitDb => commands::init_db::handle(config).await,
    }
}

pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use std::sync::Arc;

use crate::config::{config, StorageBackend};
use crate::database::PgStore;
use crate::services::PortalService;

#[derive(Parser)]
#[command(name = "portal")]
#[command(about = "Internship portal admin CLI - schema, accounts and mentor assignment")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Create or upgrade the database schema")]
    Migrate,

    #[command(about = "Account management")]
    User {
        #[command(subcommand)]
        cmd: commands::user::UserCommands,
    },

    #[command(about = "Mentor assignment")]
    Mentor {
        #[command(subcommand)]
        cmd: commands::mentor::MentorCommands,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Connect to the configured Postgres database; the CLI never uses the memory store
pub async fn connect() -> anyhow::Result<PgStore> {
    let config = config();
    if config.database.storage != StorageBackend::Postgres {
        anyhow::bail!("the portal CLI requires PORTAL_STORAGE=postgres");
    }
    Ok(PgStore::connect(&config.database).await?)
}

pub fn service(store: PgStore) -> PortalService {
    PortalService::new(Arc::new(store), config())
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Migrate => commands::migrate::handle(output_format).await,
        Commands::User { cmd } => commands::user::handle(cmd, output_format).await,
        Commands::Mentor { cmd } => commands::mentor::handle(cmd, output_format).await,
    }
}

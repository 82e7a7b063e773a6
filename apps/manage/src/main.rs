//! Account administration.
//!
//! ```text
//! manage create-user --username alice --password 'correct horse'
//! MANAGE_PASSWORD='correct horse' manage create-user --username alice
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use thiserror::Error;

use narrative_core::ports::Clock;
use narrative_core::{Accounts, DomainError};
use narrative_infra::database::{DatabaseConfig, DatabaseConnections, PostgresUserRepository};
use narrative_infra::{Argon2PasswordService, SystemClock};

#[derive(Parser)]
#[command(name = "manage")]
#[command(about = "Narrative site administration")]
struct Cli {
    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account that can write and edit posts
    CreateUser {
        /// Login name
        #[arg(long)]
        username: String,

        /// Password (at least 8 characters)
        #[arg(long, env = "MANAGE_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[derive(Debug, Error)]
enum ManageError {
    #[error("database connection failed: {0}")]
    Connection(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt().with_env_filter("info").init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), ManageError> {
    let config = DatabaseConfig {
        url: cli.database_url,
        max_connections: 1,
        min_connections: 1,
    };
    let connections = DatabaseConnections::init(&config)
        .await
        .map_err(|e| ManageError::Connection(e.to_string()))?;

    let accounts = Accounts::new(
        Arc::new(PostgresUserRepository::new(connections.main)),
        Arc::new(Argon2PasswordService::new()),
    );

    match cli.command {
        Commands::CreateUser { username, password } => {
            let user = accounts
                .register(&username, &password, SystemClock.now())
                .await?;
            println!("Created user {} ({})", user.username, user.id);
        }
    }

    Ok(())
}

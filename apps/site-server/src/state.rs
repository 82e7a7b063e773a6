//! Application state - shared across all handlers.

use std::sync::Arc;

use thiserror::Error;

use narrative_core::ports::{
    Clock, PasswordService, PictureRepository, PostRepository, SponsorRepository, TokenService,
    UserRepository,
};
use narrative_core::{Accounts, PostWorkflow};
use narrative_infra::database::{
    DatabaseConfig, InMemoryPictureRepository, InMemoryPostRepository, InMemorySponsorRepository,
    InMemoryUserRepository,
};

#[cfg(feature = "postgres")]
use narrative_infra::database::{
    DatabaseConnections, PostgresPictureRepository, PostgresPostRepository,
    PostgresSponsorRepository, PostgresUserRepository,
};

use crate::config::SiteConfig;

/// The repositories behind the site, all backed by the same store.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub pictures: Arc<dyn PictureRepository>,
    pub sponsors: Arc<dyn SponsorRepository>,
    /// Human-readable store name, reported by the health endpoint.
    pub kind: &'static str,
}

impl Stores {
    /// Process-local store; everything is lost on restart.
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            posts: Arc::new(InMemoryPostRepository::new()),
            pictures: Arc::new(InMemoryPictureRepository::new()),
            sponsors: Arc::new(InMemorySponsorRepository::new()),
            kind: "memory",
        }
    }

    #[cfg(feature = "postgres")]
    pub fn postgres(connections: &DatabaseConnections) -> Self {
        let db = &connections.main;
        Self {
            users: Arc::new(PostgresUserRepository::new(db.clone())),
            posts: Arc::new(PostgresPostRepository::new(db.clone())),
            pictures: Arc::new(PostgresPictureRepository::new(db.clone())),
            sponsors: Arc::new(PostgresSponsorRepository::new(db.clone())),
            kind: "postgres",
        }
    }

    /// Connect to the configured database. Only an unset `DATABASE_URL` selects
    /// the in-memory store; a configured database that cannot be reached is fatal.
    pub async fn connect(db_config: Option<&DatabaseConfig>) -> Result<Self, StartupError> {
        let Some(config) = db_config else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Ok(Self::in_memory());
        };

        #[cfg(feature = "postgres")]
        {
            let connections = DatabaseConnections::init(config).await.map_err(|e| {
                tracing::error!("Failed to connect to database: {}", e);
                StartupError::Database(e.to_string())
            })?;
            Ok(Self::postgres(&connections))
        }

        #[cfg(not(feature = "postgres"))]
        {
            let _ = config;
            Err(StartupError::Database(
                "DATABASE_URL is set but the postgres feature is disabled".to_string(),
            ))
        }
    }
}

/// Failures that keep the server from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("database unavailable: {0}")]
    Database(String),
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostWorkflow,
    pub pictures: Arc<dyn PictureRepository>,
    pub sponsors: Arc<dyn SponsorRepository>,
    pub accounts: Accounts,
    pub tokens: Arc<dyn TokenService>,
    pub clock: Arc<dyn Clock>,
    pub site: SiteConfig,
    pub store_kind: &'static str,
}

impl AppState {
    pub fn new(
        stores: Stores,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
        clock: Arc<dyn Clock>,
        site: SiteConfig,
    ) -> Self {
        tracing::info!(store = stores.kind, "Application state initialized");

        Self {
            posts: PostWorkflow::new(stores.posts),
            pictures: stores.pictures,
            sponsors: stores.sponsors,
            accounts: Accounts::new(stores.users, passwords),
            tokens,
            clock,
            site,
            store_kind: stores.kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn test_missing_database_url_uses_memory() {
        let stores = Stores::connect(None).await.unwrap();
        assert_eq!(stores.kind, "memory");
    }

    #[actix_web::test]
    async fn test_unreachable_database_is_an_error() {
        let config = DatabaseConfig {
            url: "nosuchdb://localhost/narrative".to_string(),
            max_connections: 1,
            min_connections: 1,
        };

        let result = Stores::connect(Some(&config)).await;
        assert!(matches!(result, Err(StartupError::Database(_))));
    }
}

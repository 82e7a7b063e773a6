//! Record store: SeaORM/Postgres repositories and the in-memory fallback.

mod connections;
mod memory;

#[cfg(feature = "postgres")]
mod postgres_base;
#[cfg(feature = "postgres")]
pub mod postgres_repo;

#[cfg(feature = "postgres")]
pub mod entity;

pub use connections::{DatabaseConfig, DatabaseConnections};
pub use memory::{
    InMemoryPictureRepository, InMemoryPostRepository, InMemoryRepository,
    InMemorySponsorRepository, InMemoryUserRepository, Record,
};

#[cfg(feature = "postgres")]
pub use postgres_repo::{
    PostgresPictureRepository, PostgresPostRepository, PostgresSponsorRepository,
    PostgresUserRepository,
};

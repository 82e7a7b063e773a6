use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Picture, Post, Sponsor, User};
use crate::error::RepoError;

/// Generic repository trait defining the record operations the site needs.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite every field of an existing entity.
    async fn update(&self, entity: T) -> Result<T, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their login name.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Posts with `published_date <= now`, oldest publication first.
    async fn list_published(&self, now: DateTime<Utc>) -> Result<Vec<Post>, RepoError>;
}

/// Picture gallery repository.
#[async_trait]
pub trait PictureRepository: BaseRepository<Picture, Uuid> {
    /// Every picture, in insertion order.
    async fn list_all(&self) -> Result<Vec<Picture>, RepoError>;
}

/// Sponsor gallery repository.
#[async_trait]
pub trait SponsorRepository: BaseRepository<Sponsor, Uuid> {
    /// Every sponsor, in insertion order.
    async fn list_all(&self) -> Result<Vec<Sponsor>, RepoError>;
}

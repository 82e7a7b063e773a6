//! In-memory repositories - used when no database is configured, and by tests.
//!
//! Records are kept in insertion order. Data is lost on process restart.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use narrative_core::domain::{Picture, Post, Sponsor, User};
use narrative_core::error::RepoError;
use narrative_core::ports::{
    BaseRepository, PictureRepository, PostRepository, SponsorRepository, UserRepository,
};

/// Records that can live in an [`InMemoryRepository`].
pub trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;
}

impl Record for User {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Post {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Picture {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Sponsor {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// A vector of records behind an async `RwLock`.
pub struct InMemoryRepository<T> {
    records: RwLock<Vec<T>>,
}

pub type InMemoryUserRepository = InMemoryRepository<User>;
pub type InMemoryPostRepository = InMemoryRepository<Post>;
pub type InMemoryPictureRepository = InMemoryRepository<Picture>;
pub type InMemorySponsorRepository = InMemoryRepository<Sponsor>;

impl<T> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Record> InMemoryRepository<T> {
    /// Every record, in insertion order.
    pub async fn all(&self) -> Vec<T> {
        self.records.read().await.clone()
    }
}

impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> BaseRepository<T, Uuid> for InMemoryRepository<T> {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, RepoError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id() == id).cloned())
    }

    async fn insert(&self, entity: T) -> Result<T, RepoError> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.id() == entity.id()) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        records.push(entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: T) -> Result<T, RepoError> {
        let mut records = self.records.write().await;
        let slot = records
            .iter_mut()
            .find(|r| r.id() == entity.id())
            .ok_or(RepoError::NotFound)?;
        *slot = entity.clone();
        Ok(entity)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|u| u.username == username).cloned())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list_published(&self, now: DateTime<Utc>) -> Result<Vec<Post>, RepoError> {
        let mut posts: Vec<Post> = self
            .records
            .read()
            .await
            .iter()
            .filter(|p| p.is_published(now))
            .cloned()
            .collect();
        // Stable sort keeps insertion order among equal dates.
        posts.sort_by_key(|p| p.published_date);
        Ok(posts)
    }
}

#[async_trait]
impl PictureRepository for InMemoryPictureRepository {
    async fn list_all(&self) -> Result<Vec<Picture>, RepoError> {
        Ok(self.all().await)
    }
}

#[async_trait]
impl SponsorRepository for InMemorySponsorRepository {
    async fn list_all(&self) -> Result<Vec<Sponsor>, RepoError> {
        Ok(self.all().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn post(text: &str, published_date: DateTime<Utc>) -> Post {
        let mut post = Post::new(Uuid::new_v4(), "title".into(), text.into(), Utc::now());
        post.published_date = published_date;
        post
    }

    #[tokio::test]
    async fn test_list_published_filters_and_sorts() {
        let repo = InMemoryPostRepository::new();
        let now = Utc::now();
        let later = repo.insert(post("later", now + TimeDelta::hours(1))).await.unwrap();
        let recent = repo.insert(post("recent", now - TimeDelta::hours(1))).await.unwrap();
        let old = repo.insert(post("old", now - TimeDelta::days(2))).await.unwrap();

        let listed = repo.list_published(now).await.unwrap();

        assert_eq!(listed, vec![old, recent]);
        assert!(!listed.contains(&later));
    }

    #[tokio::test]
    async fn test_update_missing_record() {
        let repo = InMemoryPostRepository::new();
        let result = repo.update(post("ghost", Utc::now())).await;
        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_duplicate_insert_rejected() {
        let repo = InMemoryPostRepository::new();
        let p = post("once", Utc::now());
        repo.insert(p.clone()).await.unwrap();

        assert!(matches!(
            repo.insert(p).await,
            Err(RepoError::Constraint(_))
        ));
    }

    #[tokio::test]
    async fn test_gallery_keeps_insertion_order() {
        let repo = InMemorySponsorRepository::new();
        let now = Utc::now();
        let first = repo
            .insert(Sponsor::new("first".into(), "sponsors/a.png".into(), now))
            .await
            .unwrap();
        let second = repo
            .insert(Sponsor::new("second".into(), "sponsors/b.png".into(), now))
            .await
            .unwrap();

        assert_eq!(repo.list_all().await.unwrap(), vec![first, second]);
    }

    #[tokio::test]
    async fn test_find_user_by_username() {
        let repo = InMemoryUserRepository::new();
        let user = repo
            .insert(User::new("test user".into(), "hash".into(), Utc::now()))
            .await
            .unwrap();

        let found = repo.find_by_username("test user").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert!(repo.find_by_username("nobody").await.unwrap().is_none());
    }
}

//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use narrative_core::domain::{Picture, Post, Sponsor, User};
use narrative_core::error::RepoError;
use narrative_core::ports::{PictureRepository, PostRepository, SponsorRepository, UserRepository};

use super::entity::picture::{self, Entity as PictureEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::sponsor::{self, Entity as SponsorEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, query_error};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL picture repository.
pub type PostgresPictureRepository = PostgresBaseRepository<PictureEntity>;

/// PostgreSQL sponsor repository.
pub type PostgresSponsorRepository = PostgresBaseRepository<SponsorEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(%username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list_published(&self, now: DateTime<Utc>) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::PublishedDate.lte(now.fixed_offset()))
            .order_by_asc(post::Column::PublishedDate)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl PictureRepository for PostgresPictureRepository {
    async fn list_all(&self) -> Result<Vec<Picture>, RepoError> {
        let result = PictureEntity::find()
            .order_by_asc(picture::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl SponsorRepository for PostgresSponsorRepository {
    async fn list_all(&self) -> Result<Vec<Sponsor>, RepoError> {
        let result = SponsorEntity::find()
            .order_by_asc(sponsor::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

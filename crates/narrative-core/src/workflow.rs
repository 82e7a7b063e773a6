//! Post workflow: list, detail, create and edit on top of the repository and the
//! visibility policy.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Post, Viewer};
use crate::error::DomainError;
use crate::form::PostForm;
use crate::policy::{self, AccessDecision};
use crate::ports::PostRepository;

const ENTITY: &str = "Post";

/// Orchestrates the post pages. Every call receives the viewer and the current
/// instant from the caller.
#[derive(Clone)]
pub struct PostWorkflow {
    posts: Arc<dyn PostRepository>,
}

impl PostWorkflow {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    /// Published posts, oldest first.
    pub async fn list(&self, now: DateTime<Utc>) -> Result<Vec<Post>, DomainError> {
        let posts = self.posts.list_published(now).await?;
        tracing::debug!(count = posts.len(), "Listed published posts");
        Ok(posts)
    }

    /// A single post, if the viewer is allowed to know it exists.
    pub async fn detail(
        &self,
        id: Uuid,
        viewer: &Viewer,
        now: DateTime<Utc>,
    ) -> Result<Post, DomainError> {
        let post = self.find(id).await?;

        match policy::view_decision(&post, viewer, now) {
            AccessDecision::Visible => Ok(post),
            AccessDecision::HiddenNotFound => {
                tracing::debug!(post_id = %id, "Scheduled post hidden from anonymous viewer");
                Err(DomainError::not_found(ENTITY))
            }
        }
    }

    /// Gate for the empty entry form.
    pub fn new_form(&self, viewer: &Viewer) -> Result<PostForm, DomainError> {
        require_author(viewer)?;
        Ok(PostForm::default())
    }

    /// Validate and persist a new post authored by the viewer.
    pub async fn create(
        &self,
        viewer: &Viewer,
        form: &PostForm,
        now: DateTime<Utc>,
    ) -> Result<Post, DomainError> {
        let author_id = require_author(viewer)?;
        let valid = form.validate().map_err(DomainError::Validation)?;

        let post = Post::new(author_id, valid.title, valid.text, now);
        let saved = self.posts.insert(post).await?;

        tracing::info!(post_id = %saved.id, author_id = %author_id, "Post created");
        Ok(saved)
    }

    /// The stored post together with a form pre-filled from it.
    pub async fn edit_form(
        &self,
        id: Uuid,
        viewer: &Viewer,
    ) -> Result<(Post, PostForm), DomainError> {
        require_author(viewer)?;
        let post = self.find(id).await?;
        let form = PostForm::from_post(&post);
        Ok((post, form))
    }

    /// Overwrite a post's content. A successful edit re-stamps the author and
    /// re-publishes the post at `now`, even if it was scheduled for later.
    pub async fn edit(
        &self,
        id: Uuid,
        viewer: &Viewer,
        form: &PostForm,
        now: DateTime<Utc>,
    ) -> Result<Post, DomainError> {
        let editor_id = require_author(viewer)?;
        let mut post = self.find(id).await?;
        let valid = form.validate().map_err(DomainError::Validation)?;

        post.revise(editor_id, valid.title, valid.text, now);
        let saved = self.posts.update(post).await?;

        tracing::info!(post_id = %saved.id, editor_id = %editor_id, "Post edited");
        Ok(saved)
    }

    async fn find(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(ENTITY))
    }
}

fn require_author(viewer: &Viewer) -> Result<Uuid, DomainError> {
    match (policy::edit_decision(viewer), viewer.user_id()) {
        (AccessDecision::Visible, Some(user_id)) => Ok(user_id),
        _ => Err(DomainError::not_found(ENTITY)),
    }
}

//! View models handed to the templates.

use chrono::{DateTime, Utc};
use serde::Serialize;

use narrative_core::domain::{Picture, Post, Sponsor};
use narrative_core::form::{FieldErrors, PostForm};

const DATE_FORMAT: &str = "%B %-d, %Y, %H:%M UTC";

pub fn post_url(post: &Post) -> String {
    format!("/blog/post/{}/", post.id)
}

pub fn post_edit_url(post: &Post) -> String {
    format!("/blog/post/{}/edit/", post.id)
}

#[derive(Debug, Serialize)]
pub struct PostView {
    pub id: String,
    pub title: String,
    pub text: String,
    pub published: String,
    pub scheduled: bool,
    pub url: String,
    pub edit_url: String,
}

impl PostView {
    pub fn new(post: &Post, now: DateTime<Utc>) -> Self {
        Self {
            id: post.id.to_string(),
            title: post.title.clone(),
            text: post.text.clone(),
            published: post.published_date.format(DATE_FORMAT).to_string(),
            scheduled: !post.is_published(now),
            url: post_url(post),
            edit_url: post_edit_url(post),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostListContext {
    pub posts: Vec<PostView>,
}

#[derive(Debug, Serialize)]
pub struct PostDetailContext {
    pub post: PostView,
    pub can_edit: bool,
}

#[derive(Debug, Default, Serialize)]
pub struct FormErrorsView {
    pub title: Vec<String>,
    pub text: Vec<String>,
}

impl From<&FieldErrors> for FormErrorsView {
    fn from(errors: &FieldErrors) -> Self {
        let collect = |field: &str| {
            errors
                .for_field(field)
                .into_iter()
                .map(str::to_string)
                .collect()
        };
        Self {
            title: collect("title"),
            text: collect("text"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostEditContext {
    pub heading: &'static str,
    pub action: String,
    pub form: PostForm,
    pub errors: FormErrorsView,
    pub has_errors: bool,
}

impl PostEditContext {
    pub fn new(
        heading: &'static str,
        action: String,
        form: PostForm,
        errors: Option<&FieldErrors>,
    ) -> Self {
        Self {
            heading,
            action,
            form,
            errors: errors.map(FormErrorsView::from).unwrap_or_default(),
            has_errors: errors.is_some_and(|e| !e.is_empty()),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct GalleryItemView {
    pub description: String,
    pub image_url: String,
}

impl GalleryItemView {
    fn new(description: &str, image: &str, media_url: &str) -> Self {
        Self {
            description: description.to_string(),
            image_url: format!("{media_url}{}", image.trim_start_matches('/')),
        }
    }

    pub fn picture(picture: &Picture, media_url: &str) -> Self {
        Self::new(&picture.description, &picture.image, media_url)
    }

    pub fn sponsor(sponsor: &Sponsor, media_url: &str) -> Self {
        Self::new(&sponsor.description, &sponsor.image, media_url)
    }
}

#[derive(Debug, Serialize)]
pub struct GalleryContext {
    pub heading: &'static str,
    pub items: Vec<GalleryItemView>,
}

#[derive(Debug, Serialize)]
pub struct LoginContext {
    pub username: String,
    pub next: String,
    pub error: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct ErrorContext {
    pub status: u16,
    pub reason: &'static str,
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use uuid::Uuid;

    #[test]
    fn test_post_view_flags_scheduled_posts() {
        let now = Utc::now();
        let mut post = Post::new(Uuid::new_v4(), "t".into(), "x".into(), now);
        post.published_date = now + TimeDelta::days(1);

        let view = PostView::new(&post, now);
        assert!(view.scheduled);
        assert_eq!(view.url, format!("/blog/post/{}/", post.id));
        assert_eq!(view.edit_url, format!("/blog/post/{}/edit/", post.id));
    }

    #[test]
    fn test_gallery_image_url_joins_media_prefix() {
        let picture = Picture::new("Harbour".into(), "/pictures/harbour.jpg".into(), Utc::now());
        let view = GalleryItemView::picture(&picture, "/media/");
        assert_eq!(view.image_url, "/media/pictures/harbour.jpg");
    }
}

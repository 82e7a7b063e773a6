//! Who may see and who may edit a post.
//!
//! Denials are never reported as "forbidden": a hidden post is
//! indistinguishable from a missing one, so callers map
//! [`AccessDecision::HiddenNotFound`] to the same not-found response.

use chrono::{DateTime, Utc};

use crate::domain::{Post, Viewer};

/// Outcome of a policy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Visible,
    HiddenNotFound,
}

impl AccessDecision {
    pub fn is_visible(self) -> bool {
        self == Self::Visible
    }
}

impl From<bool> for AccessDecision {
    fn from(allowed: bool) -> Self {
        if allowed {
            Self::Visible
        } else {
            Self::HiddenNotFound
        }
    }
}

/// Published posts are public; scheduled posts are visible to logged-in viewers only.
pub fn can_view(post: &Post, viewer: &Viewer, now: DateTime<Utc>) -> bool {
    post.is_published(now) || viewer.is_authenticated()
}

/// Any authenticated viewer may create or edit any post. There is no ownership check.
pub fn can_edit(viewer: &Viewer) -> bool {
    viewer.is_authenticated()
}

pub fn view_decision(post: &Post, viewer: &Viewer, now: DateTime<Utc>) -> AccessDecision {
    can_view(post, viewer, now).into()
}

pub fn edit_decision(viewer: &Viewer) -> AccessDecision {
    can_edit(viewer).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use uuid::Uuid;

    fn post_published_at(published_date: DateTime<Utc>) -> Post {
        let mut post = Post::new(Uuid::new_v4(), "title".into(), "text".into(), Utc::now());
        post.published_date = published_date;
        post
    }

    fn member() -> Viewer {
        Viewer::authenticated(Uuid::new_v4(), "test user")
    }

    #[test]
    fn test_published_post_visible_to_everyone() {
        let now = Utc::now();
        let post = post_published_at(now - TimeDelta::days(1));

        assert_eq!(view_decision(&post, &Viewer::Anonymous, now), AccessDecision::Visible);
        assert_eq!(view_decision(&post, &member(), now), AccessDecision::Visible);
    }

    #[test]
    fn test_post_published_exactly_now_is_public() {
        let now = Utc::now();
        let post = post_published_at(now);

        assert!(can_view(&post, &Viewer::Anonymous, now));
    }

    #[test]
    fn test_scheduled_post_hidden_from_anonymous() {
        let now = Utc::now();
        let post = post_published_at(now + TimeDelta::days(1));

        assert_eq!(
            view_decision(&post, &Viewer::Anonymous, now),
            AccessDecision::HiddenNotFound
        );
        assert_eq!(view_decision(&post, &member(), now), AccessDecision::Visible);
    }

    #[test]
    fn test_edit_requires_login_only() {
        assert_eq!(edit_decision(&Viewer::Anonymous), AccessDecision::HiddenNotFound);
        assert!(edit_decision(&member()).is_visible());
    }
}

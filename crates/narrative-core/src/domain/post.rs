use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a blog entry, possibly scheduled for a future date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub text: String,
    pub published_date: DateTime<Utc>,
    pub created_date: DateTime<Utc>,
}

impl Post {
    /// Create a new post published at `now`.
    pub fn new(author_id: Uuid, title: String, text: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            text,
            published_date: now,
            created_date: now,
        }
    }

    /// A post is published once its publication date is at or before `now`.
    pub fn is_published(&self, now: DateTime<Utc>) -> bool {
        self.published_date <= now
    }

    /// Overwrite the content and re-publish under a new author.
    pub fn revise(&mut self, editor_id: Uuid, title: String, text: String, now: DateTime<Utc>) {
        self.title = title;
        self.text = text;
        self.author_id = editor_id;
        self.published_date = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn test_new_post_is_published_now() {
        let now = Utc::now();
        let post = Post::new(Uuid::new_v4(), "t".into(), "x".into(), now);

        assert_eq!(post.published_date, now);
        assert_eq!(post.created_date, now);
        assert!(post.is_published(now));
        assert!(!post.is_published(now - TimeDelta::seconds(1)));
    }

    #[test]
    fn test_revise_keeps_created_date() {
        let created = Utc::now() - TimeDelta::days(3);
        let mut post = Post::new(Uuid::new_v4(), "old".into(), "old".into(), created);
        post.published_date = created + TimeDelta::days(10);

        let editor = Uuid::new_v4();
        let now = Utc::now();
        post.revise(editor, "new".into(), "body".into(), now);

        assert_eq!(post.author_id, editor);
        assert_eq!(post.published_date, now);
        assert_eq!(post.created_date, created);
        assert_eq!(post.title, "new");
    }
}

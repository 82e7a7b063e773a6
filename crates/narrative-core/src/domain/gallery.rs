use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A picture shown on the pictures page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Picture {
    pub id: Uuid,
    pub description: String,
    /// Path relative to the media root, e.g. `pictures/harbour.jpg`.
    pub image: String,
    pub created_at: DateTime<Utc>,
}

impl Picture {
    pub fn new(description: String, image: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            description,
            image,
            created_at: now,
        }
    }
}

/// A sponsor shown on the sponsors page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sponsor {
    pub id: Uuid,
    pub description: String,
    /// Path relative to the media root, e.g. `sponsors/acme.png`.
    pub image: String,
    pub created_at: DateTime<Utc>,
}

impl Sponsor {
    pub fn new(description: String, image: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            description,
            image,
            created_at: now,
        }
    }
}

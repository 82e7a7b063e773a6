use uuid::Uuid;

/// Who is making the current request.
///
/// Resolved once per request by the HTTP layer and passed explicitly into the
/// policy and workflow functions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Viewer {
    #[default]
    Anonymous,
    Authenticated { user_id: Uuid, username: String },
}

impl Viewer {
    pub fn authenticated(user_id: Uuid, username: impl Into<String>) -> Self {
        Self::Authenticated {
            user_id,
            username: username.into(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Self::Authenticated { user_id, .. } => Some(*user_id),
            Self::Anonymous => None,
        }
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Authenticated { username, .. } => Some(username),
            Self::Anonymous => None,
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored account. The credential is an Argon2 PHC string and never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            username: self.username.clone(),
        }
    }
}

/// The public face of a user, used when an author reference is hydrated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
}

/// Weak reference from a campground or review to the user that wrote it.
///
/// Plain lookups return the raw identifier; joined lookups hydrate it into a
/// [`UserSummary`]. Ownership checks must go through [`AuthorRef::is`] so both
/// shapes compare by their canonical identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuthorRef {
    User(UserSummary),
    Id(String),
}

impl AuthorRef {
    pub fn id(&self) -> &str {
        match self {
            AuthorRef::User(user) => &user.id,
            AuthorRef::Id(id) => id,
        }
    }

    /// Canonical identifier equality against the acting user's id.
    pub fn is(&self, user_id: &str) -> bool {
        !user_id.is_empty() && self.id() == user_id
    }

    pub fn hydrate(self, user: Option<UserSummary>) -> Self {
        match user {
            Some(user) if user.id == self.id() => AuthorRef::User(user),
            _ => self,
        }
    }
}

impl From<String> for AuthorRef {
    fn from(id: String) -> Self {
        AuthorRef::Id(id)
    }
}

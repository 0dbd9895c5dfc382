use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::AuthorRef;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    /// Owning campground. A review belongs to exactly one.
    pub campground_id: String,
    pub body: String,
    pub rating: u8,
    pub author: AuthorRef,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn new(campground_id: &str, fields: ReviewFields, author_id: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            campground_id: campground_id.to_string(),
            body: fields.body,
            rating: fields.rating,
            author: AuthorRef::Id(author_id.to_string()),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewFields {
    pub body: String,
    pub rating: u8,
}

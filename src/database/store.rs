use async_trait::async_trait;
use thiserror::Error;

use super::models::{Campground, CampgroundFields, Review, ReviewFields, User};

/// Errors from a [`ResourceStore`] backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store backend error: {0}")]
    Backend(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl StoreError {
    pub fn campground_not_found(id: &str) -> Self {
        StoreError::NotFound {
            entity: "campground",
            id: id.to_string(),
        }
    }

    pub fn review_not_found(id: &str) -> Self {
        StoreError::NotFound {
            entity: "review",
            id: id.to_string(),
        }
    }
}

/// Persistence for users, campgrounds and reviews.
///
/// Identifiers are opaque strings. Plain `find_*` lookups return author
/// references as raw ids; the `*_with_author` variants are the join-equivalent
/// fetch and hydrate them.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;

    // Users
    async fn create_user(&self, user: User) -> Result<User, StoreError>;
    async fn find_user(&self, id: &str) -> Result<Option<User>, StoreError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    // Campgrounds
    async fn list_campgrounds(&self) -> Result<Vec<Campground>, StoreError>;
    async fn find_campground(&self, id: &str) -> Result<Option<Campground>, StoreError>;
    async fn find_campground_with_author(&self, id: &str) -> Result<Option<Campground>, StoreError>;
    async fn create_campground(&self, fields: CampgroundFields, author_id: &str) -> Result<Campground, StoreError>;
    /// Persist the editable fields of an already-resolved campground. Author and
    /// review list are left as stored.
    async fn update_campground(&self, campground: &Campground) -> Result<(), StoreError>;
    async fn delete_campground(&self, id: &str) -> Result<(), StoreError>;
    async fn delete_all_campgrounds(&self) -> Result<u64, StoreError>;

    // Reviews
    async fn find_review(&self, campground_id: &str, review_id: &str) -> Result<Option<Review>, StoreError>;
    async fn list_reviews_with_author(&self, campground_id: &str) -> Result<Vec<Review>, StoreError>;
    async fn count_reviews(&self, campground_id: &str) -> Result<u64, StoreError>;
    /// Persist a review and append its id to the owning campground's list
    async fn create_review(&self, campground_id: &str, fields: ReviewFields, author_id: &str) -> Result<Review, StoreError>;
    /// Remove a review and pull its id from the owning campground's list
    async fn delete_review(&self, campground_id: &str, review_id: &str) -> Result<(), StoreError>;
    /// Remove every review owned by a campground; returns how many were removed
    async fn delete_reviews_for(&self, campground_id: &str) -> Result<u64, StoreError>;
}

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::models::{AuthorRef, Campground, CampgroundFields, Review, ReviewFields, User, UserSummary};
use super::store::{ResourceStore, StoreError};

#[derive(Default)]
struct Collections {
    users: HashMap<String, User>,
    // Insertion order is listing order
    campgrounds: Vec<Campground>,
    reviews: Vec<Review>,
}

impl Collections {
    fn author_summary(&self, author: &AuthorRef) -> Option<UserSummary> {
        self.users.get(author.id()).map(User::summary)
    }

    fn campground_mut(&mut self, id: &str) -> Option<&mut Campground> {
        self.campgrounds.iter_mut().find(|c| c.id == id)
    }
}

/// Process-local store used when no database is configured, and by tests
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResourceStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn create_user(&self, user: User) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|u| u.username == user.username) {
            return Err(StoreError::Conflict(format!(
                "A user with the given username '{}' is already registered",
                user.username
            )));
        }
        inner.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().await.users.get(id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.username == username).cloned())
    }

    async fn list_campgrounds(&self) -> Result<Vec<Campground>, StoreError> {
        Ok(self.inner.read().await.campgrounds.clone())
    }

    async fn find_campground(&self, id: &str) -> Result<Option<Campground>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.campgrounds.iter().find(|c| c.id == id).cloned())
    }

    async fn find_campground_with_author(&self, id: &str) -> Result<Option<Campground>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.campgrounds.iter().find(|c| c.id == id).cloned().map(|mut camp| {
            let summary = inner.author_summary(&camp.author);
            camp.author = camp.author.hydrate(summary);
            camp
        }))
    }

    async fn create_campground(&self, fields: CampgroundFields, author_id: &str) -> Result<Campground, StoreError> {
        let camp = Campground::new(fields, author_id);
        self.inner.write().await.campgrounds.push(camp.clone());
        Ok(camp)
    }

    async fn update_campground(&self, campground: &Campground) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let stored = inner
            .campground_mut(&campground.id)
            .ok_or_else(|| StoreError::campground_not_found(&campground.id))?;
        stored.title = campground.title.clone();
        stored.description = campground.description.clone();
        stored.price = campground.price;
        stored.location = campground.location.clone();
        stored.geometry = campground.geometry.clone();
        stored.images = campground.images.clone();
        Ok(())
    }

    async fn delete_campground(&self, id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let before = inner.campgrounds.len();
        inner.campgrounds.retain(|c| c.id != id);
        if inner.campgrounds.len() == before {
            return Err(StoreError::campground_not_found(id));
        }
        Ok(())
    }

    async fn delete_all_campgrounds(&self) -> Result<u64, StoreError> {
        let mut inner = self.inner.write().await;
        let removed = inner.campgrounds.len() as u64;
        inner.campgrounds.clear();
        inner.reviews.clear();
        Ok(removed)
    }

    async fn find_review(&self, campground_id: &str, review_id: &str) -> Result<Option<Review>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .reviews
            .iter()
            .find(|r| r.id == review_id && r.campground_id == campground_id)
            .cloned())
    }

    async fn list_reviews_with_author(&self, campground_id: &str) -> Result<Vec<Review>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .reviews
            .iter()
            .filter(|r| r.campground_id == campground_id)
            .cloned()
            .map(|mut review| {
                let summary = inner.author_summary(&review.author);
                review.author = review.author.hydrate(summary);
                review
            })
            .collect())
    }

    async fn count_reviews(&self, campground_id: &str) -> Result<u64, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.reviews.iter().filter(|r| r.campground_id == campground_id).count() as u64)
    }

    async fn create_review(&self, campground_id: &str, fields: ReviewFields, author_id: &str) -> Result<Review, StoreError> {
        let mut inner = self.inner.write().await;
        let review = Review::new(campground_id, fields, author_id);
        let camp = inner
            .campground_mut(campground_id)
            .ok_or_else(|| StoreError::campground_not_found(campground_id))?;
        camp.reviews.push(review.id.clone());
        inner.reviews.push(review.clone());
        Ok(review)
    }

    async fn delete_review(&self, campground_id: &str, review_id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let before = inner.reviews.len();
        inner
            .reviews
            .retain(|r| !(r.id == review_id && r.campground_id == campground_id));
        if inner.reviews.len() == before {
            return Err(StoreError::review_not_found(review_id));
        }
        if let Some(camp) = inner.campground_mut(campground_id) {
            camp.reviews.retain(|id| id != review_id);
        }
        Ok(())
    }

    async fn delete_reviews_for(&self, campground_id: &str) -> Result<u64, StoreError> {
        let mut inner = self.inner.write().await;
        let before = inner.reviews.len();
        inner.reviews.retain(|r| r.campground_id != campground_id);
        Ok((before - inner.reviews.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(id: &str, username: &str) -> User {
        User {
            id: id.to_string(),
            username: username.to_string(),
            email: None,
            password_hash: "hash".to_string(),
            created_at: Utc::now(),
        }
    }

    fn fields(title: &str) -> CampgroundFields {
        CampgroundFields {
            title: title.to_string(),
            price: 1500.0,
            location: "Nagano".to_string(),
            description: None,
            geometry: None,
            images: None,
        }
    }

    fn review(rating: u8) -> ReviewFields {
        ReviewFields {
            body: "nice".to_string(),
            rating,
        }
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let store = MemoryStore::new();
        store.create_user(user("u-1", "alice")).await.unwrap();
        let err = store.create_user(user("u-2", "alice")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn with_author_hydrates_reference() {
        let store = MemoryStore::new();
        store.create_user(user("u-1", "alice")).await.unwrap();
        let camp = store.create_campground(fields("Lakeview"), "u-1").await.unwrap();

        let plain = store.find_campground(&camp.id).await.unwrap().unwrap();
        assert!(matches!(plain.author, AuthorRef::Id(_)));

        let joined = store.find_campground_with_author(&camp.id).await.unwrap().unwrap();
        match joined.author {
            AuthorRef::User(summary) => assert_eq!(summary.username, "alice"),
            other => panic!("expected hydrated author, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_writes_given_value_but_not_author() {
        let store = MemoryStore::new();
        let camp = store.create_campground(fields("Lakeview"), "u-1").await.unwrap();

        let mut edited = camp.clone();
        edited.apply(fields("Hillside"));
        edited.author = AuthorRef::Id("u-2".to_string());
        store.update_campground(&edited).await.unwrap();

        let stored = store.find_campground(&camp.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "Hillside");
        assert_eq!(stored.author.id(), "u-1");
    }

    #[tokio::test]
    async fn update_missing_campground_is_not_found() {
        let store = MemoryStore::new();
        let ghost = Campground::new(fields("Ghost"), "u-1");
        let err = store.update_campground(&ghost).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "campground", .. }));
    }

    #[tokio::test]
    async fn reviews_are_tracked_on_campground() {
        let store = MemoryStore::new();
        let camp = store.create_campground(fields("Lakeview"), "u-1").await.unwrap();
        let first = store.create_review(&camp.id, review(4), "u-2").await.unwrap();
        let second = store.create_review(&camp.id, review(5), "u-2").await.unwrap();

        let stored = store.find_campground(&camp.id).await.unwrap().unwrap();
        assert_eq!(stored.reviews, vec![first.id.clone(), second.id.clone()]);

        store.delete_review(&camp.id, &first.id).await.unwrap();
        let stored = store.find_campground(&camp.id).await.unwrap().unwrap();
        assert_eq!(stored.reviews, vec![second.id]);
    }

    #[tokio::test]
    async fn review_lookup_is_scoped_to_campground() {
        let store = MemoryStore::new();
        let a = store.create_campground(fields("A"), "u-1").await.unwrap();
        let b = store.create_campground(fields("B"), "u-1").await.unwrap();
        let r = store.create_review(&a.id, review(3), "u-2").await.unwrap();

        assert!(store.find_review(&a.id, &r.id).await.unwrap().is_some());
        assert!(store.find_review(&b.id, &r.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn review_on_missing_campground_is_not_found() {
        let store = MemoryStore::new();
        let err = store.create_review("missing", review(3), "u-1").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "campground", .. }));
    }

    #[tokio::test]
    async fn delete_missing_campground_is_not_found() {
        let store = MemoryStore::new();
        let err = store.delete_campground("missing").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn delete_reviews_for_only_touches_owner() {
        let store = MemoryStore::new();
        let a = store.create_campground(fields("A"), "u-1").await.unwrap();
        let b = store.create_campground(fields("B"), "u-1").await.unwrap();
        for _ in 0..3 {
            store.create_review(&a.id, review(4), "u-2").await.unwrap();
        }
        store.create_review(&b.id, review(2), "u-2").await.unwrap();

        assert_eq!(store.delete_reviews_for(&a.id).await.unwrap(), 3);
        assert_eq!(store.count_reviews(&a.id).await.unwrap(), 0);
        assert_eq!(store.count_reviews(&b.id).await.unwrap(), 1);
    }
}

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::ApiError;

const NOTICES_KEY: &str = "notices";

/// Pending user-visible messages, grouped by category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeQueue {
    pub success: Vec<String>,
    pub error: Vec<String>,
}

impl NoticeQueue {
    pub fn is_empty(&self) -> bool {
        self.success.is_empty() && self.error.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Read-once notice queue stored in the session. Draining clears it.
pub struct Notices<'a> {
    session: &'a Session,
}

impl<'a> Notices<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    pub async fn push(&self, kind: NoticeKind, message: impl Into<String>) -> Result<(), ApiError> {
        let mut queue = self
            .session
            .get::<NoticeQueue>(NOTICES_KEY)
            .await?
            .unwrap_or_default();
        match kind {
            NoticeKind::Success => queue.success.push(message.into()),
            NoticeKind::Error => queue.error.push(message.into()),
        }
        self.session.insert(NOTICES_KEY, queue).await?;
        Ok(())
    }

    pub async fn success(&self, message: impl Into<String>) -> Result<(), ApiError> {
        self.push(NoticeKind::Success, message).await
    }

    pub async fn error(&self, message: impl Into<String>) -> Result<(), ApiError> {
        self.push(NoticeKind::Error, message).await
    }

    /// Take everything queued so far
    pub async fn drain(&self) -> Result<NoticeQueue, ApiError> {
        Ok(self
            .session
            .remove::<NoticeQueue>(NOTICES_KEY)
            .await?
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tower_sessions::MemoryStore;

    #[tokio::test]
    async fn drain_is_read_once() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        let notices = Notices::new(&session);

        notices.success("Saved").await.unwrap();
        notices.error("Oops").await.unwrap();
        notices.success("Again").await.unwrap();

        let drained = notices.drain().await.unwrap();
        assert_eq!(drained.success, vec!["Saved", "Again"]);
        assert_eq!(drained.error, vec!["Oops"]);

        assert!(notices.drain().await.unwrap().is_empty());
    }
}

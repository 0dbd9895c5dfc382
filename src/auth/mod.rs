pub mod format;
pub mod password;

use std::sync::Arc;

use chrono::Utc;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{info, warn};

use crate::database::models::{User, UserSummary};
use crate::database::ResourceStore;
use crate::error::ApiError;

/// Session key holding the logged-in [`SessionIdentity`]
pub const SESSION_USER_KEY: &str = "user";

/// Stand-in hash verified when the handle does not exist
static UNKNOWN_USER_HASH: Lazy<String> =
    Lazy::new(|| password::hash_password("no such user").unwrap_or_default());

/// Who is acting on this session. Stored in the session, read on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub user_id: String,
    pub username: String,
}

impl From<&User> for SessionIdentity {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            username: user.username.clone(),
        }
    }
}

impl From<SessionIdentity> for UserSummary {
    fn from(identity: SessionIdentity) -> Self {
        UserSummary {
            id: identity.user_id,
            username: identity.username,
        }
    }
}

/// Session-backed identity provider over the user records in the store
#[derive(Clone)]
pub struct IdentityProvider {
    store: Arc<dyn ResourceStore>,
}

impl IdentityProvider {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self { store }
    }

    /// Check a handle/credential pair.
    ///
    /// An unknown handle and a wrong credential fail identically so callers
    /// cannot probe which handles exist.
    pub async fn authenticate(&self, handle: &str, credential: &str) -> Result<SessionIdentity, ApiError> {
        let user = self.store.find_user_by_username(handle).await?;

        // Unknown handles still pay for one verification
        let hash = match &user {
            Some(user) => user.password_hash.clone(),
            None => UNKNOWN_USER_HASH.clone(),
        };
        let credential = credential.to_string();
        let outcome = tokio::task::spawn_blocking(move || password::verify_password(&credential, &hash))
            .await
            .map_err(|e| ApiError::internal_failure(format!("password verification task: {}", e)))?;

        let Some(user) = user else {
            warn!("Authentication failed for handle '{}'", handle);
            return Err(ApiError::authentication_failed());
        };
        if !outcome.map_err(ApiError::internal_failure)? {
            warn!("Authentication failed for handle '{}'", handle);
            return Err(ApiError::authentication_failed());
        }

        Ok(SessionIdentity::from(&user))
    }

    /// Create an account with a freshly salted hash
    pub async fn register(&self, username: &str, email: Option<String>, credential: &str) -> Result<SessionIdentity, ApiError> {
        let credential = credential.to_string();
        let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&credential))
            .await
            .map_err(|e| ApiError::internal_failure(format!("password hashing task: {}", e)))?
            .map_err(ApiError::internal_failure)?;

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.to_string(),
            email,
            password_hash,
            created_at: Utc::now(),
        };
        let user = self.store.create_user(user).await?;
        info!("Registered user '{}' ({})", user.username, user.id);
        Ok(SessionIdentity::from(&user))
    }

    /// Bind an identity to the session. The session id is rotated first.
    pub async fn login(&self, session: &Session, identity: &SessionIdentity) -> Result<(), ApiError> {
        session.cycle_id().await?;
        session.insert(SESSION_USER_KEY, identity).await?;
        info!("User '{}' logged in", identity.username);
        Ok(())
    }

    pub async fn logout(&self, session: &Session) -> Result<Option<SessionIdentity>, ApiError> {
        let identity = session.remove::<SessionIdentity>(SESSION_USER_KEY).await?;
        if let Some(identity) = &identity {
            info!("User '{}' logged out", identity.username);
        }
        Ok(identity)
    }

    /// The identity bound to this session, if any
    pub async fn current_identity(session: &Session) -> Result<Option<SessionIdentity>, ApiError> {
        Ok(session.get::<SessionIdentity>(SESSION_USER_KEY).await?)
    }
}

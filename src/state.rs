use std::sync::Arc;

use crate::auth::IdentityProvider;
use crate::database::ResourceStore;

/// Shared handles given to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ResourceStore>,
    pub identity: IdentityProvider,
}

impl AppState {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        let identity = IdentityProvider::new(store.clone());
        Self { store, identity }
    }
}

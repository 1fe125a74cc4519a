//! Application state

use crate::auth::{ForwardedIdentity, IdentityProvider};
use bankdesk_business::ServiceContext;
use bankdesk_persistence::Database;
use std::sync::Arc;
use std::time::Duration;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<ServiceContext>,
    pub identity: Arc<dyn IdentityProvider>,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(db: Database, request_timeout: Duration) -> Self {
        Self {
            ctx: Arc::new(ServiceContext::new(db)),
            identity: Arc::new(ForwardedIdentity),
            request_timeout,
        }
    }

    pub fn with_identity(mut self, identity: Arc<dyn IdentityProvider>) -> Self {
        self.identity = identity;
        self
    }
}

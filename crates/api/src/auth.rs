//! Caller identity
//!
//! Tokens are verified upstream. The gateway forwards the verified subject
//! and role as headers, and an `IdentityProvider` turns them into a
//! `Principal` for the services.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use bankdesk_business::Principal;
use bankdesk_core::Role;
use uuid::Uuid;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

pub trait IdentityProvider: Send + Sync {
    /// Resolve the caller, or explain why the request is unauthenticated
    fn identify(&self, headers: &HeaderMap) -> Result<Principal, String>;
}

/// Trusts `X-User-Id` / `X-User-Role` set by the authenticating gateway
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardedIdentity;

impl IdentityProvider for ForwardedIdentity {
    fn identify(&self, headers: &HeaderMap) -> Result<Principal, String> {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let id = header(USER_ID_HEADER).ok_or("missing caller identity")?;
        let id = Uuid::parse_str(id).map_err(|_| "malformed caller identity".to_string())?;
        let role = match header(USER_ROLE_HEADER) {
            Some(raw) => Role::parse(raw).map_err(|_| "malformed caller role".to_string())?,
            None => Role::Customer,
        };
        Ok(Principal::new(id, role))
    }
}

/// Extractor for the authenticated caller
#[derive(Debug, Clone, Copy)]
pub struct Caller(pub Principal);

#[async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        state
            .identity
            .identify(&parts.headers)
            .map(Caller)
            .map_err(ApiError::Unauthorized)
    }
}

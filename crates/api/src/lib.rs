//! # Bankdesk API
//!
//! HTTP surface over the business services. Handlers stay thin: extract
//! the caller, call one service operation, wrap the result in
//! `ApiResponse`.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;
pub mod state;

pub use auth::{Caller, ForwardedIdentity, IdentityProvider};
pub use config::AppConfig;
pub use error::ApiError;
pub use extract::{ApiJson, ApiPath, ApiQuery};
pub use routes::create_router;
pub use state::AppState;

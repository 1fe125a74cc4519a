//! Caller identity and role checks
//!
//! A `Principal` is whoever the identity adapter says is calling. Services
//! take it explicitly; nothing here knows about tokens or headers.

use crate::error::{BusinessError, BusinessResult};
use bankdesk_core::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: Uuid,
    pub role: Role,
}

impl Principal {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }

    pub fn customer(id: Uuid) -> Self {
        Self::new(id, Role::Customer)
    }

    pub fn is_back_office(&self) -> bool {
        self.role.is_back_office()
    }

    /// Staff or admin only
    pub fn require_back_office(&self, operation: &str) -> BusinessResult<()> {
        if self.is_back_office() {
            Ok(())
        } else {
            Err(BusinessError::forbidden(operation))
        }
    }

    pub fn require_admin(&self, operation: &str) -> BusinessResult<()> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(BusinessError::forbidden(operation))
        }
    }

    /// Read access to something owned by `owner_id`
    pub fn require_owner_or_back_office(&self, owner_id: Uuid, operation: &str) -> BusinessResult<()> {
        if self.id == owner_id || self.is_back_office() {
            Ok(())
        } else {
            Err(BusinessError::forbidden(operation))
        }
    }
}

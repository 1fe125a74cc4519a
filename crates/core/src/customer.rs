//! # Customer Module
//!
//! Customers and the roles that gate access to the back office:
//! - Admin: manages banks and everything staff can do
//! - Staff: back-office operators (accounts, ledgers, customers)
//! - Customer: owns accounts and moves money between them

use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
    Customer,
}

impl Role {
    /// Code string stored in the DB
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Staff => "staff",
            Role::Customer => "customer",
        }
    }

    pub fn parse(s: &str) -> CoreResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "staff" => Ok(Role::Staff),
            "customer" => Ok(Role::Customer),
            _ => Err(CoreError::InvalidRole(s.to_string())),
        }
    }

    /// Admin and staff both operate the back office
    pub fn is_back_office(&self) -> bool {
        matches!(self, Role::Admin | Role::Staff)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A registered person. The password hash is produced by the external auth
/// collaborator and never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    pub fn new(
        first_name: &str,
        last_name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> CoreResult<Self> {
        let first_name = validate_name("first name", first_name)?;
        let last_name = validate_name("last name", last_name)?;
        let email = normalize_email(email)?;
        if password_hash.is_empty() {
            return Err(CoreError::validation("password hash cannot be empty"));
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            first_name,
            last_name,
            email,
            password_hash: password_hash.to_string(),
            role,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn set_first_name(&mut self, value: &str) -> CoreResult<()> {
        self.first_name = validate_name("first name", value)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn set_last_name(&mut self, value: &str) -> CoreResult<()> {
        self.last_name = validate_name("last name", value)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Stored trimmed and lowercased, like on creation
    pub fn set_email(&mut self, value: &str) -> CoreResult<()> {
        self.email = normalize_email(value)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn set_role(&mut self, role: Role) {
        self.role = role;
        self.updated_at = Utc::now();
    }

    pub fn set_active(&mut self, is_active: bool) {
        self.is_active = is_active;
        self.updated_at = Utc::now();
    }
}

fn normalize_email(email: &str) -> CoreResult<String> {
    let email = email.trim().to_lowercase();
    if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
        return Err(CoreError::validation(format!("invalid email: {}", email)));
    }
    Ok(email)
}

fn validate_name(field: &str, value: &str) -> CoreResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CoreError::validation(format!("{} cannot be empty", field)));
    }
    if value.chars().count() < 2 {
        return Err(CoreError::validation(format!(
            "{} must be at least 2 characters",
            field
        )));
    }
    Ok(value.to_string())
}

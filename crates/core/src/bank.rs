//! # Bank Module

use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    pub id: Uuid,
    pub name: String,
    pub abbreviation: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Bank {
    /// Create a bank from a (trimmed, non-empty) name
    pub fn new(name: &str) -> CoreResult<Self> {
        let name = Self::validate_name(name)?;
        Ok(Self {
            id: Uuid::new_v4(),
            abbreviation: abbreviate(&name),
            name,
            is_active: true,
            created_at: Utc::now(),
        })
    }

    /// Rename the bank and recompute the abbreviation
    pub fn rename(&mut self, name: &str) -> CoreResult<()> {
        let name = Self::validate_name(name)?;
        self.abbreviation = abbreviate(&name);
        self.name = name;
        Ok(())
    }

    fn validate_name(name: &str) -> CoreResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::validation("bank name cannot be empty"));
        }
        Ok(name.to_string())
    }
}

/// First three characters uppercased, or the whole name when shorter.
pub fn abbreviate(name: &str) -> String {
    name.chars().take(3).collect::<String>().to_uppercase()
}

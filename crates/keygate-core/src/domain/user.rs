// ============================================================================
// Keygate Core - User Entity
// File: crates/keygate-core/src/domain/user.rs
// ============================================================================
//! User domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use keygate_shared::utils::normalize_email;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct User {
    pub id: Uuid,

    #[validate(email(message = "Invalid email address"))]
    #[validate(length(max = 255, message = "Email too long"))]
    pub email: String,

    #[serde(skip_serializing)]
    pub password_hash: String,

    #[validate(length(max = 100, message = "First name too long"))]
    pub first_name: String,

    #[validate(length(max = 100, message = "Last name too long"))]
    pub last_name: String,

    pub is_active: bool,

    // Audit fields
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
    pub removed_at: Option<DateTime<Utc>>,
}

impl User {
    /// Create a new active user; the email is normalized to lowercase
    pub fn new(
        email: String,
        password_hash: String,
        first_name: String,
        last_name: String,
    ) -> Result<Self, validator::ValidationErrors> {
        let user = Self {
            id: keygate_shared::new_id(),
            email: normalize_email(&email),
            password_hash,
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            is_active: true,
            created_at: Utc::now(),
            modified_at: None,
            removed_at: None,
        };

        user.validate()?;
        Ok(user)
    }

    pub fn is_deleted(&self) -> bool {
        self.removed_at.is_some()
    }

    /// Only active, non-deleted accounts may authenticate
    pub fn can_login(&self) -> bool {
        self.is_active && !self.is_deleted()
    }

    pub fn full_name(&self) -> String {
        match (self.first_name.is_empty(), self.last_name.is_empty()) {
            (false, false) => format!("{} {}", self.first_name, self.last_name),
            (false, true) => self.first_name.clone(),
            (true, false) => self.last_name.clone(),
            (true, true) => self.email.clone(),
        }
    }
}

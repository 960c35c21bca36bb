//! User primitives.
//!
//! Every other record in the engine hangs off a `User` by `id`. Auth is
//! email + password; emails are stored lowercased so lookups are
//! case-insensitive.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        name: String,
        email: String,
        password: String,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if name.trim().is_empty() {
            return Err(EngineError::InvalidAmount(
                "name must not be empty".to_string(),
            ));
        }
        let email = email.trim().to_ascii_lowercase();
        // Minimal sanity check, not full RFC validation.
        if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
            return Err(EngineError::InvalidAmount(format!(
                "invalid email: {email}"
            )));
        }
        if password.len() < 4 {
            return Err(EngineError::InvalidAmount(
                "password must be at least 4 characters".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            email,
            password,
            created_at,
        })
    }

    pub fn verify_password(&self, candidate: &str) -> bool {
        self.password == candidate
    }
}

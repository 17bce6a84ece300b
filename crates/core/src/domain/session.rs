use anyhow::ensure;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A mock signed-in user. Passed explicitly to whatever needs it; nothing here is
/// authenticated or stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub signed_in_at: DateTime<Utc>,
}

impl Session {
    pub fn sign_in(name: &str, email: &str) -> anyhow::Result<Self> {
        let name = name.trim().to_string();
        ensure!(!name.is_empty(), "name must be non-empty");

        let email = email.trim().to_string();
        ensure!(!email.is_empty(), "email must be non-empty");
        ensure!(email.contains('@'), "email must contain '@' (got {email})");

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            email,
            signed_in_at: Utc::now(),
        })
    }

    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

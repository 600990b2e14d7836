//! Cottage domain entity

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A rentable cottage listed by an owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cottage {
    pub id: String,
    pub name: String,
    pub location: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

impl Cottage {
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
        owner_id: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            location: location.into(),
            owner_id: owner_id.into(),
            created_at,
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }
}

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Durable user record, kept in sync with the identity provider.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Storage-assigned ID, stable for the record's lifetime.
    pub id: String,
    /// Subject identifier issued by the identity provider. Immutable,
    /// at most one record per value.
    pub external_id: String,
    /// Display name, overwritten on every sync event.
    pub name: String,
    /// When the record was first created from a sync event.
    pub created_at: DateTime<Utc>,
    /// When the record was last touched by a sync event.
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(external_id: String, name: String) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            external_id,
            name,
            created_at: now,
            updated_at: now,
        }
    }
}

use std::path::Path;
use std::sync::Mutex;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::user::User;

/// SQLite-backed user store.
///
/// Exposes single-record primitives only: insert, unique lookup by
/// `external_id`, name patch by primary key, delete by primary key. Each
/// statement is atomic; callers compose them without extra locking.
pub struct UserStore {
    conn: Mutex<Connection>,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("IO error: {0}")]
    IoError(String),
}

impl UserStore {
    pub fn new(database_url: &str) -> Result<Self, StoreError> {
        // Parse sqlite: prefix if present
        let path = if database_url.starts_with("sqlite:") {
            &database_url[7..]
        } else {
            database_url
        };

        // Create parent directories if needed
        if path != ":memory:" {
            if let Some(parent) = Path::new(path).parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StoreError::IoError(e.to_string()))?;
            }
        }

        let conn = Connection::open(path)
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                external_id TEXT NOT NULL,
                name TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        ).map_err(|e| StoreError::DatabaseError(e.to_string()))?;

        // Uniqueness of external_id is enforced here, not by the primary key
        conn.execute(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_users_external_id ON users(external_id)",
            [],
        ).map_err(|e| StoreError::DatabaseError(e.to_string()))?;

        tracing::info!("User store initialized with database: {}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Insert a new user record.
    pub fn insert(&self, user: &User) -> Result<(), StoreError> {
        let conn = self.conn.lock()
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;

        conn.execute(
            "INSERT INTO users (id, external_id, name, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user.id,
                user.external_id,
                user.name,
                user.created_at.to_rfc3339(),
                user.updated_at.to_rfc3339(),
            ],
        ).map_err(|e| StoreError::DatabaseError(e.to_string()))?;

        tracing::debug!("Inserted user {} for external id {}", user.id, user.external_id);
        Ok(())
    }

    /// Look up a user by the provider-issued external id.
    pub fn find_by_external_id(&self, external_id: &str) -> Result<Option<User>, StoreError> {
        let conn = self.conn.lock()
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;

        conn.query_row(
            "SELECT id, external_id, name, created_at, updated_at
             FROM users WHERE external_id = ?1",
            params![external_id],
            |row| {
                Ok(User {
                    id: row.get(0)?,
                    external_id: row.get(1)?,
                    name: row.get(2)?,
                    created_at: parse_timestamp(&row.get::<_, String>(3)?),
                    updated_at: parse_timestamp(&row.get::<_, String>(4)?),
                })
            },
        )
        .optional()
        .map_err(|e| StoreError::DatabaseError(e.to_string()))
    }

    /// Patch the display name of an existing record, keyed by primary key.
    pub fn update_name(
        &self,
        id: &str,
        name: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let conn = self.conn.lock()
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;

        conn.execute(
            "UPDATE users SET name = ?1, updated_at = ?2 WHERE id = ?3",
            params![name, updated_at.to_rfc3339(), id],
        ).map_err(|e| StoreError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    /// Remove a record, keyed by primary key. No tombstone is kept.
    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock()
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;

        conn.execute("DELETE FROM users WHERE id = ?1", params![id])
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;

        tracing::debug!("Deleted user {}", id);
        Ok(())
    }

    /// Number of stored records.
    pub fn count(&self) -> Result<u64, StoreError> {
        let conn = self.conn.lock()
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;

        conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get::<_, i64>(0))
            .map(|n| n as u64)
            .map_err(|e| StoreError::DatabaseError(e.to_string()))
    }
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_store() -> UserStore {
        UserStore::new(":memory:").unwrap()
    }

    #[test]
    fn test_insert_and_find() {
        let store = memory_store();
        let user = User::new("ext_1".to_string(), "Ada Lovelace".to_string());
        store.insert(&user).unwrap();

        let found = store.find_by_external_id("ext_1").unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(found.external_id, "ext_1");
        assert_eq!(found.name, "Ada Lovelace");
    }

    #[test]
    fn test_find_missing_returns_none() {
        let store = memory_store();
        assert!(store.find_by_external_id("ext_missing").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_external_id_is_rejected() {
        let store = memory_store();
        store.insert(&User::new("ext_1".to_string(), "Ada".to_string())).unwrap();

        let result = store.insert(&User::new("ext_1".to_string(), "Grace".to_string()));
        assert!(matches!(result, Err(StoreError::DatabaseError(_))));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_update_name_keeps_identity() {
        let store = memory_store();
        let user = User::new("ext_1".to_string(), "Ada Lovelace".to_string());
        store.insert(&user).unwrap();

        store.update_name(&user.id, "Grace Hopper", Utc::now()).unwrap();

        let found = store.find_by_external_id("ext_1").unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(found.name, "Grace Hopper");
    }

    #[test]
    fn test_delete_removes_record() {
        let store = memory_store();
        let user = User::new("ext_1".to_string(), "Ada Lovelace".to_string());
        store.insert(&user).unwrap();

        store.delete(&user.id).unwrap();

        assert!(store.find_by_external_id("ext_1").unwrap().is_none());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("users.db");
        let url = format!("sqlite:{}", db_path.display());

        let user = User::new("ext_1".to_string(), "Ada Lovelace".to_string());
        {
            let store = UserStore::new(&url).unwrap();
            store.insert(&user).unwrap();
        }

        let store = UserStore::new(&url).unwrap();
        let found = store.find_by_external_id("ext_1").unwrap().unwrap();
        assert_eq!(found.id, user.id);
    }
}

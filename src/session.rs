use std::sync::Mutex;

use rusqlite::{params, OptionalExtension};

use crate::db::DbPool;
use crate::error::ClientResult;

/// Key under which the bearer token lives in local storage.
pub const TOKEN_KEY: &str = "localJWT";

/// Narrow persisted-token interface. Validity is never tracked here; a
/// stale token is only discovered when an authenticated request fails.
pub trait TokenStore: Send + Sync {
    /// Persist `token`, replacing whatever was stored before.
    fn save(&self, token: &str) -> ClientResult<()>;

    fn read(&self) -> ClientResult<Option<String>>;

    fn clear(&self) -> ClientResult<()>;
}

/// Token store backed by the SQLite `local_storage` table.
pub struct SqliteTokenStore {
    pool: DbPool,
}

impl SqliteTokenStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl TokenStore for SqliteTokenStore {
    fn save(&self, token: &str) -> ClientResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO local_storage (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
               value = excluded.value,
               updated_at = datetime('now')",
            params![TOKEN_KEY, token],
        )?;
        tracing::debug!("Session token saved");
        Ok(())
    }

    fn read(&self) -> ClientResult<Option<String>> {
        let conn = self.pool.get()?;
        let token = conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                params![TOKEN_KEY],
                |row| row.get(0),
            )
            .optional()?;
        Ok(token)
    }

    fn clear(&self) -> ClientResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM local_storage WHERE key = ?1", params![TOKEN_KEY])?;
        tracing::debug!("Session token cleared");
        Ok(())
    }
}

/// Process-local token store.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn save(&self, token: &str) -> ClientResult<()> {
        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
        Ok(())
    }

    fn read(&self) -> ClientResult<Option<String>> {
        Ok(self.token.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn clear(&self) -> ClientResult<()> {
        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

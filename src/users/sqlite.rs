//! SQLite-backed [`UserStore`].
//!
//! One connection behind a mutex. WAL mode and a busy timeout keep
//! concurrent requests from tripping over each other; the mutex serialises
//! them inside this process.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, SubsecRound, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::{debug, warn};

use super::model::{Profile, User};
use super::store::{StoreError, UserStore};

const COLUMNS: &str = "id, name, email, created_at, updated_at";
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Backend(e.to_string())
    }
}

/// SQLite user store.
pub struct SqliteUserStore {
    conn: Mutex<Connection>,
}

impl SqliteUserStore {
    /// Opens (or creates) the database at `path` and ensures the schema.
    ///
    /// `":memory:"` opens a private in-memory database.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "opened user database");
        Self::initialize(conn)
    }

    /// In-memory database, gone when the store is dropped.
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::initialize(Connection::open_in_memory()?)
    }

    fn initialize(conn: Connection) -> Result<Self, StoreError> {
        // Best effort: in-memory databases refuse WAL and keep going.
        let _ = conn.pragma_update(None, "journal_mode", "WAL");
        let _ = conn.pragma_update(None, "synchronous", "NORMAL");
        conn.busy_timeout(BUSY_TIMEOUT)?;

        // AUTOINCREMENT: a deleted user's id is never handed out again.
        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                name       TEXT NOT NULL,
                email      TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(Self { conn: Mutex::new(conn) })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        match self.conn.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("user database mutex was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }
}

/// Current time at the column's stored precision, so a value read back
/// compares equal to the one returned from the write.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        profile: Profile { name: row.get(1)?, email: row.get(2)? },
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

impl UserStore for SqliteUserStore {
    fn find_all(&self) -> Result<Vec<User>, StoreError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM users ORDER BY id"))?;
        let users = stmt
            .query_map([], user_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    fn find_by_key(&self, id: i64) -> Result<User, StoreError> {
        self.conn()
            .query_row(
                &format!("SELECT {COLUMNS} FROM users WHERE id = ?1"),
                params![id],
                user_from_row,
            )
            .optional()?
            .ok_or(StoreError::NotFound)
    }

    fn insert(&self, profile: &Profile) -> Result<User, StoreError> {
        let at = now();
        let conn = self.conn();
        conn.execute(
            "INSERT INTO users (name, email, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
            params![profile.name, profile.email, at],
        )?;

        Ok(User {
            id: conn.last_insert_rowid(),
            profile: profile.clone(),
            created_at: at,
            updated_at: at,
        })
    }

    fn update(&self, user: &User) -> Result<User, StoreError> {
        let at = now();
        let changed = self.conn().execute(
            "UPDATE users SET name = ?1, email = ?2, updated_at = ?3 WHERE id = ?4",
            params![user.profile.name, user.profile.email, at, user.id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(User { updated_at: at, ..user.clone() })
    }

    fn delete(&self, user: &User) -> Result<(), StoreError> {
        let changed = self
            .conn()
            .execute("DELETE FROM users WHERE id = ?1", params![user.id])?;
        if changed == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

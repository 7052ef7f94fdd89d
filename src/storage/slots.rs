use std::path::Path;

use rusqlite::{Connection, OptionalExtension, Result as SqlResult, params};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Slot holding the serialized chat log.
pub const CHAT_MESSAGES: &str = "chat_messages";
/// Slot holding the registered accounts.
pub const ACCOUNTS: &str = "accounts";
/// Slot holding the signed-in account's email.
pub const SESSION: &str = "session";

/// Durable key-value area. Each slot holds one JSON blob that is
/// read wholesale at startup and overwritten wholesale on every
/// change; there is no incremental diffing.
pub struct SlotStore {
    conn: Connection,
}

impl SlotStore {
    /// Open or create a store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> SqlResult<Self> {
        Self::with_connection(Connection::open(path)?)
    }

    /// Volatile store for tests and previews.
    pub fn in_memory() -> SqlResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> SqlResult<Self> {
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> SqlResult<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS slots (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Load a slot, falling back to `T::default()` when the slot is
    /// absent, unreadable, or holds a blob that fails to parse. A
    /// corrupt blob is a recoverable condition: it is logged and the
    /// caller starts from the default, never from a panic.
    pub fn load<T>(&self, key: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        let raw = match self.read_raw(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return T::default(),
            Err(err) => {
                log::warn!("Failed to read slot `{key}`: {err}");
                return T::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("Slot `{key}` holds a corrupt blob ({err}); using the default");
                T::default()
            }
        }
    }

    /// Overwrite a slot with the serialized value.
    pub fn save<T>(&self, key: &str, value: &T) -> SqlResult<()>
    where
        T: Serialize + ?Sized,
    {
        let json = serde_json::to_string(value)
            .map_err(|err| rusqlite::Error::ToSqlConversionFailure(Box::new(err)))?;
        self.conn.execute(
            "INSERT OR REPLACE INTO slots (key, value) VALUES (?1, ?2)",
            params![key, json],
        )?;
        Ok(())
    }

    /// Remove a slot entirely.
    pub fn clear(&self, key: &str) -> SqlResult<()> {
        self.conn
            .execute("DELETE FROM slots WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn read_raw(&self, key: &str) -> SqlResult<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM slots WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
    }

    #[cfg(test)]
    fn write_raw(&self, key: &str, value: &str) -> SqlResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO slots (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

//! SQLite-backed client registry
//!
//! One store file, two tables: the namespace set and the fields inside each
//! namespace. SQLite gives single-writer, multi-reader access across
//! processes; writes take the lock up front (`BEGIN IMMEDIATE`) and every
//! lock wait is bounded by the busy timeout.

use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::path::Path;
use std::time::Duration;

use crate::error::StoreError;
use crate::traits::ClientStore;
use crate::types::ClientRecord;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS clients (
    uuid TEXT PRIMARY KEY
);

CREATE TABLE IF NOT EXISTS fields (
    uuid TEXT NOT NULL,
    name TEXT NOT NULL,
    value TEXT NOT NULL,
    PRIMARY KEY (uuid, name)
);
"#;

/// Client registry handle
///
/// Opened once per invocation and dropped at exit.
pub struct ClientRegistry {
    conn: Connection,
}

impl ClientRegistry {
    /// Open or create the registry at `path`
    ///
    /// `lock_timeout` bounds every wait for another process's lock,
    /// including the schema setup done here.
    pub fn open(path: impl AsRef<Path>, lock_timeout: Duration) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        conn.busy_timeout(lock_timeout)?;
        conn.execute_batch(SCHEMA)?;

        tracing::debug!("Opened client registry {:?}", path);
        Ok(Self { conn })
    }

    /// Create an empty registry that lives only as long as the handle
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }
}

fn write_field(
    tx: &rusqlite::Transaction<'_>,
    client: &str,
    field: &str,
    value: &str,
) -> rusqlite::Result<()> {
    if value.is_empty() {
        tx.execute(
            "DELETE FROM fields WHERE uuid = ?1 AND name = ?2",
            params![client, field],
        )?;
    } else {
        tx.execute(
            "INSERT INTO fields (uuid, name, value) VALUES (?1, ?2, ?3)
             ON CONFLICT (uuid, name) DO UPDATE SET value = excluded.value",
            params![client, field, value],
        )?;
    }
    Ok(())
}

impl ClientStore for ClientRegistry {
    fn put_fields(&mut self, client: &str, fields: &[(&str, &str)]) -> Result<(), StoreError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute(
            "INSERT OR IGNORE INTO clients (uuid) VALUES (?1)",
            params![client],
        )?;
        for (field, value) in fields {
            write_field(&tx, client, field, value)?;
        }

        tx.commit()?;
        Ok(())
    }

    fn update(&mut self, client: &str, field: &str, value: &str) -> Result<bool, StoreError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let exists = tx
            .query_row(
                "SELECT 1 FROM clients WHERE uuid = ?1",
                params![client],
                |_| Ok(()),
            )
            .optional()?
            .is_some();

        if exists {
            write_field(&tx, client, field, value)?;
            tx.commit()?;
        }
        Ok(exists)
    }

    fn get(&self, client: &str, field: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM fields WHERE uuid = ?1 AND name = ?2",
                params![client, field],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn contains(&self, client: &str) -> Result<bool, StoreError> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM clients WHERE uuid = ?1",
                params![client],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn delete(&mut self, client: &str) -> Result<bool, StoreError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute("DELETE FROM fields WHERE uuid = ?1", params![client])?;
        let removed = tx.execute("DELETE FROM clients WHERE uuid = ?1", params![client])?;

        tx.commit()?;
        Ok(removed > 0)
    }

    fn for_each(
        &self,
        visitor: &mut dyn FnMut(&ClientRecord) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT c.uuid, f.name, f.value
             FROM clients c LEFT JOIN fields f ON f.uuid = c.uuid
             ORDER BY c.uuid, f.name",
        )?;
        let mut rows = stmt.query([])?;

        let mut current: Option<ClientRecord> = None;
        while let Some(row) = rows.next()? {
            let uuid: String = row.get(0)?;
            let name: Option<String> = row.get(1)?;
            let value: Option<String> = row.get(2)?;

            if current.as_ref().map(|r| r.uuid != uuid).unwrap_or(true) {
                if let Some(done) = current.take() {
                    visitor(&done)?;
                }
                current = Some(ClientRecord::new(uuid));
            }

            if let (Some(record), Some(name), Some(value)) = (current.as_mut(), name, value) {
                record.fields.insert(name, value);
            }
        }

        if let Some(done) = current {
            visitor(&done)?;
        }
        Ok(())
    }
}

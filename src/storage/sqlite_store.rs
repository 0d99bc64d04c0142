use super::KeyValueStore;
use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::{
    path::Path,
    sync::{Arc, Mutex},
};

const KV_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS kv (key TEXT NOT NULL UNIQUE, value BLOB NOT NULL, updated INTEGER DEFAULT (cast(strftime('%s','now') as int)), PRIMARY KEY (key));";

#[derive(Clone)]
pub struct SqliteKeyValueStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteKeyValueStore {
    pub fn new<T: AsRef<Path>>(db_path: T) -> Result<Self> {
        let conn = Connection::open(db_path).context("Failed to open key/value database")?;
        conn.execute(KV_SCHEMA, [])
            .context("Failed to create kv table")?;

        Ok(SqliteKeyValueStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let value = stmt.query_row(params![key], |row| row.get(0));
        match value {
            Ok(bytes) => Ok(Some(bytes)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read kv key {}", key)),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2) ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated = cast(strftime('%s','now') as int)",
            params![key, value],
        )
        .with_context(|| format!("Failed to write kv key {}", key))?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM kv WHERE key = ?1", params![key])
            .with_context(|| format!("Failed to delete kv key {}", key))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use tempfile::TempDir;

    fn create_tmp_store() -> (SqliteKeyValueStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let temp_file_path = temp_dir.path().join("test.db");
        let store = SqliteKeyValueStore::new(&temp_file_path).unwrap();
        (store, temp_dir)
    }

    #[test]
    fn absent_key_reads_as_none() {
        let (store, _temp_dir) = create_tmp_store();

        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn set_then_get_round_trips() {
        let (store, _temp_dir) = create_tmp_store();

        store.set("saved_playlists", b"[1,2,3]").unwrap();
        assert_eq!(
            store.get("saved_playlists").unwrap(),
            Some(b"[1,2,3]".to_vec())
        );
    }

    #[test]
    fn set_replaces_previous_value() {
        let (store, _temp_dir) = create_tmp_store();

        store.set("k", b"first").unwrap();
        store.set("k", b"second").unwrap();
        assert_eq!(store.get("k").unwrap(), Some(b"second".to_vec()));
    }

    #[test]
    fn delete_removes_key() {
        let (store, _temp_dir) = create_tmp_store();

        store.set("k", b"v").unwrap();
        store.delete("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);

        // Deleting again is fine
        store.delete("k").unwrap();
    }

    #[test]
    fn values_survive_reopening_the_database() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        {
            let store = SqliteKeyValueStore::new(&db_path).unwrap();
            store.set("k", b"persisted").unwrap();
        }

        let reopened = SqliteKeyValueStore::new(&db_path).unwrap();
        assert_eq!(reopened.get("k").unwrap(), Some(b"persisted".to_vec()));
    }
}

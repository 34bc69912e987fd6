use rusqlite::Connection;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::errors::{WatchError, WatchResult};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS seen_entries (
    id BLOB PRIMARY KEY NOT NULL,
    value BLOB NOT NULL DEFAULT x''
) WITHOUT ROWID;
"#;

#[derive(Clone)]
pub struct SqliteStorage {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> WatchResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        // A mark must be on disk before the notification for it goes out.
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |_| Ok(()))?;
        conn.pragma_update(None, "synchronous", "FULL")?;
        Self::init(conn)
    }

    pub fn in_memory() -> WatchResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> WatchResult<Self> {
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn connection(&self) -> Result<std::sync::MutexGuard<'_, Connection>, WatchError> {
        self.conn
            .lock()
            .map_err(|_| WatchError::Database(rusqlite::Error::InvalidQuery))
    }

    /// Checkpoint the write-ahead log and close the connection. If other
    /// handles to this storage are still alive, only the checkpoint happens.
    pub fn close(self) -> WatchResult<()> {
        {
            let conn = self.connection()?;
            conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))?;
        }

        match Arc::try_unwrap(self.conn) {
            Ok(mutex) => {
                let conn = mutex
                    .into_inner()
                    .map_err(|_| WatchError::Database(rusqlite::Error::InvalidQuery))?;
                conn.close().map_err(|(_, e)| WatchError::Database(e))
            }
            Err(_) => Ok(()),
        }
    }
}

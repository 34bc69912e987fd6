use rusqlite::TransactionBehavior;

use crate::errors::WatchResult;
use crate::storage::sqlite::SqliteStorage;
use crate::storage::traits::SeenStore;

pub struct SqliteSeenRepository {
    storage: SqliteStorage,
}

impl SqliteSeenRepository {
    pub fn new(storage: SqliteStorage) -> Self {
        Self { storage }
    }
}

impl SeenStore for SqliteSeenRepository {
    fn has_seen(&self, entry_id: &str) -> WatchResult<bool> {
        let conn = self.storage.connection()?;
        let mut stmt =
            conn.prepare_cached("SELECT EXISTS(SELECT 1 FROM seen_entries WHERE id = ?1)")?;
        let exists: bool = stmt.query_row([entry_id.as_bytes()], |row| row.get(0))?;
        Ok(exists)
    }

    fn check_and_mark(&self, entry_id: &str) -> WatchResult<bool> {
        let mut conn = self.storage.connection()?;
        // IMMEDIATE takes the write lock before the read, so a second writer
        // on the same file cannot slip in between the check and the insert.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM seen_entries WHERE id = ?1)",
            [entry_id.as_bytes()],
            |row| row.get(0),
        )?;

        if exists {
            tx.commit()?;
            return Ok(false);
        }

        tx.execute(
            "INSERT INTO seen_entries (id) VALUES (?1)",
            [entry_id.as_bytes()],
        )?;
        tx.commit()?;

        Ok(true)
    }

    fn count(&self) -> WatchResult<u64> {
        let conn = self.storage.connection()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM seen_entries", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn close(self) -> WatchResult<()> {
        self.storage.close()
    }
}

//! Query-only connections for file-backed databases.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use fieldsense_core::errors::StorageError;
use rusqlite::{Connection, OpenFlags};

use super::pragmas::apply_read_pragmas;
use crate::migrations::{self, LATEST_VERSION};

/// Read connections handed out idle-first.
pub struct ReadPool {
    readers: Vec<Mutex<Connection>>,
    cursor: AtomicUsize,
}

impl ReadPool {
    /// Open `size` query-only connections. The writer must have migrated the
    /// file already: every reader has to see the schema this build expects.
    pub fn open(path: &Path, size: usize) -> Result<Self, StorageError> {
        let readers = (0..size.max(1))
            .map(|_| open_reader(path).map(Mutex::new))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            readers,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Run `f` on the first idle reader. When all are busy, wait on the next
    /// one in rotation.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        if let Some(guard) = self.readers.iter().find_map(|r| r.try_lock().ok()) {
            return f(&guard);
        }
        let idx = self.cursor.fetch_add(1, Ordering::Relaxed) % self.readers.len();
        let guard = self.readers[idx]
            .lock()
            .map_err(|_| StorageError::SqliteError {
                message: "reader lock poisoned".to_string(),
            })?;
        f(&guard)
    }

    pub fn size(&self) -> usize {
        self.readers.len()
    }
}

fn open_reader(path: &Path) -> Result<Connection, StorageError> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(StorageError::sqlite)?;
    apply_read_pragmas(&conn)?;

    let version = migrations::current_version(&conn)?;
    if version != LATEST_VERSION {
        return Err(StorageError::MigrationFailed {
            version,
            message: format!("reader sees schema version {version}, expected {LATEST_VERSION}"),
        });
    }
    Ok(conn)
}

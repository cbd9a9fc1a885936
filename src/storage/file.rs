//! JSON-file-based storage backend.
//!
//! Stores the transaction list in `transactions.json` under a configurable
//! directory (default: `$XDG_DATA_HOME/expense-tracker-rs/`).

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{Result, TrackerError};
use crate::models::Transaction;

/// Application name used for the XDG data directory.
const APP_NAME: &str = "expense-tracker-rs";

/// File holding the transaction list.
const TRANSACTIONS_FILE: &str = "transactions.json";
/// Sentinel file used for cross-process file locking.
const LOCK_FILE: &str = "storage.lock";

/// File-backed storage that persists the ledger as a JSON array.
///
/// Writes go to a temporary file that is then renamed over
/// `transactions.json`, so readers never observe a partial file.
///
/// # Concurrency
///
/// An in-process [`Mutex`] serializes access within one process; an
/// advisory lock on `storage.lock` (via [`std::fs::File::lock`] /
/// [`std::fs::File::lock_shared`]) covers other processes. Loads take a
/// shared lock, saves and clears an exclusive one.
///
/// # File layout
///
/// ```text
/// <dir>/
///   storage.lock          (cross-process lock sentinel)
///   transactions.json
/// ```
#[derive(Debug)]
pub struct FileStorage {
    /// Root directory containing the data files.
    dir: PathBuf,
    /// Mutex serializing concurrent in-process access.
    lock: Mutex<()>,
    /// Sentinel file for cross-process advisory locking.
    lock_file: fs::File,
}

impl FileStorage {
    /// Creates a new file storage rooted at the given directory.
    ///
    /// Creates the directory (and parents) if it does not exist, and opens
    /// (or creates) the `storage.lock` sentinel.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the lock
    /// file cannot be opened.
    #[inline]
    pub fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir).map_err(storage_io_error)?;
        let lock_file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(dir.join(LOCK_FILE))
            .map_err(storage_io_error)?;
        Ok(Self {
            dir,
            lock: Mutex::new(()),
            lock_file,
        })
    }

    /// Returns the default XDG-compliant data directory for this application.
    ///
    /// On Linux: `$XDG_DATA_HOME/expense-tracker-rs/` (typically
    /// `~/.local/share/expense-tracker-rs/`).
    ///
    /// # Errors
    ///
    /// Returns an error if the platform data directory cannot be determined.
    #[inline]
    pub fn default_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|data_path| data_path.join(APP_NAME))
            .ok_or_else(|| {
                TrackerError::Storage("could not determine platform data directory".into())
            })
    }

    /// Directory this storage writes into.
    #[inline]
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of the transactions file.
    #[inline]
    #[must_use]
    pub fn transactions_path(&self) -> PathBuf {
        self.dir.join(TRANSACTIONS_FILE)
    }

    /// Acquires the in-process guard and a shared file lock, runs `op`,
    /// then releases the file lock.
    fn with_shared_lock<R, F: FnOnce() -> Result<R>>(&self, op: F) -> Result<R> {
        let _guard: MutexGuard<'_, ()> = self.lock.lock().map_err(|err| lock_poison_error(&err))?;
        self.lock_file.lock_shared().map_err(storage_io_error)?;
        let result = op();
        // The original error wins over an unlock failure.
        if let Err(err) = self.lock_file.unlock()
            && result.is_ok()
        {
            return Err(storage_io_error(err));
        }
        result
    }

    /// Acquires the in-process guard and an exclusive file lock, runs
    /// `op`, then releases the file lock.
    fn with_exclusive_lock<R, F: FnOnce() -> Result<R>>(&self, op: F) -> Result<R> {
        let _guard: MutexGuard<'_, ()> = self.lock.lock().map_err(|err| lock_poison_error(&err))?;
        self.lock_file.lock().map_err(storage_io_error)?;
        let result = op();
        if let Err(err) = self.lock_file.unlock()
            && result.is_ok()
        {
            return Err(storage_io_error(err));
        }
        result
    }

    /// Reads the transactions file; a missing file is an empty list.
    fn read_transactions(&self) -> Result<Vec<Transaction>> {
        match fs::read_to_string(self.transactions_path()) {
            Ok(contents) => serde_json::from_str(&contents).map_err(TrackerError::from),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(storage_io_error(err)),
        }
    }

    /// Atomically writes the transactions file (write-to-tmp then rename).
    fn write_transactions(&self, transactions: &[Transaction]) -> Result<()> {
        let path = self.transactions_path();
        let tmp_path = self.dir.join(format!("{TRANSACTIONS_FILE}.tmp"));
        let json = serde_json::to_string_pretty(transactions).map_err(TrackerError::from)?;
        fs::write(&tmp_path, json).map_err(storage_io_error)?;
        fs::rename(&tmp_path, &path).map_err(storage_io_error)?;
        Ok(())
    }
}

/// Wraps an I/O error into a [`TrackerError::Storage`].
fn storage_io_error(err: std::io::Error) -> TrackerError {
    TrackerError::Storage(Box::new(err))
}

/// Wraps a mutex poison error into a [`TrackerError::Storage`].
fn lock_poison_error<T>(err: &PoisonError<T>) -> TrackerError {
    TrackerError::Storage(err.to_string().into())
}

impl super::LedgerStorage for FileStorage {
    #[inline]
    fn load(&self) -> Result<Vec<Transaction>> {
        self.with_shared_lock(|| self.read_transactions())
    }

    #[inline]
    fn save(&self, transactions: &[Transaction]) -> Result<()> {
        self.with_exclusive_lock(|| self.write_transactions(transactions))
    }

    #[inline]
    fn clear(&self) -> Result<()> {
        self.with_exclusive_lock(|| match fs::remove_file(self.transactions_path()) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(storage_io_error(err)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NaiveDate, TransactionId};
    use crate::storage::LedgerStorage as _;

    /// Helper to create a [`FileStorage`] in a temporary directory.
    fn temp_storage() -> (FileStorage, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        (storage, dir)
    }

    /// Creates a minimal test transaction.
    fn test_transaction(id: i64, description: &str, amount: f64) -> Transaction {
        Transaction {
            id: TransactionId::new(id),
            description: description.to_owned(),
            amount,
            category: "food".to_owned(),
            date: NaiveDate::from_ymd_opt(2024, 1, 6).unwrap(),
        }
    }

    #[test]
    fn new_creates_directory_and_lock_file() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        let storage = FileStorage::new(nested.clone()).unwrap();
        assert!(nested.join(LOCK_FILE).exists());
        assert_eq!(storage.dir(), nested.as_path());
    }

    #[test]
    fn load_missing_file_is_empty() {
        let (storage, _dir) = temp_storage();
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_preserves_order() {
        let (storage, _dir) = temp_storage();
        let items = vec![
            test_transaction(2, "Lunch", -12.5),
            test_transaction(1, "Salary", 1000.0),
        ];
        storage.save(&items).unwrap();
        assert_eq!(storage.load().unwrap(), items);
        assert!(!storage.dir().join("transactions.json.tmp").exists());
    }

    #[test]
    fn file_is_a_plain_json_array() {
        let (storage, _dir) = temp_storage();
        storage.save(&[test_transaction(5, "Tea", -3.0)]).unwrap();
        let raw = fs::read_to_string(storage.transactions_path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let first = &value[0];
        assert_eq!(first["id"], 5);
        assert_eq!(first["description"], "Tea");
        assert_eq!(first["date"], "2024-01-06");
    }

    #[test]
    fn malformed_file_is_a_serialization_error() {
        let (storage, _dir) = temp_storage();
        fs::write(storage.transactions_path(), "{not json").unwrap();
        assert!(matches!(
            storage.load(),
            Err(TrackerError::Serialization(_))
        ));
    }

    #[test]
    fn clear_removes_file_and_tolerates_absence() {
        let (storage, _dir) = temp_storage();
        storage.clear().unwrap();
        storage.save(&[test_transaction(1, "Tea", -3.0)]).unwrap();
        storage.clear().unwrap();
        assert!(!storage.transactions_path().exists());
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn default_dir_ends_with_app_name() {
        if let Ok(dir) = FileStorage::default_dir() {
            assert!(dir.ends_with(APP_NAME));
        }
    }
}

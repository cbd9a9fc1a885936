//! Pluggable persistence for the ledger.
//!
//! The ledger hands the whole ordered transaction list to the backend after
//! every mutation and reads it back once on startup. Backends persist the
//! list verbatim, order included.

#[cfg(feature = "storage-file")]
mod file;
mod memory;

#[cfg(feature = "storage-file")]
pub use file::FileStorage;
pub use memory::InMemoryStorage;

use crate::error::Result;
use crate::models::Transaction;

/// Storage backend for the ordered transaction list.
///
/// All methods take `&self`; implementations use interior mutability
/// (e.g. `Mutex`) for thread-safe mutation.
pub trait LedgerStorage: core::fmt::Debug + Send + Sync {
    /// Returns the persisted list, newest first.
    ///
    /// Returns an empty list if nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot read or decode its data.
    fn load(&self) -> Result<Vec<Transaction>>;

    /// Replaces the persisted list with `transactions`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to write.
    fn save(&self, transactions: &[Transaction]) -> Result<()>;

    /// Removes all persisted data.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to write.
    fn clear(&self) -> Result<()>;
}

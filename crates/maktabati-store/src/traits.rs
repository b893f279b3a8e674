use maktabati_types::{BlobRecord, Id, KeyedUpload, UploadRecord};

use crate::error::StoreResult;

/// Attachment byte store, keyed by caller-supplied ids.
///
/// All implementations must satisfy these invariants:
/// - Keys come from the caller, so a ref can be built before the write
///   completes and linked into the tree only after it succeeds.
/// - `put` overwrites an existing record with the same id.
/// - The store never interprets record contents.
pub trait BlobStore: Send + Sync {
    /// Store a record under `record.id`.
    fn put(&self, record: &BlobRecord) -> StoreResult<()>;

    /// Read a record. Returns `Ok(None)` if it does not exist.
    fn get(&self, id: &str) -> StoreResult<Option<BlobRecord>>;

    /// Delete a record. Returns `true` if it existed.
    fn delete(&self, id: &str) -> StoreResult<bool>;

    /// Every stored record. Only export needs this; there is no query API.
    fn all(&self) -> StoreResult<Vec<BlobRecord>>;

    /// Remove every record.
    fn clear(&self) -> StoreResult<()>;

    fn exists(&self, id: &str) -> StoreResult<bool> {
        Ok(self.get(id)?.is_some())
    }

    /// Delete many records as one logical step.
    ///
    /// Every deletion is attempted even if an earlier one fails; the call
    /// returns once all of them have finished. The first error wins,
    /// otherwise the number of records that existed.
    fn delete_batch(&self, ids: &[Id]) -> StoreResult<usize> {
        let mut removed = 0;
        let mut first_err = None;
        for id in ids {
            match self.delete(id.as_str()) {
                Ok(true) => removed += 1,
                Ok(false) => tracing::warn!(%id, "attachment already missing from blob store"),
                Err(e) => {
                    tracing::warn!(%id, error = %e, "blob deletion failed");
                    first_err.get_or_insert(e);
                }
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(removed),
        }
    }
}

/// Append-only log of visitor submissions.
///
/// Keys are assigned by the log on append and never reused. Listing returns
/// records in append order.
pub trait UploadLog: Send + Sync {
    /// Append a record and return the key assigned to it.
    fn append(&self, record: &UploadRecord) -> StoreResult<Id>;

    fn get(&self, key: &str) -> StoreResult<Option<UploadRecord>>;

    /// All records with their keys, oldest first.
    fn list(&self) -> StoreResult<Vec<KeyedUpload>>;

    /// Delete one record. Returns `true` if it existed.
    fn delete(&self, key: &str) -> StoreResult<bool>;

    fn clear(&self) -> StoreResult<()>;

    fn len(&self) -> StoreResult<usize> {
        Ok(self.list()?.len())
    }

    fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}

/// Synchronous string storage: the stand-in for browser local and session
/// storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove a key. Returns `true` if it existed.
    fn remove(&self, key: &str) -> StoreResult<bool>;
}

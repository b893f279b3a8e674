use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use maktabati_types::{BlobRecord, Id, IdKind, KeyedUpload, UploadRecord};

use crate::error::{StoreError, StoreResult};
use crate::traits::{BlobStore, KeyValueStore, UploadLog};

/// In-memory, HashMap-based blob store.
///
/// Intended for tests and embedding. Records are cloned on read/write. An
/// optional byte quota makes writes fail the way a full browser database does.
pub struct InMemoryBlobStore {
    records: RwLock<HashMap<Id, BlobRecord>>,
    quota: Option<u64>,
}

impl InMemoryBlobStore {
    /// Create a new empty store with no quota.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            quota: None,
        }
    }

    /// Create a store that rejects writes pushing total size past `bytes`.
    pub fn with_quota(bytes: u64) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            quota: Some(bytes),
        }
    }

    /// Number of records currently stored.
    pub fn len(&self) -> usize {
        self.records.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total bytes across all stored records.
    pub fn total_bytes(&self) -> u64 {
        self.records
            .read()
            .map(|m| m.values().map(BlobRecord::size).sum())
            .unwrap_or(0)
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BlobStore for InMemoryBlobStore {
    fn put(&self, record: &BlobRecord) -> StoreResult<()> {
        let mut map = self.records.write().map_err(|_| StoreError::Poisoned)?;
        if let Some(quota) = self.quota {
            let used: u64 = map
                .values()
                .filter(|r| r.id != record.id)
                .map(BlobRecord::size)
                .sum();
            let available = quota.saturating_sub(used);
            if record.size() > available {
                return Err(StoreError::QuotaExceeded {
                    needed: record.size(),
                    available,
                });
            }
        }
        map.insert(record.id.clone(), record.clone());
        Ok(())
    }

    fn get(&self, id: &str) -> StoreResult<Option<BlobRecord>> {
        let map = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(id).cloned())
    }

    fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut map = self.records.write().map_err(|_| StoreError::Poisoned)?;
        Ok(map.remove(id).is_some())
    }

    fn all(&self) -> StoreResult<Vec<BlobRecord>> {
        let map = self.records.read().map_err(|_| StoreError::Poisoned)?;
        let mut records: Vec<BlobRecord> = map.values().cloned().collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(records)
    }

    fn clear(&self) -> StoreResult<()> {
        self.records
            .write()
            .map_err(|_| StoreError::Poisoned)?
            .clear();
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBlobStore")
            .field("record_count", &self.len())
            .field("quota", &self.quota)
            .finish()
    }
}

/// In-memory upload log. Keeps append order in a `Vec`.
#[derive(Debug, Default)]
pub struct InMemoryUploadLog {
    records: Mutex<Vec<KeyedUpload>>,
}

impl InMemoryUploadLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UploadLog for InMemoryUploadLog {
    fn append(&self, record: &UploadRecord) -> StoreResult<Id> {
        let key = Id::generate(IdKind::Upload);
        self.records
            .lock()
            .map_err(|_| StoreError::Poisoned)?
            .push(KeyedUpload {
                key: key.clone(),
                record: record.clone(),
            });
        Ok(key)
    }

    fn get(&self, key: &str) -> StoreResult<Option<UploadRecord>> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(records
            .iter()
            .find(|u| u.key == key)
            .map(|u| u.record.clone()))
    }

    fn list(&self) -> StoreResult<Vec<KeyedUpload>> {
        Ok(self
            .records
            .lock()
            .map_err(|_| StoreError::Poisoned)?
            .clone())
    }

    fn delete(&self, key: &str) -> StoreResult<bool> {
        let mut records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        let before = records.len();
        records.retain(|u| u.key != key);
        Ok(records.len() != before)
    }

    fn clear(&self) -> StoreResult<()> {
        self.records
            .lock()
            .map_err(|_| StoreError::Poisoned)?
            .clear();
        Ok(())
    }
}

/// In-memory string store. Lives as long as the process, which makes it the
/// natural backend for session-scoped state.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    values: RwLock<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let map = self.values.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.values
            .write()
            .map_err(|_| StoreError::Poisoned)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        let mut map = self.values.write().map_err(|_| StoreError::Poisoned)?;
        Ok(map.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob(id: &str, bytes: usize) -> BlobRecord {
        BlobRecord::new(Id::parse(id).unwrap(), format!("{id}.bin"), "application/octet-stream", vec![7u8; bytes])
    }

    // -----------------------------------------------------------------------
    // Blob store
    // -----------------------------------------------------------------------

    #[test]
    fn put_and_get() {
        let store = InMemoryBlobStore::new();
        store.put(&blob("f-1", 16)).unwrap();
        let back = store.get("f-1").unwrap().expect("should exist");
        assert_eq!(back.data.len(), 16);
        assert_eq!(back.name, "f-1.bin");
    }

    #[test]
    fn put_overwrites_same_id() {
        let store = InMemoryBlobStore::new();
        store.put(&blob("f-1", 16)).unwrap();
        store.put(&blob("f-1", 4)).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("f-1").unwrap().unwrap().size(), 4);
    }

    #[test]
    fn delete_present_and_missing() {
        let store = InMemoryBlobStore::new();
        store.put(&blob("f-1", 1)).unwrap();
        assert!(store.delete("f-1").unwrap());
        assert!(!store.exists("f-1").unwrap());
        assert!(!store.delete("f-1").unwrap());
    }

    #[test]
    fn get_missing_returns_none() {
        let store = InMemoryBlobStore::new();
        assert!(store.get("nope").unwrap().is_none());
    }

    #[test]
    fn all_and_clear() {
        let store = InMemoryBlobStore::new();
        store.put(&blob("b", 1)).unwrap();
        store.put(&blob("a", 2)).unwrap();
        let ids: Vec<String> = store.all().unwrap().into_iter().map(|r| r.id.into_string()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(store.total_bytes(), 3);
        store.clear().unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn quota_rejects_oversized_write_and_keeps_state() {
        let store = InMemoryBlobStore::with_quota(100);
        store.put(&blob("a", 60)).unwrap();
        let err = store.put(&blob("b", 50)).unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { needed: 50, available: 40 }));
        assert!(store.get("b").unwrap().is_none());
        // Replacing a record only counts the new size.
        store.put(&blob("a", 100)).unwrap();
    }

    #[test]
    fn delete_batch_counts_existing() {
        let store = InMemoryBlobStore::new();
        store.put(&blob("a", 1)).unwrap();
        store.put(&blob("b", 1)).unwrap();
        let ids = vec![Id::from_static("a"), Id::from_static("b"), Id::from_static("ghost")];
        assert_eq!(store.delete_batch(&ids).unwrap(), 2);
        assert!(store.is_empty());
    }

    // -----------------------------------------------------------------------
    // Upload log
    // -----------------------------------------------------------------------

    #[test]
    fn append_assigns_distinct_keys_in_order() {
        let log = InMemoryUploadLog::new();
        let k1 = log.append(&UploadRecord::new("a", "first", vec![])).unwrap();
        let k2 = log.append(&UploadRecord::new("b", "second", vec![])).unwrap();
        assert_ne!(k1, k2);
        let listed = log.list().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].key, k1);
        assert_eq!(listed[1].record.message, "second");
    }

    #[test]
    fn delete_and_clear_uploads() {
        let log = InMemoryUploadLog::new();
        let k1 = log.append(&UploadRecord::new("a", "x", vec![])).unwrap();
        log.append(&UploadRecord::new("b", "y", vec![])).unwrap();
        assert!(log.delete(k1.as_str()).unwrap());
        assert!(!log.delete(k1.as_str()).unwrap());
        assert!(log.get(k1.as_str()).unwrap().is_none());
        assert_eq!(log.len().unwrap(), 1);
        log.clear().unwrap();
        assert!(log.is_empty().unwrap());
    }

    // -----------------------------------------------------------------------
    // Key-value
    // -----------------------------------------------------------------------

    #[test]
    fn kv_set_get_remove() {
        let kv = InMemoryKeyValueStore::new();
        assert!(kv.get("k").unwrap().is_none());
        kv.set("k", "v1").unwrap();
        kv.set("k", "v2").unwrap();
        assert_eq!(kv.get("k").unwrap().as_deref(), Some("v2"));
        assert!(kv.remove("k").unwrap());
        assert!(!kv.remove("k").unwrap());
    }
}

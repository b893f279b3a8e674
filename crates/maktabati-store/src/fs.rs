//! Directory-backed stores.
//!
//! Every write goes to a temp file in the target directory and is renamed
//! into place, so a crash leaves either the old value or the new one.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use sha2::{Digest, Sha256};

use maktabati_types::{BlobRecord, Id, IdKind, KeyedUpload, UploadRecord};

use crate::error::{StoreError, StoreResult};
use crate::traits::{BlobStore, KeyValueStore, UploadLog};

const BLOB_EXT: &str = "blob";
const KV_EXT: &str = "kv";
const UPLOAD_LOG_FILE: &str = "uploads.json";

/// Longest hex stem used verbatim. Longer keys are hashed so the file name
/// stays well under the usual 255-byte limit.
const MAX_HEX_STEM: usize = 200;

/// File stem for a key: `k` + hex of the key, or `h` + SHA-256 hex when the
/// hex form would be too long. The leading letter keeps the stem non-empty
/// and the two forms disjoint.
fn file_stem(key: &str) -> String {
    let encoded = hex::encode(key.as_bytes());
    if encoded.len() <= MAX_HEX_STEM {
        format!("k{encoded}")
    } else {
        format!("h{}", hex::encode(Sha256::digest(key.as_bytes())))
    }
}

fn write_atomic(dir: &Path, target: &Path, bytes: &[u8]) -> StoreResult<()> {
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(target).map_err(|e| StoreError::Io(e.error))?;
    Ok(())
}

fn read_optional(path: &Path) -> StoreResult<Option<Vec<u8>>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn remove_optional(path: &Path) -> StoreResult<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

// ---------------------------------------------------------------------------
// FsBlobStore
// ---------------------------------------------------------------------------

/// One bincode-encoded file per record. File names are derived from the id
/// by [`file_stem`], so ids from imported bundles can never escape the
/// directory and any id, however long, maps to a usable name. The id itself
/// is read back from the record.
#[derive(Debug)]
pub struct FsBlobStore {
    dir: PathBuf,
}

impl FsBlobStore {
    /// Open (creating if needed) a blob store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.{BLOB_EXT}", file_stem(id)))
    }

    fn decode(path: &Path, bytes: &[u8]) -> StoreResult<BlobRecord> {
        bincode::deserialize(bytes).map_err(|e| StoreError::CorruptRecord {
            key: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn blob_paths(&self) -> StoreResult<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().map(|e| e == BLOB_EXT).unwrap_or(false) {
                paths.push(path);
            }
        }
        Ok(paths)
    }
}

impl BlobStore for FsBlobStore {
    fn put(&self, record: &BlobRecord) -> StoreResult<()> {
        let bytes =
            bincode::serialize(record).map_err(|e| StoreError::Serialization(e.to_string()))?;
        write_atomic(&self.dir, &self.path_for(record.id.as_str()), &bytes)?;
        tracing::debug!(id = %record.id, size = record.size(), "stored blob");
        Ok(())
    }

    fn get(&self, id: &str) -> StoreResult<Option<BlobRecord>> {
        let path = self.path_for(id);
        match read_optional(&path)? {
            Some(bytes) => Ok(Some(Self::decode(&path, &bytes)?)),
            None => Ok(None),
        }
    }

    fn exists(&self, id: &str) -> StoreResult<bool> {
        Ok(self.path_for(id).is_file())
    }

    fn delete(&self, id: &str) -> StoreResult<bool> {
        remove_optional(&self.path_for(id))
    }

    fn all(&self) -> StoreResult<Vec<BlobRecord>> {
        let mut records = Vec::new();
        for path in self.blob_paths()? {
            let bytes = std::fs::read(&path)?;
            records.push(Self::decode(&path, &bytes)?);
        }
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(records)
    }

    fn clear(&self) -> StoreResult<()> {
        for path in self.blob_paths()? {
            remove_optional(&path)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FsUploadLog
// ---------------------------------------------------------------------------

/// The whole log lives in one JSON file that is rewritten on every change.
/// Upload records are small (their bytes are in the blob store), so this
/// keeps append order without an index.
#[derive(Debug)]
pub struct FsUploadLog {
    dir: PathBuf,
    guard: Mutex<()>,
}

impl FsUploadLog {
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            guard: Mutex::new(()),
        })
    }

    fn path(&self) -> PathBuf {
        self.dir.join(UPLOAD_LOG_FILE)
    }

    fn load(&self) -> StoreResult<Vec<KeyedUpload>> {
        let path = self.path();
        match read_optional(&path)? {
            Some(bytes) => serde_json::from_slice(&bytes).map_err(|e| StoreError::CorruptRecord {
                key: path.display().to_string(),
                reason: e.to_string(),
            }),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, records: &[KeyedUpload]) -> StoreResult<()> {
        let bytes =
            serde_json::to_vec(records).map_err(|e| StoreError::Serialization(e.to_string()))?;
        write_atomic(&self.dir, &self.path(), &bytes)
    }
}

impl UploadLog for FsUploadLog {
    fn append(&self, record: &UploadRecord) -> StoreResult<Id> {
        let _lock = self.guard.lock().map_err(|_| StoreError::Poisoned)?;
        let mut records = self.load()?;
        let key = Id::generate(IdKind::Upload);
        records.push(KeyedUpload {
            key: key.clone(),
            record: record.clone(),
        });
        self.save(&records)?;
        Ok(key)
    }

    fn get(&self, key: &str) -> StoreResult<Option<UploadRecord>> {
        let _lock = self.guard.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(self
            .load()?
            .into_iter()
            .find(|u| u.key == key)
            .map(|u| u.record))
    }

    fn list(&self) -> StoreResult<Vec<KeyedUpload>> {
        let _lock = self.guard.lock().map_err(|_| StoreError::Poisoned)?;
        self.load()
    }

    fn delete(&self, key: &str) -> StoreResult<bool> {
        let _lock = self.guard.lock().map_err(|_| StoreError::Poisoned)?;
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|u| u.key != key);
        if records.len() == before {
            return Ok(false);
        }
        self.save(&records)?;
        Ok(true)
    }

    fn clear(&self) -> StoreResult<()> {
        let _lock = self.guard.lock().map_err(|_| StoreError::Poisoned)?;
        self.save(&[])
    }
}

// ---------------------------------------------------------------------------
// FsKeyValueStore
// ---------------------------------------------------------------------------

/// One file per key, named by [`file_stem`]. Any non-blank key works,
/// including non-ASCII app names.
#[derive(Debug)]
pub struct FsKeyValueStore {
    dir: PathBuf,
}

impl FsKeyValueStore {
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        if key.trim().is_empty() {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.{KV_EXT}", file_stem(key))))
    }
}

impl KeyValueStore for FsKeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key)?;
        match read_optional(&path)? {
            Some(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|e| StoreError::CorruptRecord {
                    key: key.to_string(),
                    reason: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        write_atomic(&self.dir, &path, value.as_bytes())
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        remove_optional(&self.path_for(key)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob(id: &str, data: &[u8]) -> BlobRecord {
        BlobRecord::new(Id::parse(id).unwrap(), "doc.pdf", "application/pdf", data.to_vec())
    }

    #[test]
    fn blob_roundtrip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::open(dir.path().join("files")).unwrap();
        store.put(&blob("f-1", b"pdf bytes")).unwrap();

        let reopened = FsBlobStore::open(dir.path().join("files")).unwrap();
        let back = reopened.get("f-1").unwrap().expect("should exist");
        assert_eq!(back.data, b"pdf bytes");
        assert_eq!(back.mime, "application/pdf");
        assert!(reopened.exists("f-1").unwrap());
    }

    #[test]
    fn hostile_ids_stay_inside_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::open(dir.path()).unwrap();
        store.put(&blob("../../etc/passwd", b"x")).unwrap();
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
        assert!(store.get("../../etc/passwd").unwrap().is_some());
    }

    #[test]
    fn blob_delete_all_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::open(dir.path()).unwrap();
        store.put(&blob("b", b"2")).unwrap();
        store.put(&blob("a", b"1")).unwrap();
        assert_eq!(store.all().unwrap().len(), 2);
        assert_eq!(store.all().unwrap()[0].id, "a");

        assert!(store.delete("a").unwrap());
        assert!(!store.delete("a").unwrap());
        store.clear().unwrap();
        assert!(store.all().unwrap().is_empty());
    }

    #[test]
    fn corrupt_blob_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::open(dir.path()).unwrap();
        std::fs::write(store.path_for("bad"), b"\x01").unwrap();
        assert!(matches!(store.get("bad"), Err(StoreError::CorruptRecord { .. })));
    }

    #[test]
    fn upload_log_persists_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let log = FsUploadLog::open(dir.path()).unwrap();
        assert!(log.list().unwrap().is_empty());
        let k1 = log.append(&UploadRecord::new("a", "one", vec![])).unwrap();
        let k2 = log.append(&UploadRecord::new("b", "two", vec![])).unwrap();

        let reopened = FsUploadLog::open(dir.path()).unwrap();
        let listed = reopened.list().unwrap();
        assert_eq!(listed.iter().map(|u| u.key.clone()).collect::<Vec<_>>(), vec![k1.clone(), k2]);
        assert_eq!(reopened.get(k1.as_str()).unwrap().unwrap().message, "one");

        assert!(reopened.delete(k1.as_str()).unwrap());
        assert!(!reopened.delete(k1.as_str()).unwrap());
        reopened.clear().unwrap();
        assert!(reopened.is_empty().unwrap());
    }

    #[test]
    fn kv_store_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let kv = FsKeyValueStore::open(dir.path()).unwrap();
        kv.set("maktabati-meta", "{\"types\":[]}").unwrap();
        assert_eq!(kv.get("maktabati-meta").unwrap().as_deref(), Some("{\"types\":[]}"));
        assert!(kv.remove("maktabati-meta").unwrap());
        assert!(kv.get("maktabati-meta").unwrap().is_none());
    }

    #[test]
    fn kv_keys_never_escape_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let kv = FsKeyValueStore::open(dir.path().join("state")).unwrap();
        kv.set("../x", "v").unwrap();
        kv.set(".hidden", "h").unwrap();
        assert_eq!(kv.get("../x").unwrap().as_deref(), Some("v"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
        assert!(matches!(kv.remove(""), Err(StoreError::InvalidKey(_))));
        assert!(matches!(kv.set("  ", "v"), Err(StoreError::InvalidKey(_))));
    }

    #[test]
    fn kv_accepts_arabic_keys() {
        let dir = tempfile::tempdir().unwrap();
        let kv = FsKeyValueStore::open(dir.path()).unwrap();
        kv.set("مكتبتي-meta", "{}").unwrap();
        let reopened = FsKeyValueStore::open(dir.path()).unwrap();
        assert_eq!(reopened.get("مكتبتي-meta").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn long_ids_get_hashed_file_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::open(dir.path()).unwrap();
        let long = "f".repeat(200);
        store.put(&blob(&long, b"long")).unwrap();
        store.put(&blob("f-short", b"short")).unwrap();

        assert_eq!(store.get(&long).unwrap().unwrap().data, b"long");
        assert!(store.exists(&long).unwrap());
        let ids: Vec<String> = store.all().unwrap().into_iter().map(|r| r.id.into_string()).collect();
        assert_eq!(ids, vec!["f-short".to_string(), long.clone()]);
        assert!(store.delete(&long).unwrap());
        assert_eq!(store.all().unwrap().len(), 1);
    }

    #[test]
    fn every_stored_blob_is_listed() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::open(dir.path()).unwrap();
        let odd = BlobRecord::new(Id::from_static(""), "x", "text/plain", b"x".to_vec());
        store.put(&odd).unwrap();
        assert_eq!(store.all().unwrap().len(), 1);
        store.clear().unwrap();
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}

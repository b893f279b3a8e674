use std::path::Path;
use std::sync::Arc;

use maktabati_crypto::PasswordHasher;
use maktabati_gate::{AuthGate, LoginOutcome};
use maktabati_index::{find_by_id, outline, search, ContentTree, NodeEdit, OutlineEntry, SearchHit};
use maktabati_pack::{export_bundle, export_meta, import_bundle, import_meta, Bundle, ImportReport};
use maktabati_store::{
    BlobStore, FsBlobStore, FsKeyValueStore, FsUploadLog, InMemoryBlobStore, InMemoryKeyValueStore,
    InMemoryUploadLog, KeyValueStore, UploadLog,
};
use maktabati_types::{
    AttachmentRef, BlobRecord, Category, Id, IdKind, Item, KeyedUpload, MetadataDocument, UploadRecord,
};

use crate::config::{LibraryConfig, CONFIG_FILE_NAME};
use crate::error::{SdkError, SdkResult};
use crate::request::{NewFile, NodeView, Submission};

/// Name given to a category created without one.
pub const DEFAULT_CATEGORY_NAME: &str = "تصنيف جديد";
/// Icon given to a category created without one.
pub const DEFAULT_CATEGORY_ICON: &str = "🆕";
/// Name given to an item created without one.
pub const DEFAULT_ITEM_NAME: &str = "مادة جديدة";

/// The backends a [`Library`] runs on.
#[derive(Clone)]
pub struct Stores {
    /// Durable string storage holding the metadata document.
    pub state: Arc<dyn KeyValueStore>,
    /// Session-scoped storage holding the admin flag.
    pub session: Arc<dyn KeyValueStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub uploads: Arc<dyn UploadLog>,
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            state: Arc::new(InMemoryKeyValueStore::new()),
            session: Arc::new(InMemoryKeyValueStore::new()),
            blobs: Arc::new(InMemoryBlobStore::new()),
            uploads: Arc::new(InMemoryUploadLog::new()),
        }
    }

    /// Directory-backed stores under `data_dir`. The session lives in memory
    /// and ends with the process.
    pub fn open_dir(data_dir: &Path) -> SdkResult<Self> {
        Ok(Self {
            state: Arc::new(FsKeyValueStore::open(data_dir.join("state"))?),
            session: Arc::new(InMemoryKeyValueStore::new()),
            blobs: Arc::new(FsBlobStore::open(data_dir.join("files"))?),
            uploads: Arc::new(FsUploadLog::open(data_dir.join("uploads"))?),
        })
    }
}

/// What a successful delete removed.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct DeleteReport {
    pub id: Id,
    pub name: String,
    pub files_removed: usize,
}

/// One open content library.
///
/// `Library` owns the metadata document and is the only writer of it.
/// Commands that change the tree work on a copy, persist the copy, and only
/// then replace the in-memory document, so a failed save leaves the library
/// exactly as it was. Editor and inbox commands need an admin session; the
/// reader commands and visitor submissions do not.
pub struct Library {
    config: LibraryConfig,
    meta: MetadataDocument,
    state: Arc<dyn KeyValueStore>,
    blobs: Arc<dyn BlobStore>,
    uploads: Arc<dyn UploadLog>,
    gate: AuthGate,
}

impl Library {
    /// Open a library over the given stores, seeding the document on first
    /// use.
    pub fn open(config: LibraryConfig, stores: Stores) -> SdkResult<Self> {
        let gate = AuthGate::new(config.gate_config(), stores.session);
        let mut library = Self {
            meta: MetadataDocument::default(),
            config,
            state: stores.state,
            blobs: stores.blobs,
            uploads: stores.uploads,
            gate,
        };
        let mut doc = match library.state.get(&library.config.meta_key())? {
            Some(json) => MetadataDocument::from_json(&json)?,
            None => MetadataDocument::default(),
        };
        if doc.ensure_defaults() {
            tracing::info!(app = %library.config.app_name, "seeded empty library");
            library.save(doc)?;
        } else {
            library.meta = doc;
        }
        Ok(library)
    }

    /// A throwaway library with every store in memory.
    pub fn in_memory() -> SdkResult<Self> {
        Self::open(LibraryConfig::default(), Stores::in_memory())
    }

    /// Write `config` into `dir` and open the library it describes.
    pub fn init_dir(dir: &Path, config: LibraryConfig) -> SdkResult<Self> {
        let path = config.save(dir)?;
        tracing::info!(config = %path.display(), "library initialized");
        let stores = Stores::open_dir(&config.data_dir(dir))?;
        Self::open(config, stores)
    }

    /// Open the library initialized in `dir`.
    pub fn open_dir(dir: &Path) -> SdkResult<Self> {
        if !dir.join(CONFIG_FILE_NAME).is_file() {
            return Err(SdkError::Config(format!(
                "no library at {} (run init first)",
                dir.display()
            )));
        }
        let config = LibraryConfig::load(dir)?;
        let stores = Stores::open_dir(&config.data_dir(dir))?;
        Self::open(config, stores)
    }

    /// Replace the password hasher, e.g. with fewer iterations in tests.
    pub fn with_hasher(mut self, hasher: PasswordHasher) -> Self {
        self.gate = self.gate.with_hasher(hasher);
        self
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    pub fn meta(&self) -> &MetadataDocument {
        &self.meta
    }

    pub fn categories(&self) -> &[Category] {
        &self.meta.types
    }

    /// Persist `next` and make it the current document.
    fn save(&mut self, next: MetadataDocument) -> SdkResult<()> {
        let json = next.to_json()?;
        self.state.set(&self.config.meta_key(), &json)?;
        self.meta = next;
        Ok(())
    }

    /// Best-effort removal of blobs written by a command that then failed.
    fn discard_blobs(&self, ids: &[Id]) {
        if let Err(e) = self.blobs.delete_batch(ids) {
            tracing::warn!(error = %e, count = ids.len(), "orphan blobs left behind");
        }
    }

    // ---- Reader ----

    pub fn show(&self, id: &str) -> Option<NodeView> {
        find_by_id(&self.meta.types, id).map(|found| NodeView::from(&found))
    }

    pub fn outline(&self) -> Vec<OutlineEntry> {
        outline(&self.meta.types)
    }

    pub fn search(&self, term: &str) -> Vec<SearchHit> {
        search(&self.meta.types, term)
    }

    /// Stored file bytes for an attachment or visitor file id.
    pub fn get_file(&self, id: &str) -> SdkResult<Option<BlobRecord>> {
        Ok(self.blobs.get(id)?)
    }

    // ---- Admin session ----

    pub fn login(&self, password: &str) -> SdkResult<LoginOutcome> {
        Ok(self.gate.login(self.meta.password.as_ref(), password)?)
    }

    pub fn logout(&self) -> SdkResult<bool> {
        Ok(self.gate.logout()?)
    }

    pub fn is_admin(&self) -> SdkResult<bool> {
        Ok(self.gate.is_active()?)
    }

    pub fn has_password(&self) -> bool {
        self.meta.has_password()
    }

    /// Whether `password` matches the configured one. `false` when none is set.
    pub fn check_password(&self, password: &str) -> SdkResult<bool> {
        Ok(self.gate.verify(self.meta.password.as_ref(), password)?)
    }

    pub fn set_password(&mut self, password: &str) -> SdkResult<()> {
        self.gate.require_session()?;
        let mut next = self.meta.clone();
        self.gate.set_password(&mut next.password, password)?;
        self.save(next)
    }

    /// Back to open access. Also ends the current session.
    pub fn clear_password(&mut self) -> SdkResult<()> {
        self.gate.require_session()?;
        let mut next = self.meta.clone();
        self.gate.clear_password(&mut next.password);
        self.save(next)?;
        self.gate.logout()?;
        Ok(())
    }

    // ---- Editor ----

    pub fn add_category(&mut self, name: &str, icon: &str) -> SdkResult<Id> {
        self.gate.require_session()?;
        let category = Category::new(
            or_default(name, DEFAULT_CATEGORY_NAME),
            or_default(icon, DEFAULT_CATEGORY_ICON),
        );
        let id = category.id.clone();
        let mut next = self.meta.clone();
        ContentTree::new(&mut next.types).insert_category(category);
        self.save(next)?;
        tracing::info!(%id, "category added");
        Ok(id)
    }

    /// Add an item under a category or another item. `None` if the parent
    /// does not exist.
    pub fn add_item(&mut self, parent_id: &str, name: &str, content: &str) -> SdkResult<Option<Id>> {
        self.gate.require_session()?;
        let item = Item::new(or_default(name, DEFAULT_ITEM_NAME), content.trim());
        let id = item.id.clone();
        let mut next = self.meta.clone();
        if !ContentTree::new(&mut next.types).insert_item(parent_id, item) {
            return Ok(None);
        }
        self.save(next)?;
        tracing::info!(%id, parent = parent_id, "item added");
        Ok(Some(id))
    }

    /// Change a node's fields in place. `false` if the id is unknown or the
    /// edit is empty.
    pub fn edit(&mut self, id: &str, edit: &NodeEdit) -> SdkResult<bool> {
        self.gate.require_session()?;
        if edit.is_empty() {
            return Ok(false);
        }
        let mut next = self.meta.clone();
        if !ContentTree::new(&mut next.types).edit(id, edit) {
            return Ok(false);
        }
        self.save(next)?;
        tracing::info!(id, "node edited");
        Ok(true)
    }

    /// Delete a node with its whole subtree and every file attached beneath
    /// it. The document is saved first; then all blob deletions are
    /// attempted and the first failure, if any, is returned.
    pub fn delete_node(&mut self, id: &str) -> SdkResult<Option<DeleteReport>> {
        self.gate.require_session()?;
        let mut next = self.meta.clone();
        let Some(removed) = ContentTree::new(&mut next.types).remove(id) else {
            return Ok(None);
        };
        self.save(next)?;
        let files = removed.attachment_ids();
        let files_removed = self.blobs.delete_batch(&files)?;
        tracing::info!(id, files = files.len(), "node deleted");
        Ok(Some(DeleteReport {
            id: removed.id().clone(),
            name: removed.name().to_string(),
            files_removed,
        }))
    }

    /// Store a file and link it to an item. The bytes are written before the
    /// ref is linked, so a failure never leaves a ref without its blob.
    pub fn attach_file(&mut self, item_id: &str, file: NewFile) -> SdkResult<Option<AttachmentRef>> {
        self.gate.require_session()?;
        let is_item = find_by_id(&self.meta.types, item_id)
            .and_then(|found| found.node.as_item())
            .is_some();
        if !is_item {
            tracing::debug!(item = item_id, "attach to unknown item ignored");
            return Ok(None);
        }

        let record = BlobRecord::new(Id::generate(IdKind::File), file.name, file.mime, file.data);
        self.blobs.put(&record)?;
        let attachment = record.to_attachment_ref();

        let mut next = self.meta.clone();
        ContentTree::new(&mut next.types).attach(item_id, attachment.clone());
        if let Err(e) = self.save(next) {
            self.discard_blobs(std::slice::from_ref(&record.id));
            return Err(e);
        }
        tracing::info!(item = item_id, file = %attachment.id, size = attachment.size, "file attached");
        Ok(Some(attachment))
    }

    /// Unlink an attachment and delete its bytes.
    pub fn remove_attachment(&mut self, item_id: &str, attachment_id: &str) -> SdkResult<bool> {
        self.gate.require_session()?;
        let mut next = self.meta.clone();
        let Some(removed) = ContentTree::new(&mut next.types).detach(item_id, attachment_id) else {
            return Ok(false);
        };
        self.save(next)?;
        if !self.blobs.delete(removed.id.as_str())? {
            tracing::warn!(file = %removed.id, "attachment already missing from blob store");
        }
        tracing::info!(item = item_id, file = %removed.id, "attachment removed");
        Ok(true)
    }

    // ---- Visitor inbox ----

    /// Record a visitor message. Open to everyone; needs a message or at
    /// least one file. Returns the key the log assigned.
    pub fn submit_upload(&self, submission: Submission) -> SdkResult<Id> {
        let message = submission.message.trim().to_string();
        if message.is_empty() && submission.files.is_empty() {
            return Err(SdkError::EmptySubmission);
        }

        let mut refs = Vec::with_capacity(submission.files.len());
        let mut written = Vec::with_capacity(submission.files.len());
        for file in submission.files {
            let record = BlobRecord::new(Id::generate(IdKind::VisitorFile), file.name, file.mime, file.data);
            if let Err(e) = self.blobs.put(&record) {
                self.discard_blobs(&written);
                return Err(e.into());
            }
            refs.push(record.to_attachment_ref());
            written.push(record.id);
        }

        let record = UploadRecord::new(&submission.name, message, refs);
        match self.uploads.append(&record) {
            Ok(key) => {
                tracing::info!(%key, files = written.len(), "visitor upload received");
                Ok(key)
            }
            Err(e) => {
                self.discard_blobs(&written);
                Err(e.into())
            }
        }
    }

    /// Inbox contents, oldest first.
    pub fn list_uploads(&self) -> SdkResult<Vec<KeyedUpload>> {
        self.gate.require_session()?;
        Ok(self.uploads.list()?)
    }

    /// Delete one upload and the files it carried.
    pub fn delete_upload(&self, key: &str) -> SdkResult<bool> {
        self.gate.require_session()?;
        let Some(record) = self.uploads.get(key)? else {
            tracing::debug!(key, "delete of unknown upload ignored");
            return Ok(false);
        };
        let files: Vec<Id> = record.files.iter().map(|f| f.id.clone()).collect();
        self.uploads.delete(key)?;
        self.blobs.delete_batch(&files)?;
        tracing::info!(key, files = files.len(), "upload deleted");
        Ok(true)
    }

    /// Empty the inbox, deleting every file the uploads carried. Returns
    /// the number of uploads removed.
    pub fn clear_uploads(&self) -> SdkResult<usize> {
        self.gate.require_session()?;
        let all = self.uploads.list()?;
        let files: Vec<Id> = all
            .iter()
            .flat_map(|u| u.record.files.iter().map(|f| f.id.clone()))
            .collect();
        self.uploads.clear()?;
        self.blobs.delete_batch(&files)?;
        tracing::info!(uploads = all.len(), files = files.len(), "inbox cleared");
        Ok(all.len())
    }

    // ---- Backup ----

    pub fn export(&self) -> SdkResult<Bundle> {
        self.gate.require_session()?;
        Ok(export_bundle(&self.meta, self.blobs.as_ref(), self.uploads.as_ref())?)
    }

    /// Replace the whole library with a JSON bundle. A malformed bundle is
    /// rejected before anything is touched.
    pub fn import(&mut self, json: &str) -> SdkResult<ImportReport> {
        self.gate.require_session()?;
        let imported = import_bundle(json, self.blobs.as_ref(), self.uploads.as_ref())?;
        self.save(imported.meta)?;
        Ok(imported.report)
    }

    pub fn export_meta(&self) -> SdkResult<String> {
        self.gate.require_session()?;
        Ok(export_meta(&self.meta)?)
    }

    /// Replace the metadata document wholesale. Stores are untouched.
    pub fn import_meta(&mut self, json: &str) -> SdkResult<usize> {
        self.gate.require_session()?;
        let doc = import_meta(json)?;
        let categories = doc.types.len();
        self.save(doc)?;
        tracing::info!(categories, "metadata imported");
        Ok(categories)
    }
}

impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("config", &self.config)
            .field("categories", &self.meta.types.len())
            .field("gate", &self.gate)
            .finish()
    }
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    let value = value.trim();
    if value.is_empty() {
        default
    } else {
        value
    }
}

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{CacheError, CacheResult};
use crate::http::{Request, Response};
use crate::manifest::CacheManifest;
use crate::network::Network;
use crate::storage::CacheStorage;

/// Root documents tried, in order, when a navigation cannot reach the
/// network.
const ROOT_FALLBACKS: [&str; 2] = ["./", "./index.html"];

/// Cache-first front for a [`Network`].
pub struct OfflineCache {
    manifest: CacheManifest,
    storage: Arc<CacheStorage>,
    network: Arc<dyn Network>,
    claimed: AtomicBool,
}

impl OfflineCache {
    pub fn new(manifest: CacheManifest, storage: Arc<CacheStorage>, network: Arc<dyn Network>) -> Self {
        Self {
            manifest,
            storage,
            network,
            claimed: AtomicBool::new(false),
        }
    }

    pub fn manifest(&self) -> &CacheManifest {
        &self.manifest
    }

    pub fn storage(&self) -> &Arc<CacheStorage> {
        &self.storage
    }

    /// Whether [`activate`](Self::activate) has taken control of clients.
    pub fn is_claimed(&self) -> bool {
        self.claimed.load(Ordering::Acquire)
    }

    /// Fetch every manifest asset and store them in the current bucket.
    ///
    /// All-or-nothing: if any asset fails to fetch or answers with anything
    /// but `200`, the install fails and nothing is written.
    pub async fn install(&self) -> CacheResult<usize> {
        let version = &self.manifest.version;
        let mut fetched = Vec::with_capacity(self.manifest.assets.len());
        for asset in &self.manifest.assets {
            let response = self
                .network
                .fetch(&Request::get(asset.as_str()))
                .await
                .map_err(|e| CacheError::InstallFailed {
                    asset: asset.clone(),
                    reason: e.to_string(),
                })?;
            if response.status != 200 {
                return Err(CacheError::InstallFailed {
                    asset: asset.clone(),
                    reason: format!("status {}", response.status),
                });
            }
            fetched.push((asset.clone(), response));
        }
        let count = fetched.len();
        self.storage.open(version).await;
        self.storage.put_all(version, fetched).await;
        tracing::info!(version = %version, assets = count, "offline cache installed");
        Ok(count)
    }

    /// Delete every bucket not named by the current version and claim
    /// clients. Returns the names of the deleted buckets.
    pub async fn activate(&self) -> Vec<String> {
        let mut removed = Vec::new();
        for name in self.storage.keys().await {
            if name != self.manifest.version && self.storage.delete(&name).await {
                tracing::info!(bucket = %name, "stale cache bucket deleted");
                removed.push(name);
            }
        }
        self.claimed.store(true, Ordering::Release);
        removed
    }

    /// Serve a request.
    ///
    /// Non-cacheable requests go straight to the network. Otherwise a cache
    /// hit is returned without touching the network; a miss is fetched and,
    /// if storable, a copy is kept. When the network fails on a navigation,
    /// the cached root document is served instead.
    pub async fn fetch(&self, request: &Request) -> CacheResult<Response> {
        if !request.is_cacheable() {
            return self.network.fetch(request).await;
        }
        let version = &self.manifest.version;
        if let Some(hit) = self.storage.get(version, &request.url).await {
            tracing::debug!(url = %request.url, "cache hit");
            return Ok(hit);
        }
        match self.network.fetch(request).await {
            Ok(response) => {
                if response.is_storable() {
                    self.storage.put(version, &request.url, response.clone()).await;
                }
                Ok(response)
            }
            Err(err) if request.navigate => {
                for root in ROOT_FALLBACKS {
                    if let Some(doc) = self.storage.get(version, root).await {
                        tracing::debug!(url = %request.url, fallback = root, "offline navigation");
                        return Ok(doc);
                    }
                }
                Err(err)
            }
            Err(err) => Err(err),
        }
    }
}

impl std::fmt::Debug for OfflineCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OfflineCache")
            .field("manifest", &self.manifest)
            .field("claimed", &self.is_claimed())
            .finish()
    }
}

use std::collections::{BTreeMap, HashMap};

use tokio::sync::RwLock;

use crate::http::Response;

/// One cache bucket: request URL → stored response.
pub type Bucket = HashMap<String, Response>;

/// Named cache buckets held in memory. No eviction.
#[derive(Debug, Default)]
pub struct CacheStorage {
    buckets: RwLock<BTreeMap<String, Bucket>>,
}

impl CacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the bucket if it does not exist yet.
    pub async fn open(&self, name: &str) {
        self.buckets
            .write()
            .await
            .entry(name.to_string())
            .or_default();
    }

    pub async fn has(&self, name: &str) -> bool {
        self.buckets.read().await.contains_key(name)
    }

    /// Bucket names in sorted order.
    pub async fn keys(&self) -> Vec<String> {
        self.buckets.read().await.keys().cloned().collect()
    }

    pub async fn delete(&self, name: &str) -> bool {
        self.buckets.write().await.remove(name).is_some()
    }

    pub async fn get(&self, bucket: &str, url: &str) -> Option<Response> {
        self.buckets.read().await.get(bucket)?.get(url).cloned()
    }

    /// Store one response, creating the bucket on demand.
    pub async fn put(&self, bucket: &str, url: &str, response: Response) {
        self.buckets
            .write()
            .await
            .entry(bucket.to_string())
            .or_default()
            .insert(url.to_string(), response);
    }

    /// Store a batch under a single lock so readers never see half of it.
    pub async fn put_all(&self, bucket: &str, entries: Vec<(String, Response)>) {
        let mut buckets = self.buckets.write().await;
        let target = buckets.entry(bucket.to_string()).or_default();
        target.extend(entries);
    }

    pub async fn len(&self, bucket: &str) -> usize {
        self.buckets.read().await.get(bucket).map_or(0, HashMap::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_get_delete() {
        let storage = CacheStorage::new();
        assert!(storage.get("v1", "./").await.is_none());
        storage.put("v1", "./", Response::ok("root")).await;
        assert_eq!(storage.get("v1", "./").await.unwrap().body, "root");
        assert!(storage.get("v2", "./").await.is_none());
        assert!(storage.delete("v1").await);
        assert!(!storage.delete("v1").await);
        assert!(!storage.has("v1").await);
    }

    #[tokio::test]
    async fn keys_are_sorted() {
        let storage = CacheStorage::new();
        storage.open("b").await;
        storage.open("a").await;
        storage.open("a").await;
        assert_eq!(storage.keys().await, vec!["a", "b"]);
        assert_eq!(storage.len("a").await, 0);
    }

    #[tokio::test]
    async fn put_all_stores_batch() {
        let storage = CacheStorage::new();
        let entries = vec![
            ("./a".to_string(), Response::ok("a")),
            ("./b".to_string(), Response::ok("b")),
        ];
        storage.put_all("v1", entries).await;
        assert_eq!(storage.len("v1").await, 2);
    }
}

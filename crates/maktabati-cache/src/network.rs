use async_trait::async_trait;

use crate::error::CacheResult;
use crate::http::{Request, Response};

/// The real fetch the cache sits in front of.
///
/// An `Err` means no response was produced at all (offline, DNS, refused).
/// HTTP error statuses come back as `Ok` responses.
#[async_trait]
pub trait Network: Send + Sync {
    async fn fetch(&self, request: &Request) -> CacheResult<Response>;
}

/// Errors that can occur in the offline cache.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The network could not produce a response.
    #[error("network error: {0}")]
    Network(String),

    /// An asset could not be fetched during install. Nothing was stored.
    #[error("install failed on {asset}: {reason}")]
    InstallFailed { asset: String, reason: String },
}

pub type CacheResult<T> = Result<T, CacheError>;

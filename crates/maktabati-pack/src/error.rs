use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackError {
    #[error("malformed bundle: {0}")]
    Malformed(String),

    #[error("unsupported bundle version: {0}")]
    UnsupportedVersion(String),

    #[error("file {id} has invalid base64 data: {reason}")]
    InvalidFileData { id: String, reason: String },

    #[error("bundle contains a file with a blank id")]
    BlankFileId,

    #[error("duplicate file id in bundle: {0}")]
    DuplicateFile(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("storage error: {0}")]
    Store(#[from] maktabati_store::StoreError),
}

pub type PackResult<T> = Result<T, PackError>;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("a submission needs a message or at least one file")]
    EmptySubmission,

    #[error("config error: {0}")]
    Config(String),

    #[error("document error: {0}")]
    Document(#[from] maktabati_types::TypeError),

    #[error("store error: {0}")]
    Store(#[from] maktabati_store::StoreError),

    #[error(transparent)]
    Gate(#[from] maktabati_gate::GateError),

    #[error("bundle error: {0}")]
    Pack(#[from] maktabati_pack::PackError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SdkError {
    /// Whether the command was refused for lack of an admin session.
    pub fn is_not_authenticated(&self) -> bool {
        matches!(self, SdkError::Gate(maktabati_gate::GateError::NotAuthenticated))
    }
}

pub type SdkResult<T> = Result<T, SdkError>;

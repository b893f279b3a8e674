/// Errors that can occur in the admin gate.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// The command needs an active admin session.
    #[error("admin session required")]
    NotAuthenticated,

    /// A new password must not be empty.
    #[error("password must not be empty")]
    EmptyPassword,

    /// The stored password record is unreadable.
    #[error("password record error: {0}")]
    Crypto(#[from] maktabati_crypto::CryptoError),

    /// The session store failed.
    #[error("session store error: {0}")]
    Store(#[from] maktabati_store::StoreError),
}

pub type GateResult<T> = Result<T, GateError>;

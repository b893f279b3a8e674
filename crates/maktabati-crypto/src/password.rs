use maktabati_types::PasswordRecord;
use rand::RngCore;
use sha2::Sha256;

use crate::encoding::{decode_b64, encode_b64};

/// Derived hash size in bytes (256 bits).
pub const HASH_LEN: usize = 32;

/// Salt size in bytes. Every `set` draws a fresh salt of this size.
pub const SALT_LEN: usize = 16;

/// PBKDF2-HMAC-SHA256 password hasher with a fixed iteration count.
///
/// The output is base64 text so that stored hashes compare by plain string
/// equality, matching how the metadata document records them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PasswordHasher {
    iterations: u32,
}

impl PasswordHasher {
    /// The production setting: 100 000 iterations.
    pub const DEFAULT: Self = Self {
        iterations: 100_000,
    };

    /// A hasher with a custom iteration count. Hashes produced with one count
    /// never verify under another.
    pub const fn with_iterations(iterations: u32) -> Self {
        Self { iterations }
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Derive the base64 hash of `password` under `salt`.
    pub fn derive_hash(&self, password: &str, salt: &[u8]) -> String {
        let mut out = [0u8; HASH_LEN];
        pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, self.iterations, &mut out);
        encode_b64(&out)
    }

    /// Hash `password` under a freshly generated salt.
    pub fn new_record(&self, password: &str) -> PasswordRecord {
        let salt = generate_salt();
        PasswordRecord {
            hash: self.derive_hash(password, &salt),
            salt: encode_b64(&salt),
        }
    }

    /// Re-derive with the stored salt and compare to the stored hash.
    ///
    /// A record with an empty hash or salt never verifies.
    pub fn verify(&self, record: &PasswordRecord, password: &str) -> CryptoResult<bool> {
        if record.hash.is_empty() || record.salt.is_empty() {
            return Ok(false);
        }
        let salt = decode_b64(&record.salt)?;
        Ok(self.derive_hash(password, &salt) == record.hash)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Draw a random salt from the thread-local CSPRNG.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}

/// Errors from password operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("invalid base64: {0}")]
    InvalidBase64(String),
}

pub type CryptoResult<T> = Result<T, CryptoError>;

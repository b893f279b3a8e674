//! Password hashing primitives for Maktabati.
//!
//! Provides PBKDF2-HMAC-SHA256 key derivation with a fixed iteration count
//! and output size, random salt generation, and the base64 text encoding the
//! metadata document stores hashes and salts in.
//!
//! All crypto operations wrap established libraries; there is no custom cryptography.

pub mod encoding;
pub mod password;

pub use encoding::{decode_b64, encode_b64};
pub use password::{generate_salt, CryptoError, CryptoResult, PasswordHasher, HASH_LEN, SALT_LEN};

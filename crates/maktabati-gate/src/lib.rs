//! Admin password gate for Maktabati.
//!
//! The gate decides whether the current session may use the editor and the
//! visitor inbox. It is a deterrent for a single local user, not a security
//! boundary: there is no lockout, no attempt counter and no rate limiting,
//! and anyone with access to the storage directory can clear the password.
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use maktabati_crypto::PasswordHasher;
//! use maktabati_gate::{AuthGate, GateConfig, LoginOutcome};
//! use maktabati_store::InMemoryKeyValueStore;
//!
//! let gate = AuthGate::new(GateConfig::default(), Arc::new(InMemoryKeyValueStore::new()))
//!     .with_hasher(PasswordHasher::with_iterations(1_000));
//! let mut password = None;
//! gate.set_password(&mut password, "abc123").unwrap();
//! assert_eq!(gate.login(password.as_ref(), "wrong").unwrap(), LoginOutcome::Rejected);
//! assert_eq!(gate.login(password.as_ref(), "abc123").unwrap(), LoginOutcome::Granted);
//! assert!(gate.is_active().unwrap());
//! ```

pub mod config;
pub mod error;
pub mod gate;

pub use config::GateConfig;
pub use error::{GateError, GateResult};
pub use gate::{AuthGate, LoginOutcome, SESSION_ACTIVE};

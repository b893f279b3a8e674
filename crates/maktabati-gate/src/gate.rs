use std::sync::Arc;

use serde::Serialize;

use maktabati_crypto::PasswordHasher;
use maktabati_store::KeyValueStore;
use maktabati_types::PasswordRecord;

use crate::config::GateConfig;
use crate::error::{GateError, GateResult};

/// Value stored under the session key while a session is active.
pub const SESSION_ACTIVE: &str = "active";

/// Result of a login attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginOutcome {
    /// The password matched; the session is now active.
    Granted,
    /// No password is configured, so access is open; the session is active.
    OpenAccess,
    /// Wrong password. Nothing changed; the caller may simply ask again.
    Rejected,
}

impl LoginOutcome {
    pub fn is_granted(&self) -> bool {
        !matches!(self, LoginOutcome::Rejected)
    }
}

/// The admin gate.
///
/// The password record itself lives in the metadata document, which the
/// caller owns and persists; the gate only reads or replaces it through the
/// `&mut Option<PasswordRecord>` slot it is handed. The session flag lives in
/// a session-scoped [`KeyValueStore`] and is set by [`AuthGate::login`] only.
pub struct AuthGate {
    config: GateConfig,
    session: Arc<dyn KeyValueStore>,
    hasher: PasswordHasher,
}

impl AuthGate {
    pub fn new(config: GateConfig, session: Arc<dyn KeyValueStore>) -> Self {
        Self {
            config,
            session,
            hasher: PasswordHasher::DEFAULT,
        }
    }

    /// Replace the password hasher. Records hashed under one iteration count
    /// do not verify under another.
    pub fn with_hasher(mut self, hasher: PasswordHasher) -> Self {
        self.hasher = hasher;
        self
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    // ---------------------------------------------------------------
    // Password
    // ---------------------------------------------------------------

    /// Compare `password` against the stored record. No record means there
    /// is nothing to match, so this returns `false`.
    pub fn verify(&self, record: Option<&PasswordRecord>, password: &str) -> GateResult<bool> {
        match record {
            Some(record) => Ok(self.hasher.verify(record, password)?),
            None => Ok(false),
        }
    }

    /// Hash `password` under a fresh salt into `slot`. Re-salts every time,
    /// even for an unchanged password. The session is left as it is.
    pub fn set_password(&self, slot: &mut Option<PasswordRecord>, password: &str) -> GateResult<()> {
        if password.is_empty() {
            return Err(GateError::EmptyPassword);
        }
        *slot = Some(self.hasher.new_record(password));
        tracing::info!("admin password set");
        Ok(())
    }

    /// Remove the password from `slot` (open access).
    ///
    /// The session is left running: the caller persists the slot first and
    /// then calls [`AuthGate::logout`], so a failed save changes nothing.
    pub fn clear_password(&self, slot: &mut Option<PasswordRecord>) {
        *slot = None;
        tracing::info!("admin password cleared");
    }

    // ---------------------------------------------------------------
    // Session
    // ---------------------------------------------------------------

    /// Attempt to open an admin session.
    ///
    /// With no password configured the session opens immediately. Otherwise
    /// it opens only if `password` verifies. Failures are not counted.
    pub fn login(&self, record: Option<&PasswordRecord>, password: &str) -> GateResult<LoginOutcome> {
        let outcome = match record {
            None => LoginOutcome::OpenAccess,
            Some(_) if self.verify(record, password)? => LoginOutcome::Granted,
            Some(_) => LoginOutcome::Rejected,
        };
        if outcome.is_granted() {
            self.session.set(&self.config.session_key, SESSION_ACTIVE)?;
            tracing::info!(?outcome, "admin session opened");
        } else {
            tracing::info!("admin login rejected");
        }
        Ok(outcome)
    }

    /// End the session. Returns `true` if one was active.
    pub fn logout(&self) -> GateResult<bool> {
        Ok(self.session.remove(&self.config.session_key)?)
    }

    pub fn is_active(&self) -> GateResult<bool> {
        Ok(self.session.get(&self.config.session_key)?.as_deref() == Some(SESSION_ACTIVE))
    }

    /// `Ok(())` while a session is active, [`GateError::NotAuthenticated`]
    /// otherwise.
    pub fn require_session(&self) -> GateResult<()> {
        if self.is_active()? {
            Ok(())
        } else {
            Err(GateError::NotAuthenticated)
        }
    }
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate")
            .field("config", &self.config)
            .field("hasher", &self.hasher)
            .finish()
    }
}

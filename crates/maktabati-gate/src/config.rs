use serde::{Deserialize, Serialize};

/// Configuration for the admin gate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Session-store key holding the active-session marker.
    pub session_key: String,
}

impl GateConfig {
    /// The configuration for an app whose storage keys share `app_name` as
    /// their prefix.
    pub fn for_app(app_name: &str) -> Self {
        Self {
            session_key: format!("{app_name}-admin-session"),
        }
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self::for_app("maktabati")
    }
}

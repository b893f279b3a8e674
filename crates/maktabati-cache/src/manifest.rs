use serde::{Deserialize, Serialize};

/// Bucket name of the current release.
pub const DEFAULT_CACHE_VERSION: &str = "maktabati-v1.0.1";

/// Application shell assets cached on install.
pub const DEFAULT_ASSETS: &[&str] = &[
    "./",
    "./index.html",
    "./css/style.css",
    "./js/app.js",
    "./manifest.json",
    "./icons/icon-192x192.png",
    "./icons/icon-512x512.png",
    "./icons/maskable-icon.png",
];

/// A versioned list of assets. `version` doubles as the bucket name, so
/// bumping it makes the next activate discard the previous bucket.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheManifest {
    pub version: String,
    pub assets: Vec<String>,
}

impl CacheManifest {
    pub fn new(version: impl Into<String>, assets: Vec<String>) -> Self {
        Self {
            version: version.into(),
            assets,
        }
    }
}

impl Default for CacheManifest {
    fn default() -> Self {
        Self::new(
            DEFAULT_CACHE_VERSION,
            DEFAULT_ASSETS.iter().map(|a| a.to_string()).collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_manifest_lists_shell_assets() {
        let manifest = CacheManifest::default();
        assert_eq!(manifest.version, "maktabati-v1.0.1");
        assert_eq!(manifest.assets.len(), 8);
        assert_eq!(manifest.assets[0], "./");
        assert!(manifest.assets.iter().any(|a| a == "./js/app.js"));
    }

    #[test]
    fn manifest_serde() {
        let manifest = CacheManifest::new("v2", vec!["./a".into()]);
        let json = serde_json::to_string(&manifest).unwrap();
        assert_eq!(json, r#"{"version":"v2","assets":["./a"]}"#);
        let back: CacheManifest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, manifest);
    }
}

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use maktabati_cache::CacheManifest;
use maktabati_gate::GateConfig;

use crate::error::{SdkError, SdkResult};

/// Name of the config file inside a library directory.
pub const CONFIG_FILE_NAME: &str = "maktabati.toml";

/// Library settings, stored as TOML next to the data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Prefix of every storage key.
    pub app_name: String,
    /// Data directory, relative to the directory holding the config file.
    pub root: PathBuf,
    /// Offline cache bucket version and asset list.
    pub cache: CacheManifest,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            app_name: "maktabati".into(),
            root: PathBuf::from("."),
            cache: CacheManifest::default(),
        }
    }
}

impl LibraryConfig {
    /// Key under which the metadata document is stored.
    pub fn meta_key(&self) -> String {
        format!("{}-meta", self.app_name)
    }

    pub fn gate_config(&self) -> GateConfig {
        GateConfig::for_app(&self.app_name)
    }

    /// The data directory for a library rooted at `dir`.
    pub fn data_dir(&self, dir: &Path) -> PathBuf {
        dir.join(&self.root)
    }

    pub fn from_toml(text: &str) -> SdkResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| SdkError::Config(e.to_string()))?;
        if config.app_name.trim().is_empty() {
            return Err(SdkError::Config("app_name must not be empty".into()));
        }
        Ok(config)
    }

    pub fn to_toml(&self) -> SdkResult<String> {
        toml::to_string_pretty(self).map_err(|e| SdkError::Config(e.to_string()))
    }

    /// Read `<dir>/maktabati.toml`, or the defaults if there is none.
    pub fn load(dir: &Path) -> SdkResult<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        match std::fs::read_to_string(&path) {
            Ok(text) => Self::from_toml(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write `<dir>/maktabati.toml`, creating `dir` if needed.
    pub fn save(&self, dir: &Path) -> SdkResult<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(CONFIG_FILE_NAME);
        std::fs::write(&path, self.to_toml()?)?;
        Ok(path)
    }
}

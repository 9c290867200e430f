use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "MHike";
const DB_FILE_NAME: &str = "mhike.db";
const SETTINGS_FILE_NAME: &str = "settings.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            pool_size: default_pool_size(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

fn default_pool_size() -> u32 {
    4
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppPaths {
    pub root: PathBuf,
    pub db_path: PathBuf,
    pub photos_dir: PathBuf,
    pub settings_path: PathBuf,
}

impl AppPaths {
    /// Resolves the per-install data directory and creates it if needed.
    pub fn discover() -> Result<Self, crate::error::Error> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| crate::error::Error::Path("Failed to get app data dir".to_string()))?;
        Self::at(data_dir.join(APP_DIR_NAME))
    }

    /// Lays out the application files under an explicit root.
    pub fn at(root: impl Into<PathBuf>) -> Result<Self, crate::error::Error> {
        let root = root.into();
        let photos_dir = root.join("photos");
        std::fs::create_dir_all(&photos_dir)?;

        Ok(Self {
            db_path: root.join(DB_FILE_NAME),
            settings_path: root.join(SETTINGS_FILE_NAME),
            photos_dir,
            root,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub store: StoreConfig,
}

impl Settings {
    /// Reads `settings.json`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, crate::error::Error> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No settings at {}; using defaults", path.display());
                Ok(Self::default())
            }
            Err(err) => Err(err.into()),
        }
    }
}

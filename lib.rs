pub mod config;
pub mod db;
pub mod error;
pub mod form;
pub mod models;
pub mod photos;
pub mod schema;
pub mod store;

use crate::config::{AppPaths, Settings};
use crate::error::Result;
use crate::photos::PhotoLibrary;
use crate::store::HikeStore;

/// Everything the screens share. Built once at startup and handed to each
/// screen, so there is a single store handle for the life of the process.
#[derive(Clone)]
pub struct AppState {
    pub store: HikeStore,
    pub photos: PhotoLibrary,
    pub paths: AppPaths,
    pub settings: Settings,
}

impl AppState {
    pub fn init(paths: AppPaths) -> Result<Self> {
        let settings = Settings::load(&paths.settings_path)?;
        let store = HikeStore::open(&paths, &settings.store)?;
        let photos = PhotoLibrary::new(&paths.photos_dir);
        Ok(Self {
            store,
            photos,
            paths,
            settings,
        })
    }
}

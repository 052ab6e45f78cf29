use std::{fmt, sync::Arc};

use albumen_core::Catalog;

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Arc<Catalog>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    /// State backed by a catalog that reads tags with the EXIF parser.
    pub fn new(config: Config) -> Self {
        let catalog = Catalog::with_exif_parser(config.catalog_config());
        Self::with_catalog(config, catalog)
    }

    pub fn with_catalog(config: Config, catalog: Catalog) -> Self {
        Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

use albumen_core::CatalogConfig;
use std::env;
use std::path::PathBuf;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 3001;

#[derive(Debug, Clone)]
pub struct Config {
    // Server settings
    pub server_host: String,
    pub server_port: u16,

    // Photo settings
    pub photos_dir: PathBuf,
    /// Overrides the built-in image extension allow-list when set
    pub photo_extensions: Option<Vec<String>>,

    // CORS settings
    pub cors_allowed_origins: Vec<String>,

    // Development settings
    pub dev_mode: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_port = match lookup("SERVER_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid SERVER_PORT {raw:?}: {e}"))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            server_port,

            photos_dir: lookup("PHOTOS_DIR")
                .unwrap_or_else(|| "./photos".to_string())
                .into(),
            photo_extensions: lookup("PHOTO_EXTENSIONS")
                .map(|raw| split_list(&raw))
                .filter(|list| !list.is_empty()),

            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                .map(|raw| split_list(&raw))
                .unwrap_or_default(),

            dev_mode: lookup("DEV_MODE")
                .map(|raw| raw.trim().parse().unwrap_or(false))
                .unwrap_or(false),
        })
    }

    /// Catalog settings derived from this configuration.
    pub fn catalog_config(&self) -> CatalogConfig {
        let config = CatalogConfig::new(&self.photos_dir);
        match &self.photo_extensions {
            Some(extensions) => config.with_extensions(extensions),
            None => config,
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

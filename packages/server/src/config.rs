use std::collections::HashMap;
use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    #[serde(default)]
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    /// Pool size. Default: 5.
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Root of the sharded upload directory. Default: "uploads".
    pub upload_dir: PathBuf,
    /// Per-file upload limit in bytes. Default: 2 GiB.
    pub max_upload_size: u64,
}

/// Rating constants shared by every scoring operation.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct RatingConfig {
    /// Rating of a new record and the value `reset-elo` restores. Default: 1500.
    pub default_elo: f64,
    /// Maximum points exchanged per comparison. Default: 32.
    pub k_factor: f64,
}

pub const DEFAULT_ELO: f64 = 1500.0;
pub const K_FACTOR: f64 = 32.0;

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            default_elo: DEFAULT_ELO,
            k_factor: K_FACTOR,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TrimmerConfig {
    /// ffmpeg executable. Default: "ffmpeg".
    pub ffmpeg_bin: String,
}

/// Optional views that can be switched off. Unlisted features are enabled.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(transparent)]
pub struct FeatureFlags(HashMap<String, bool>);

impl FeatureFlags {
    pub fn is_enabled(&self, name: &str) -> bool {
        self.0.get(name).copied().unwrap_or(true)
    }

    pub fn with(mut self, name: &str, enabled: bool) -> Self {
        self.0.insert(name.to_string(), enabled);
        self
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub rating: RatingConfig,
    pub trimmer: TrimmerConfig,
    #[serde(default)]
    pub features: FeatureFlags,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("GALLERY_CONFIG").unwrap_or_else(|_| "config/config".to_string());

        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5002)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("database.url", "sqlite://gallery.db?mode=rwc")?
            .set_default("database.max_connections", 5)?
            .set_default("storage.upload_dir", "uploads")?
            .set_default("storage.max_upload_size", 2_u64 * 1024 * 1024 * 1024)?
            .set_default("rating.default_elo", DEFAULT_ELO)?
            .set_default("rating.k_factor", K_FACTOR)?
            .set_default("trimmer.ffmpeg_bin", "ffmpeg")?
            .add_source(File::with_name(&config_path).required(false))
            // Override from environment (e.g., GALLERY__SERVER__PORT)
            .add_source(Environment::with_prefix("GALLERY").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

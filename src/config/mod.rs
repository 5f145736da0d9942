use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;

use anyhow::{Context, Result, bail};
use axum::http::HeaderValue;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat};
use serde::Deserialize;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_GEM_ALLOWANCE: u32 = 16;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub store: StoreConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub interactions: InteractionConfig,
}

impl ApiConfig {
    /// Defaults, then `$AUDIOWAVE_API_CONFIG` (optional), then the
    /// `$AUDIOWAVE_API_ENV` overlay, then `$PORT`.
    pub fn load() -> Result<Self> {
        let configured_path = std::env::var("AUDIOWAVE_API_CONFIG")
            .unwrap_or_else(|_| "config/api.toml".to_string());
        assert!(
            configured_path.len() < 4096,
            "Configuration path length exceeds hard limit"
        );

        let mut builder = Config::builder()
            .add_source(File::new(&configured_path, FileFormat::Toml).required(false));

        if let Ok(env_override) = std::env::var("AUDIOWAVE_API_ENV") {
            if !env_override.is_empty() {
                let env_file = format!("config/api.{}.toml", env_override);
                if Path::new(&env_file).exists() {
                    builder = builder.add_source(File::new(&env_file, FileFormat::Toml));
                }
            }
        }

        let mut config = Self::from_builder(builder, &configured_path)?;
        if let Ok(port) = std::env::var("PORT") {
            config.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a valid port number, got {port:?}"))?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let builder = Config::builder().add_source(File::from_str(contents, FileFormat::Toml));
        let config = Self::from_builder(builder, "<inline>")?;
        config.validate()?;
        Ok(config)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>, path: &str) -> Result<Self> {
        let settings = builder
            .build()
            .map_err(|err| map_config_error(err, path))?;
        settings
            .try_deserialize()
            .context("Failed to deserialize API configuration")
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            bail!("Server port must be greater than zero");
        }
        self.cors.allowed_origin_values()?;
        if self.store.backend == StoreBackend::Database {
            if self.database.url.as_deref().is_none_or(str::is_empty) {
                bail!("database.url must be set when store.backend = \"database\"");
            }
            self.database.ensure_bounds()?;
        }
        self.cache.ensure_bounds()?;
        if self.interactions.gem_allowance == 0 {
            bail!("interactions.gem_allowance must be positive");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: Option<IpAddr>,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> SocketAddr {
        let host = self.host.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert!(self.port != 0, "HTTP port cannot be zero");
        SocketAddr::new(host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:5173".to_string()],
        }
    }
}

impl CorsConfig {
    pub fn allowed_origin_values(&self) -> Result<Vec<HeaderValue>> {
        if self.allowed_origins.is_empty() {
            bail!("cors.allowed_origins must list at least one origin");
        }
        self.allowed_origins
            .iter()
            .map(|origin| {
                if origin.trim() == "*" {
                    bail!("cors.allowed_origins must list explicit origins, not \"*\"");
                }
                HeaderValue::from_str(origin.trim())
                    .with_context(|| format!("Invalid CORS origin {origin:?}"))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Database,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub min_connections: Option<u32>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            min_connections: None,
        }
    }
}

impl DatabaseConfig {
    fn ensure_bounds(&self) -> Result<()> {
        if self.max_connections == 0 || self.max_connections > 128 {
            bail!("database.max_connections must be within 1..=128");
        }
        if self.min_connections.unwrap_or(1) > self.max_connections {
            bail!("database.min_connections must not exceed max_connections");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub profiles_max_capacity: u64,
    pub profiles_ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            profiles_max_capacity: 10_000,
            profiles_ttl_seconds: 300,
        }
    }
}

impl CacheConfig {
    fn ensure_bounds(&self) -> Result<()> {
        if self.profiles_max_capacity < 100 {
            bail!("cache.profiles_max_capacity must be at least 100");
        }
        if self.profiles_ttl_seconds == 0 || self.profiles_ttl_seconds > 86_400 {
            bail!("cache.profiles_ttl_seconds must be within 1..=86400");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Gems each user may give in total.
    pub gem_allowance: u32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            gem_allowance: DEFAULT_GEM_ALLOWANCE,
        }
    }
}

fn map_config_error(err: ConfigError, path: &str) -> ConfigError {
    match err {
        ConfigError::NotFound(_) => ConfigError::NotFound(path.to_string()),
        other => other,
    }
}

use anyhow::{Context, Result};
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 1 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }

/// Gift registry behaviour: where uploads land, how they are addressed,
/// which offset reservation timestamps use, and the optional admin key.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    #[serde(default = "default_public_prefix")]
    pub public_prefix: String,
    /// Offset east of UTC, in minutes, stamped on reservations.
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
    #[serde(default)]
    pub admin_api_key: Option<String>,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            static_dir: default_static_dir(),
            upload_dir: default_upload_dir(),
            public_prefix: default_public_prefix(),
            utc_offset_minutes: default_utc_offset_minutes(),
            admin_api_key: None,
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_static_dir() -> String { "static".into() }
fn default_upload_dir() -> String { "static/uploads".into() }
fn default_public_prefix() -> String { "/static/uploads".into() }
// Buenos Aires, UTC-03:00
fn default_utc_offset_minutes() -> i32 { -180 }
fn default_max_upload_bytes() -> usize { 10 * 1024 * 1024 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: default_log_format() }
    }
}

fn default_log_format() -> String { "compact".into() }

fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_default() -> Result<AppConfig> {
    load_from_file(&config_path())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    load_from_str(&content).with_context(|| format!("parsing {path}"))
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

/// True only when the error is the config file not existing.
fn is_missing_file(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
}

impl AppConfig {
    /// Strict load of `CONFIG_PATH` (default `config.toml`).
    pub fn load_and_validate() -> Result<Self> {
        Self::load_and_validate_from(&config_path())
    }

    pub fn load_and_validate_from(path: &str) -> Result<Self> {
        let mut cfg = load_from_file(path)?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Config file if present, otherwise defaults filled from the environment.
    /// A file that exists but fails to read, parse or validate is an error.
    pub fn load_or_env() -> Result<Self> {
        Self::load_or_env_from(&config_path())
    }

    pub fn load_or_env_from(path: &str) -> Result<Self> {
        match Self::load_and_validate_from(path) {
            Ok(cfg) => Ok(cfg),
            Err(e) if is_missing_file(&e) => {
                let mut cfg = Self::from_env();
                cfg.normalize_and_validate()?;
                Ok(cfg)
            }
            Err(e) => Err(e),
        }
    }

    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            cfg.server.port = port;
        }
        if let Some(w) = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok()) {
            cfg.server.worker_threads = Some(w);
        }
        cfg
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.normalize_from_env();
        self.database.validate()?;
        self.registry.normalize_from_env();
        self.registry.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(4),
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        if self.url.trim().is_empty() {
            self.url = std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://registry.db?mode=rwc".to_string());
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://") || lower.starts_with("sqlite:")) {
            return Err(anyhow!("database.url must start with postgres://, postgresql:// or sqlite:"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl RegistryConfig {
    pub fn normalize_from_env(&mut self) {
        if self.admin_api_key.is_none() {
            self.admin_api_key = std::env::var("REGISTRY_ADMIN_API_KEY").ok();
        }
        if matches!(self.admin_api_key.as_deref(), Some(k) if k.trim().is_empty()) {
            self.admin_api_key = None;
        }
        let trimmed = self.public_prefix.trim_end_matches('/');
        self.public_prefix = if trimmed.starts_with('/') { trimmed.to_string() } else { format!("/{trimmed}") };
    }

    pub fn validate(&self) -> Result<()> {
        if self.upload_dir.trim().is_empty() {
            return Err(anyhow!("registry.upload_dir must not be empty"));
        }
        if self.public_prefix == "/" || self.public_prefix.is_empty() {
            return Err(anyhow!("registry.public_prefix must name a sub path such as /static/uploads"));
        }
        // leaves room for "/<32 hex>.<ext>" within the 512-wide item.image column
        if self.public_prefix.chars().count() > 256 {
            return Err(anyhow!("registry.public_prefix must be at most 256 characters"));
        }
        if self.max_upload_bytes == 0 {
            return Err(anyhow!("registry.max_upload_bytes must be positive"));
        }
        if self.utc_offset_minutes.abs() > 18 * 60 {
            return Err(anyhow!("registry.utc_offset_minutes must be within ±1080"));
        }
        Ok(())
    }
}

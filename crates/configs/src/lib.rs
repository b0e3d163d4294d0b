use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthSettings,
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

/// Which credential store backs the auth service.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Json,
    Database,
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "json" => Ok(Self::Json),
            "database" | "db" => Ok(Self::Database),
            other => Err(anyhow!("unknown storage backend `{other}` (expected memory, json or database)")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_json_path")]
    pub json_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { backend: StorageBackend::default(), json_path: default_json_path() }
    }
}

fn default_json_path() -> String { "data/users.json".into() }

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
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 1 }
fn default_connect_timeout() -> u64 { 30 }
fn default_acquire_timeout() -> u64 { 30 }

/// How passwords are stored and compared.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PasswordSchemeKind {
    #[default]
    Plain,
    Argon2,
}

impl std::str::FromStr for PasswordSchemeKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" => Ok(Self::Plain),
            "argon2" => Ok(Self::Argon2),
            other => Err(anyhow!("unknown password scheme `{other}` (expected plain or argon2)")),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AuthSettings {
    #[serde(default)]
    pub password_scheme: PasswordSchemeKind,
}

/// Load `config.toml` (or `$CONFIG_PATH`). A missing file yields defaults.
pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    if !Path::new(&path).exists() {
        return Ok(AppConfig::default());
    }
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.apply_env_overrides()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Environment variables win over file values.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            self.server.port = port.parse().map_err(|_| anyhow!("SERVER_PORT must be a port number, got `{port}`"))?;
        }
        if let Some(backend) = lookup("STORAGE_BACKEND") {
            self.storage.backend = backend.parse()?;
        }
        if let Some(path) = lookup("STORAGE_JSON_PATH") {
            self.storage.json_path = path;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(scheme) = lookup("PASSWORD_SCHEME") {
            self.auth.password_scheme = scheme.parse()?;
        }
        Ok(())
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        match self.storage.backend {
            StorageBackend::Memory => {}
            StorageBackend::Json => {
                if self.storage.json_path.trim().is_empty() {
                    return Err(anyhow!("storage.json_path must be set for the json backend"));
                }
            }
            StorageBackend::Database => self.database.validate()?,
        }
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if self.worker_threads.map_or(true, |w| w == 0) {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl DatabaseConfig {
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn empty_file_gives_defaults() {
        let mut cfg = parse("").unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.storage.backend, StorageBackend::Memory);
        assert_eq!(cfg.auth.password_scheme, PasswordSchemeKind::Plain);
        assert_eq!(cfg.server.worker_threads, Some(4));
    }

    #[test]
    fn parses_full_file() {
        let cfg = parse(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000

            [storage]
            backend = "json"
            json_path = "/tmp/users.json"

            [auth]
            password_scheme = "argon2"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.storage.backend, StorageBackend::Json);
        assert_eq!(cfg.storage.json_path, "/tmp/users.json");
        assert_eq!(cfg.auth.password_scheme, PasswordSchemeKind::Argon2);
    }

    #[test]
    fn database_backend_requires_url() {
        let mut cfg = parse("[storage]\nbackend = \"database\"\n").unwrap();
        assert!(cfg.normalize_and_validate().is_err());

        cfg.database.url = "mysql://localhost/db".into();
        assert!(cfg.normalize_and_validate().is_err());

        cfg.database.url = "sqlite::memory:".into();
        cfg.normalize_and_validate().unwrap();
    }

    #[test]
    fn env_overrides_take_precedence() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("SERVER_PORT", "7070"),
            ("STORAGE_BACKEND", "database"),
            ("DATABASE_URL", "postgres://localhost/auth"),
            ("PASSWORD_SCHEME", "argon2"),
        ]);
        let mut cfg = AppConfig::default();
        cfg.apply_overrides(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(cfg.server.port, 7070);
        assert_eq!(cfg.storage.backend, StorageBackend::Database);
        assert_eq!(cfg.database.url, "postgres://localhost/auth");
        assert_eq!(cfg.auth.password_scheme, PasswordSchemeKind::Argon2);
    }

    #[test]
    fn database_url_env_beats_file() {
        let mut cfg = parse("[database]\nurl = \"postgres://file/db\"\n").unwrap();
        cfg.apply_overrides(|k| (k == "DATABASE_URL").then(|| "sqlite::memory:".to_string())).unwrap();
        assert_eq!(cfg.database.url, "sqlite::memory:");
    }

    #[test]
    fn bad_override_is_rejected() {
        let mut cfg = AppConfig::default();
        assert!(cfg.apply_overrides(|k| (k == "SERVER_PORT").then(|| "http".to_string())).is_err());
        assert!(cfg.apply_overrides(|k| (k == "STORAGE_BACKEND").then(|| "redis".to_string())).is_err());
    }
}

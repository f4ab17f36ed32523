use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const DEFAULT_DATABASE_URL: &str = "sqlite:///tmp/oat.db?mode=rwc";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".into(), port: 5000, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub acquire_timeout_secs: u64,
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.into(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
            acquire_timeout_secs: 30,
            sqlx_logging: false,
        }
    }
}

/// Where and how log lines are written. `file = None` means stdout.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    pub file: Option<String>,
    pub json: bool,
}

/// Parse a TOML document into an `AppConfig`; absent sections take defaults.
pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {path}"))?;
    parse(&content).with_context(|| format!("parsing config file {path}"))
}

impl AppConfig {
    /// Load configuration for the process.
    ///
    /// An explicitly requested file must exist. Without one, `CONFIG_PATH` or
    /// `config.toml` is read when present and defaults are used otherwise.
    /// Environment variables are applied on top of the file.
    pub fn load(explicit_path: Option<&str>) -> Result<Self> {
        let mut cfg = match explicit_path {
            Some(path) => load_from_file(path)?,
            None => {
                let path = std::env::var("CONFIG_PATH")
                    .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
                if Path::new(&path).exists() {
                    load_from_file(&path)?
                } else {
                    AppConfig::default()
                }
            }
        };
        cfg.apply_env(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    /// Overlay values from the environment, read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            self.database.url = url;
        }
        if let Some(host) = lookup("SERVER_HOST").filter(|v| !v.trim().is_empty()) {
            self.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT").and_then(|v| v.parse::<u16>().ok()) {
            self.server.port = port;
        }
        if let Some(w) = lookup("TOKIO_WORKER_THREADS").and_then(|v| v.parse::<usize>().ok()) {
            self.server.worker_threads = Some(w);
        }
        if let Some(file) = lookup("LOG_FILE").filter(|v| !v.trim().is_empty()) {
            self.logging.file = Some(file);
        }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "0.0.0.0".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    pub fn is_sqlite(&self) -> bool {
        self.url.to_lowercase().starts_with("sqlite:")
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!(
                "database.url is empty; set it in config.toml, DATABASE_URL or --database-url"
            ));
        }
        let lower = self.url.to_lowercase();
        let known = ["postgresql://", "postgres://", "sqlite:"];
        if !known.iter().any(|scheme| lower.starts_with(scheme)) {
            return Err(anyhow!(
                "database.url must start with postgres://, postgresql:// or sqlite:"
            ));
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
    fn empty_document_yields_defaults() {
        let cfg = parse("").unwrap();
        assert_eq!(cfg.server.port, 5000);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.database.url, DEFAULT_DATABASE_URL);
        assert!(cfg.logging.file.is_none());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let cfg = parse(
            r#"
            [server]
            port = 8088

            [database]
            url = "postgres://fractal:secret@db/fractals"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 8088);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.database.max_connections, 10);
        assert!(!cfg.database.is_sqlite());
    }

    #[test]
    fn env_overrides_file_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("DATABASE_URL", "sqlite::memory:"),
            ("SERVER_PORT", "9000"),
            ("SERVER_PORT_IGNORED", "1"),
            ("LOG_FILE", "/tmp/fractal.log"),
        ]);
        let mut cfg = AppConfig::default();
        cfg.apply_env(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.database.url, "sqlite::memory:");
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.logging.file.as_deref(), Some("/tmp/fractal.log"));
    }

    #[test]
    fn unparsable_env_port_is_ignored() {
        let mut cfg = AppConfig::default();
        cfg.apply_env(|k| (k == "SERVER_PORT").then(|| "not-a-port".to_string()));
        assert_eq!(cfg.server.port, 5000);
    }

    #[test]
    fn validation_rejects_unknown_scheme() {
        let mut cfg = AppConfig::default();
        cfg.database.url = "mysql://localhost/db".into();
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn validation_rejects_inverted_pool_bounds() {
        let mut cfg = AppConfig::default();
        cfg.database.min_connections = 5;
        cfg.database.max_connections = 2;
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn normalize_fills_worker_threads_and_host() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "  ".into();
        cfg.server.worker_threads = Some(0);
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert_eq!(cfg.server.bind_addr(), "0.0.0.0:5000");
    }
}

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_PORT: u16 = 45758;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub site: SiteConfig,
    pub limits: LimitsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub backlog: i32,
    pub accept_backoff_ms: u64,
}

/// Where the application is mounted and where its files live.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub virtual_dir: String,
    pub physical_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Bytes requested from the socket per read.
    pub read_window: usize,
    /// Cap on head plus body for one request.
    pub max_request_bytes: usize,
    /// How long a read may wait for more bytes.
    pub idle_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            backlog: 1000,
            accept_backoff_ms: 100,
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            virtual_dir: "/".to_string(),
            physical_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            read_window: 32 * 1024,
            max_request_bytes: 64 * 1024,
            idle_timeout_ms: 5_000,
        }
    }
}

impl Config {
    /// Defaults, then the YAML file named by `PORTICO_CONFIG`, then
    /// `PORTICO_PORT` / `PORTICO_ROOT` overrides.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var("PORTICO_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };

        if let Ok(port) = std::env::var("PORTICO_PORT") {
            cfg.server.port = port
                .parse()
                .with_context(|| format!("PORTICO_PORT is not a port: {port}"))?;
        }
        if let Ok(root) = std::env::var("PORTICO_ROOT") {
            cfg.site.physical_dir = PathBuf::from(root);
        }

        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_yaml_str(&raw).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_yaml_str(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Takes the port from the first argument when it is a valid port number.
    pub fn with_args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: AsRef<str>,
    {
        if let Some(port) = args
            .into_iter()
            .next()
            .and_then(|a| a.as_ref().parse::<u16>().ok())
        {
            self.server.port = port;
        }
        self
    }
}

/// Document root as used at request time. The physical directory is
/// canonicalized once so containment checks compare like with like.
#[derive(Debug, Clone)]
pub struct Site {
    virtual_dir: String,
    physical_dir: PathBuf,
}

impl Site {
    pub fn new(virtual_dir: impl Into<String>, physical_dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let physical_dir = physical_dir.as_ref();
        let physical_dir = std::fs::canonicalize(physical_dir)
            .with_context(|| format!("document root {} is not accessible", physical_dir.display()))?;

        let mut virtual_dir = virtual_dir.into();
        if !virtual_dir.starts_with('/') {
            virtual_dir.insert(0, '/');
        }

        Ok(Self {
            virtual_dir,
            physical_dir,
        })
    }

    pub fn from_config(cfg: &SiteConfig) -> anyhow::Result<Self> {
        Self::new(cfg.virtual_dir.clone(), &cfg.physical_dir)
    }

    pub fn virtual_dir(&self) -> &str {
        &self.virtual_dir
    }

    pub fn physical_dir(&self) -> &Path {
        &self.physical_dir
    }
}

/// Per-connection read bounds.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub read_window: usize,
    pub max_request_bytes: usize,
    pub idle_timeout: Duration,
}

impl From<&LimitsConfig> for Limits {
    fn from(cfg: &LimitsConfig) -> Self {
        Self {
            read_window: cfg.read_window.max(1),
            max_request_bytes: cfg.max_request_bytes,
            idle_timeout: Duration::from_millis(cfg.idle_timeout_ms),
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::from(&LimitsConfig::default())
    }
}

//! Runtime configuration.
//!
//! Everything has a default, so running without a config file works. A YAML
//! file can be pointed at with `SESSION_CONFIG`; a handful of env vars
//! override individual fields afterwards.

use anyhow::Context;
use serde::Deserialize;

use crate::http::parser::ParseMode;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub client: ClientConfig,
    pub parser: ParserConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Upper bound on buffered bytes while waiting for the end of headers.
    pub max_header_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Server to talk to, e.g. "http://127.0.0.1:8080"
    pub server_url: String,
    /// How many sequential requests one client run sends
    pub requests: usize,
    /// Pause between requests in milliseconds
    pub interval_ms: u64,
    pub connect_timeout_ms: u64,
    /// Cap on buffered response header bytes
    pub max_header_bytes: usize,
    /// Largest Content-Length the client will read; larger responses fail.
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Reject malformed input instead of skipping it
    pub strict: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub id_prefix: String,
    pub max_age: u64,
    pub path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            max_header_bytes: 64 * 1024,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8080".to_string(),
            requests: 3,
            interval_ms: 1000,
            connect_timeout_ms: 5000,
            max_header_bytes: 64 * 1024,
            max_body_bytes: 1024 * 1024,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "session_id".to_string(),
            id_prefix: "user_".to_string(),
            max_age: 3600,
            path: "/".to_string(),
        }
    }
}

impl Config {
    /// Loads the config file named by `SESSION_CONFIG` (if any) and applies
    /// env overrides on top.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var("SESSION_CONFIG") {
            Ok(path) => {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read config file {}", path))?;
                Self::from_yaml_str(&raw)
                    .with_context(|| format!("failed to parse config file {}", path))?
            }
            Err(_) => Self::default(),
        };

        cfg.apply_overrides(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    pub fn from_yaml_str(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Applies `LISTEN`, `SERVER_URL` and `STRICT_PARSING` from `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(addr) = lookup("LISTEN") {
            self.server.listen_addr = addr;
        }
        if let Some(url) = lookup("SERVER_URL") {
            self.client.server_url = url;
        }
        if let Some(strict) = lookup("STRICT_PARSING") {
            self.parser.strict = matches!(strict.as_str(), "1" | "true" | "yes");
        }
    }
}

impl ParserConfig {
    pub fn mode(&self) -> ParseMode {
        if self.strict {
            ParseMode::Strict
        } else {
            ParseMode::Lenient
        }
    }
}

impl ClientConfig {
    /// Value for the `Host` header: `<host>:<port>` of `server_url`.
    pub fn host_header(&self) -> anyhow::Result<String> {
        let url = url::Url::parse(&self.server_url).context("Invalid server URL")?;
        let host = url.host_str().context("Server URL missing host")?;
        let port = url.port_or_known_default().context("Server URL missing port")?;
        Ok(format!("{}:{}", host, port))
    }

    /// Socket address to connect to.
    pub fn connect_addr(&self) -> anyhow::Result<String> {
        self.host_header()
    }
}

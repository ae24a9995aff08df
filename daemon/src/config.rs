//! Daemon configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use heritage_rpc::RpcConfig;
use heritage_utils::LogFormat;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid bind address {0:?}")]
    BindAddress(String),
}

/// Configuration for the heritage daemon.
///
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HeritageConfig {
    /// LMDB environment directory.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// LMDB map size in MiB.
    #[serde(default = "default_map_size_mb")]
    pub map_size_mb: usize,

    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_http_port")]
    pub http_port: u16,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Filter directive, e.g. `"info"` or `"debug,heritage_store_lmdb=trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// City listed when the monument query names none.
    #[serde(default = "default_city")]
    pub default_city: String,

    #[serde(default = "default_voter_cookie_name")]
    pub voter_cookie_name: String,

    #[serde(default = "default_voter_cookie_max_age_secs")]
    pub voter_cookie_max_age_secs: u64,

    /// Attempts per write before a conflict is reported.
    #[serde(default = "default_vote_retry_limit")]
    pub vote_retry_limit: u32,

    /// Moderator key expected in `X-Admin-Key`. Admin routes are closed without it.
    #[serde(default)]
    pub admin_key: Option<String>,

    #[serde(default = "default_true")]
    pub public_proposals: bool,

    #[serde(default)]
    pub cors_allow_any_origin: bool,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./heritage_data")
}

fn default_map_size_mb() -> usize {
    256
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_city() -> String {
    "Ногинск".to_string()
}

fn default_voter_cookie_name() -> String {
    "session_id".to_string()
}

fn default_voter_cookie_max_age_secs() -> u64 {
    60 * 60 * 24 * 365
}

fn default_vote_retry_limit() -> u32 {
    3
}

fn default_true() -> bool {
    true
}

// ── Impl ───────────────────────────────────────────────────────────────

impl HeritageConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn map_size_bytes(&self) -> usize {
        self.map_size_mb.saturating_mul(1024 * 1024)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .bind_address
            .parse()
            .map_err(|_| ConfigError::BindAddress(self.bind_address.clone()))?;
        Ok(SocketAddr::new(ip, self.http_port))
    }

    /// The HTTP-facing subset handed to the API layer.
    pub fn rpc_config(&self) -> RpcConfig {
        RpcConfig {
            default_city: self.default_city.clone(),
            voter_cookie_name: self.voter_cookie_name.clone(),
            voter_cookie_max_age_secs: self.voter_cookie_max_age_secs,
            vote_retry_limit: self.vote_retry_limit,
            admin_key: self.admin_key.clone().filter(|k| !k.is_empty()),
            public_proposals: self.public_proposals,
            cors_allow_any_origin: self.cors_allow_any_origin,
        }
    }
}

impl Default for HeritageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            map_size_mb: default_map_size_mb(),
            bind_address: default_bind_address(),
            http_port: default_http_port(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            default_city: default_city(),
            voter_cookie_name: default_voter_cookie_name(),
            voter_cookie_max_age_secs: default_voter_cookie_max_age_secs(),
            vote_retry_limit: default_vote_retry_limit(),
            admin_key: None,
            public_proposals: default_true(),
            cors_allow_any_origin: false,
        }
    }
}

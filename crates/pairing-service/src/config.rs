//! Configuration for the pairing service.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Session store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Gateway REST API URL
    #[serde(default = "default_gateway_api_url")]
    pub api_url: String,

    /// Connection establishment timeout
    #[serde(default = "default_connect_timeout", with = "humantime_serde")]
    pub connect_timeout: Duration,

    /// Per-request timeout for gateway calls
    #[serde(default = "default_query_timeout", with = "humantime_serde")]
    pub query_timeout: Duration,

    /// Lifecycle event poll interval
    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,

    /// Socket keep-alive interval advertised to the gateway
    #[serde(default = "default_keep_alive", with = "humantime_serde")]
    pub keep_alive: Duration,

    /// Browser fingerprint label for new sessions
    #[serde(default = "default_device_label")]
    pub device_label: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Base directory for per-session credential stores
    #[serde(default = "default_store_base_dir")]
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default implementations
impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_url: default_gateway_api_url(),
            connect_timeout: default_connect_timeout(),
            query_timeout: default_query_timeout(),
            poll_interval: default_poll_interval(),
            keep_alive: default_keep_alive(),
            device_label: default_device_label(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_dir: default_store_base_dir(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default value functions
fn default_gateway_api_url() -> String {
    "http://wa-gateway:3000".into()
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(90)
}

fn default_query_timeout() -> Duration {
    Duration::from_secs(90)
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(1)
}

fn default_keep_alive() -> Duration {
    Duration::from_secs(30)
}

fn default_device_label() -> String {
    "Chrome (Android)".into()
}

fn default_store_base_dir() -> PathBuf {
    PathBuf::from("./sessions")
}

fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(false),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

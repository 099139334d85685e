//! Process configuration
//!
//! Read once at startup from the environment (after `.env` is loaded).

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, bail};
use auth::AuthConfig;
use base64::Engine;
use base64::engine::general_purpose;
use feed::FeedConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    /// `None` selects the in-process cache
    pub redis_url: Option<String>,
    pub bind_addr: SocketAddr,
    pub auth: AuthConfig,
    pub feed: FeedConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

        let database_max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(raw) => raw.parse().context("DATABASE_MAX_CONNECTIONS must be an integer")?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        let redis_url = env::var("REDIS_URL").ok().filter(|url| !url.trim().is_empty());

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR must be host:port")?;

        let mut feed = FeedConfig::default();
        if let Ok(dir) = env::var("PUBLIC_DIR") {
            feed.public_dir = PathBuf::from(dir);
        }

        Ok(Self {
            database_url,
            database_max_connections,
            redis_url,
            bind_addr,
            auth: auth_config()?,
            feed,
        })
    }
}

fn auth_config() -> anyhow::Result<AuthConfig> {
    let mut config = match env::var("SESSION_SECRET") {
        Ok(secret_b64) => AuthConfig::with_secret(decode_secret(&secret_b64)?),
        Err(_) if cfg!(debug_assertions) => {
            tracing::warn!("SESSION_SECRET not set, using a random secret; sessions will not survive restarts");
            AuthConfig::development()
        }
        Err(_) => bail!("SESSION_SECRET must be set in production"),
    };

    if let Ok(raw) = env::var("COOKIE_SECURE") {
        config.cookie_secure = matches!(raw.trim(), "1" | "true" | "yes");
    }

    Ok(config)
}

/// Base64-encoded 32-byte key
fn decode_secret(secret_b64: &str) -> anyhow::Result<[u8; 32]> {
    let bytes = general_purpose::STANDARD
        .decode(secret_b64.trim())
        .context("SESSION_SECRET must be base64")?;

    bytes
        .try_into()
        .map_err(|bytes: Vec<u8>| anyhow::anyhow!("SESSION_SECRET must decode to 32 bytes, got {}", bytes.len()))
}

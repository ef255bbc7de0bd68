//! Environment-driven configuration.
//!
//! Every setting has a default so the server starts with no environment at
//! all. A value that is set but cannot be parsed is an error.

use std::env;
use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use log::info;

pub const ENV_ADDR: &str = "CAT_TRACKER_ADDR";
pub const ENV_PUBLIC_URL: &str = "CAT_TRACKER_PUBLIC_URL";
pub const ENV_STORE_LATENCY_MS: &str = "CAT_TRACKER_STORE_LATENCY_MS";
pub const ENV_SEED_DEMO: &str = "CAT_TRACKER_SEED_DEMO";
pub const ENV_STATIC_DIR: &str = "CAT_TRACKER_STATIC_DIR";
pub const ENV_ALLOWED_ORIGIN: &str = "CAT_TRACKER_ALLOWED_ORIGIN";
pub const ENV_OAUTH_AUTHORIZE_URL: &str = "CAT_TRACKER_OAUTH_AUTHORIZE_URL";
/// `email:password` of an account to register at startup
pub const ENV_DEMO_ACCOUNT: &str = "CAT_TRACKER_DEMO_ACCOUNT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoAccount {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    /// Externally visible base URL, used to build the OAuth callback
    pub public_url: String,
    /// Simulated round trip for every store call
    pub store_latency: Duration,
    pub seed_demo_data: bool,
    /// Built front-end bundle served for non-API paths
    pub static_dir: PathBuf,
    pub allowed_origin: String,
    pub oauth_authorize_url: String,
    pub demo_account: Option<DemoAccount>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let latency_ms: u64 = try_load(&lookup, ENV_STORE_LATENCY_MS, "300")?;
        let demo_account = lookup(ENV_DEMO_ACCOUNT)
            .map(|raw| parse_demo_account(&raw))
            .transpose()?;

        Ok(Self {
            addr: try_load(&lookup, ENV_ADDR, "127.0.0.1:3000")?,
            public_url: try_load(&lookup, ENV_PUBLIC_URL, "http://localhost:3000")?,
            store_latency: Duration::from_millis(latency_ms),
            seed_demo_data: try_load(&lookup, ENV_SEED_DEMO, "true")?,
            static_dir: try_load(&lookup, ENV_STATIC_DIR, "frontend/dist")?,
            allowed_origin: try_load(&lookup, ENV_ALLOWED_ORIGIN, "http://localhost:8080")?,
            oauth_authorize_url: try_load(
                &lookup,
                ENV_OAUTH_AUTHORIZE_URL,
                "https://accounts.google.com/o/oauth2/v2/auth",
            )?,
            demo_account,
        })
    }

    /// Where the identity provider sends the browser after a Google sign-in
    pub fn oauth_redirect_uri(&self) -> String {
        format!(
            "{}/api/auth/google/callback",
            self.public_url.trim_end_matches('/')
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            public_url: "http://localhost:3000".to_string(),
            store_latency: Duration::ZERO,
            seed_demo_data: true,
            static_dir: PathBuf::from("frontend/dist"),
            allowed_origin: "http://localhost:8080".to_string(),
            oauth_authorize_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            demo_account: None,
        }
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T>
where
    T::Err: Display,
{
    let raw = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    raw.trim()
        .parse()
        .map_err(|e| anyhow!("Invalid {key} value {raw:?}: {e}"))
}

fn parse_demo_account(raw: &str) -> Result<DemoAccount> {
    let (email, password) = raw
        .split_once(':')
        .with_context(|| format!("{ENV_DEMO_ACCOUNT} must look like email:password"))?;
    Ok(DemoAccount {
        email: email.trim().to_string(),
        password: password.to_string(),
    })
}

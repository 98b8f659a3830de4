use std::{fmt, net::SocketAddr};

use thiserror::Error;
use url::Url;

use crate::generator::client::DEFAULT_MODEL;

pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const PUBLIC_URL: &str = "PUBLIC_URL";
pub const OPENAI_API_BASE: &str = "OPENAI_API_BASE";
pub const OPENAI_MODEL: &str = "OPENAI_MODEL";
pub const BIND_ADDR: &str = "BIND_ADDR";
pub const PORT: &str = "PORT";
pub const WEBHOOK_SECRET: &str = "WEBHOOK_SECRET";

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} should be set")]
    Missing(&'static str),
    #[error("{name} is not a valid URL: {source}")]
    InvalidUrl {
        name: &'static str,
        source: url::ParseError,
    },
    #[error("{name} can't be parsed: '{value}'")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Clone)]
pub struct Config {
    pub telegram_token: String,
    pub openai_api_key: String,
    pub public_url: Url,
    pub webhook_url: Url,
    pub openai_api_base: Url,
    pub openai_model: String,
    pub bind_addr: SocketAddr,
    pub webhook_secret: Option<String>,
}

// Secrets stay out of the logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("public_url", &self.public_url.as_str())
            .field("openai_api_base", &self.openai_api_base.as_str())
            .field("openai_model", &self.openai_model)
            .field("bind_addr", &self.bind_addr)
            .field("webhook_secret", &self.webhook_secret.as_ref().map(|_| "***"))
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let telegram_token = require(TELEGRAM_TOKEN)?;
        let openai_api_key = require(OPENAI_API_KEY)?;
        let public_url = parse_url(PUBLIC_URL, &require(PUBLIC_URL)?)?;

        let openai_api_base = match get(OPENAI_API_BASE) {
            Some(base) => parse_url(OPENAI_API_BASE, &base)?,
            None => parse_url(OPENAI_API_BASE, DEFAULT_API_BASE)?,
        };
        let openai_model = get(OPENAI_MODEL).unwrap_or_else(|| DEFAULT_MODEL.to_owned());

        let bind_addr = match get(BIND_ADDR) {
            Some(addr) => parse_value(BIND_ADDR, addr)?,
            None => {
                let port = match get(PORT) {
                    Some(port) => parse_value(PORT, port)?,
                    None => DEFAULT_PORT,
                };
                SocketAddr::from(([0, 0, 0, 0], port))
            }
        };

        // Tokens look like `123:abc`; the colon is encoded so the route stays literal.
        let webhook_url = parse_url(
            PUBLIC_URL,
            &format!(
                "{}/bot{}",
                public_url.as_str().trim_end_matches('/'),
                telegram_token.replace(':', "%3A")
            ),
        )?;

        Ok(Self {
            telegram_token,
            openai_api_key,
            public_url,
            webhook_url,
            openai_api_base,
            openai_model,
            bind_addr,
            webhook_secret: get(WEBHOOK_SECRET).map(validate_secret).transpose()?,
        })
    }
}

fn parse_url(name: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|source| ConfigError::InvalidUrl { name, source })
}

// Telegram accepts 1-256 characters of `A-Za-z0-9_-` as a secret token.
fn validate_secret(secret: String) -> Result<String, ConfigError> {
    let valid = secret.len() <= 256
        && secret
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(secret)
    } else {
        Err(ConfigError::InvalidValue {
            name: WEBHOOK_SECRET,
            value: "***".to_owned(),
        })
    }
}

fn parse_value<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidValue { name, value })
}

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};

use crate::interview::chain::{ChainSettings, ResumeNamePolicy};
use crate::interview::store::DEFAULT_SESSION_IDLE_TTL;
use crate::llm_client::{Model, DEFAULT_BASE_URL};

/// Application configuration loaded from environment variables.
///
/// The API key is optional at startup: without it the service runs, and every
/// generating action answers with a configuration error.
/// Not `Debug`: it carries the API key.
#[derive(Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub model: Model,
    pub resume_name_policy: ResumeNamePolicy,
    /// Sessions untouched for this long are discarded.
    pub session_idle_ttl: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: optional_env("OPENAI_API_KEY"),
            openai_base_url: optional_env("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: parse_env("LLM_MODEL")?.unwrap_or_default(),
            resume_name_policy: parse_env("RESUME_NAME_POLICY")?.unwrap_or_default(),
            session_idle_ttl: session_idle_ttl()?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn chain_settings(&self) -> ChainSettings {
        ChainSettings {
            model: self.model,
            resume_name_policy: self.resume_name_policy,
        }
    }
}

fn session_idle_ttl() -> Result<Duration> {
    let Some(raw) = optional_env("SESSION_IDLE_TTL_SECS") else {
        return Ok(DEFAULT_SESSION_IDLE_TTL);
    };
    let secs = raw
        .parse::<u64>()
        .context("SESSION_IDLE_TTL_SECS must be a whole number of seconds")?;
    if secs == 0 {
        bail!("SESSION_IDLE_TTL_SECS must be greater than zero");
    }
    Ok(Duration::from_secs(secs))
}

/// Unset and blank are treated the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr<Err = String>,
{
    optional_env(key)
        .map(|raw| raw.parse::<T>().map_err(|e| anyhow!("{key}: {e}")))
        .transpose()
}

use std::{env, path::PathBuf, time::Duration};

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Connection settings for one IntelX instance.
#[derive(Debug, Clone)]
pub struct IntelXConfig {
    pub base_url: Url,
    pub token: SecretString,
    /// Per-request timeout. When unset, requests wait as long as the
    /// underlying transport allows.
    pub timeout: Option<Duration>,
    /// Extra PEM root certificate, for instances behind a private CA.
    pub ca_certificate: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable `{0}` is not set")]
    MissingVar(&'static str),
    #[error("invalid value for environment variable `{0}`")]
    InvalidVar(&'static str),
    #[error("invalid base url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl IntelXConfig {
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self, ConfigError> {
        let token: String = token.into();
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            token: SecretString::new(token.into_boxed_str()),
            timeout: None,
            ca_certificate: None,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_ca_certificate(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_certificate = Some(path.into());
        self
    }

    /// Reads `INTELX_URL`, `INTELX_TOKEN` and the optional
    /// `INTELX_TIMEOUT_SECS` / `INTELX_CA_CERT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|_| None)
    }

    /// Like [`IntelXConfig::from_env`], but `overrides` is consulted first for
    /// each variable name, e.g. to let command-line flags win over the
    /// environment.
    pub fn from_env_with<F>(overrides: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_lookup(|name| overrides(name).or_else(|| env::var(name).ok()))
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let url = var("INTELX_URL").ok_or(ConfigError::MissingVar("INTELX_URL"))?;
        let token = var("INTELX_TOKEN").ok_or(ConfigError::MissingVar("INTELX_TOKEN"))?;
        let mut config = Self::new(&url, token)?;

        if let Some(secs) = var("INTELX_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|_| ConfigError::InvalidVar("INTELX_TIMEOUT_SECS"))?;
            tracing::info!(timeout_secs = secs, "IntelX request timeout configured");
            config = config.with_timeout(Duration::from_secs(secs));
        }

        if let Some(path) = var("INTELX_CA_CERT") {
            tracing::info!(path = %path, "IntelX CA certificate configured");
            config = config.with_ca_certificate(path);
        }

        tracing::info!(base_url = %config.base_url, "IntelX config loaded successfully");
        Ok(config)
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme `{}`", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("not a base url".to_string()));
    }
    Ok(url)
}

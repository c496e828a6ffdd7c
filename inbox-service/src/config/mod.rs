use serde::Deserialize;
use service_core::config::{self as core_config, get_env, is_production};
use service_core::error::AppError;

/// Default chat model used for both pipelines.
const DEFAULT_MODEL: &str = "gpt-4.1-mini";

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Origins of the local web frontend.
const DEFAULT_ALLOWED_ORIGINS: &str = "http://127.0.0.1:5500,http://localhost:5500";

#[derive(Debug, Clone, Deserialize)]
pub struct InboxConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub openai: OpenAiConfig,
    pub cors: CorsConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
}

impl InboxConfig {
    /// Load configuration from `.env`, `configuration.*` and the process
    /// environment. Fails when `OPENAI_API_KEY` is missing.
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = is_production();

        let api_key = require_api_key(get_env("OPENAI_API_KEY", None, is_prod)?)?;

        let timeout_secs = get_env(
            "OPENAI_TIMEOUT_SECS",
            Some(&DEFAULT_TIMEOUT_SECS.to_string()),
            is_prod,
        )?
        .parse()
        .map_err(|e| AppError::ConfigError(anyhow::anyhow!("Invalid OPENAI_TIMEOUT_SECS: {}", e)))?;

        Ok(InboxConfig {
            common: common_config,
            openai: OpenAiConfig {
                api_key,
                model: get_env("OPENAI_MODEL", Some(DEFAULT_MODEL), is_prod)?,
                base_url: get_env("OPENAI_BASE_URL", Some(DEFAULT_BASE_URL), is_prod)?,
                timeout_secs,
            },
            cors: CorsConfig {
                allowed_origins: parse_origins(&get_env(
                    "CORS_ALLOWED_ORIGINS",
                    Some(DEFAULT_ALLOWED_ORIGINS),
                    is_prod,
                )?),
            },
            observability: ObservabilityConfig {
                log_level: get_env("LOG_LEVEL", Some("info"), false)?,
                otlp_endpoint: std::env::var("OTLP_ENDPOINT")
                    .ok()
                    .filter(|v| !v.trim().is_empty()),
            },
        })
    }
}

impl CorsConfig {
    pub fn local_frontend() -> Self {
        Self {
            allowed_origins: parse_origins(DEFAULT_ALLOWED_ORIGINS),
        }
    }
}

/// A key of only whitespace counts as missing.
fn require_api_key(raw: String) -> Result<String, AppError> {
    if raw.trim().is_empty() {
        return Err(AppError::ConfigError(anyhow::anyhow!(
            "OPENAI_API_KEY is set but empty"
        )));
    }
    Ok(raw)
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}

use crate::error::{Error, Result};
use crate::models::ai::AiProvider;
use crate::services::calendar_service::MAX_MINI_MONTHS;
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub request_timeout: Duration,
    pub ai_provider: AiProvider,
    pub ai_api_key: Option<String>,
    pub mini_months: usize,
    pub log_level: String,
    pub log_json: bool,
}

static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_url = get("JOBTRACK_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        url::Url::parse(&api_url)
            .map_err(|e| Error::Config(format!("Invalid value for JOBTRACK_API_URL: {}", e)))?;

        let timeout_secs: u64 = parse_or("JOBTRACK_TIMEOUT_SECS", get("JOBTRACK_TIMEOUT_SECS"), 60)?;
        if timeout_secs == 0 {
            return Err(Error::Config(
                "Invalid value for JOBTRACK_TIMEOUT_SECS: must be positive".to_string(),
            ));
        }

        let mini_months: usize = parse_or("JOBTRACK_MINI_MONTHS", get("JOBTRACK_MINI_MONTHS"), 3)?;
        if mini_months > MAX_MINI_MONTHS {
            return Err(Error::Config(format!(
                "Invalid value for JOBTRACK_MINI_MONTHS: must be at most {}",
                MAX_MINI_MONTHS
            )));
        }

        Ok(Self {
            api_url,
            request_timeout: Duration::from_secs(timeout_secs),
            ai_provider: parse_or("JOBTRACK_AI_PROVIDER", get("JOBTRACK_AI_PROVIDER"), AiProvider::OpenAi)?,
            ai_api_key: get("JOBTRACK_AI_API_KEY"),
            mini_months,
            log_level: get("JOBTRACK_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_json: get("JOBTRACK_LOG_JSON")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        })
    }
}

fn parse_or<T>(name: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        None => Ok(default),
    }
}

pub fn init_config() -> Result<&'static Config> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    CONFIG
        .get()
        .ok_or_else(|| Error::Config("Configuration has not been initialized".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.ai_provider, AiProvider::OpenAi);
        assert_eq!(config.ai_api_key, None);
        assert_eq!(config.mini_months, 3);
        assert!(!config.log_json);
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("JOBTRACK_API_URL", "https://tracker.example/api-root"),
            ("JOBTRACK_TIMEOUT_SECS", "5"),
            ("JOBTRACK_AI_PROVIDER", "Gemini"),
            ("JOBTRACK_AI_API_KEY", "sk-test"),
            ("JOBTRACK_MINI_MONTHS", "0"),
            ("JOBTRACK_LOG_JSON", "true"),
        ]))
        .unwrap();
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.ai_provider, AiProvider::Gemini);
        assert_eq!(config.ai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.mini_months, 0);
        assert!(config.log_json);
    }

    #[test]
    fn rejects_bad_values() {
        for pairs in [
            [("JOBTRACK_TIMEOUT_SECS", "soon")],
            [("JOBTRACK_TIMEOUT_SECS", "0")],
            [("JOBTRACK_API_URL", "not a url")],
            [("JOBTRACK_AI_PROVIDER", "llama")],
            [("JOBTRACK_MINI_MONTHS", "1000")],
        ] {
            let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
            assert!(matches!(err, Error::Config(_)), "{pairs:?} gave {err:?}");
        }
    }
}

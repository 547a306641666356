use crate::error::ParseBotError;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://docs.paid.ai/api-reference/";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

pub const PARSE_BOT_BASE_URL: &str = "https://api.parse.bot";
pub const PARSE_BOT_API_KEY_ENV: &str = "PARSE_BOT_API_KEY";

/// Settings for the heuristic crawl.
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl CrawlerConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

/// Settings for the Parse.bot client.
///
/// The API key is mandatory; every constructor fails with
/// [`ParseBotError::MissingApiKey`] rather than building a keyless config.
#[derive(Clone)]
pub struct ParseBotConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
    /// Delay before retry `n` is `retry_delay * n`.
    pub retry_delay: Duration,
}

impl ParseBotConfig {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ParseBotError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ParseBotError::MissingApiKey);
        }
        Ok(Self {
            api_key,
            base_url: PARSE_BOT_BASE_URL.to_string(),
            timeout: Duration::from_secs(120),
            max_retries: 3,
            retry_delay: Duration::from_secs(2),
        })
    }

    /// Use the explicit key when given, otherwise `PARSE_BOT_API_KEY`.
    pub fn from_env(api_key: Option<String>) -> Result<Self, ParseBotError> {
        let api_key = api_key
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var(PARSE_BOT_API_KEY_ENV).ok())
            .ok_or(ParseBotError::MissingApiKey)?;
        Self::new(api_key)
    }
}

impl std::fmt::Debug for ParseBotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParseBotConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("retry_delay", &self.retry_delay)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crawler_defaults() {
        let config = CrawlerConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn parsebot_defaults() {
        let config = ParseBotConfig::new("key").unwrap();
        assert_eq!(config.base_url, PARSE_BOT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_delay, Duration::from_secs(2));
    }

    #[test]
    fn empty_key_is_rejected() {
        assert!(matches!(
            ParseBotConfig::new("  "),
            Err(ParseBotError::MissingApiKey)
        ));
    }

    #[test]
    fn explicit_key_wins_over_env() {
        let config = ParseBotConfig::from_env(Some("explicit".to_string())).unwrap();
        assert_eq!(config.api_key, "explicit");
    }

    #[test]
    fn debug_output_hides_key() {
        let config = ParseBotConfig::new("secret-token").unwrap();
        assert!(!format!("{config:?}").contains("secret-token"));
    }
}

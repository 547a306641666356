//! Error types for the scraper and the Parse.bot client

use thiserror::Error;

/// Errors raised while fetching a documentation page
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Failed to build HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    /// URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out
    #[error("Request timed out")]
    Timeout,

    /// Failed to connect to server
    #[error("Failed to connect to server")]
    Connect(#[source] reqwest::Error),

    /// Server answered with a non-2xx status
    #[error("Server returned status {0}")]
    Status(u16),

    /// Other request error
    #[error("Request failed: {0}")]
    Request(String),
}

impl ScrapeError {
    /// Create an error from a reqwest error
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ScrapeError::Timeout
        } else if err.is_connect() {
            ScrapeError::Connect(err)
        } else if let Some(status) = err.status() {
            ScrapeError::Status(status.as_u16())
        } else {
            ScrapeError::Request(err.to_string())
        }
    }
}

/// Why a single Parse.bot attempt was worth retrying
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RetryReason {
    #[error("Request timed out")]
    Timeout,

    #[error("Server error ({0})")]
    ServerStatus(u16),

    #[error("Invalid JSON response")]
    InvalidJson,

    // Details are left out; transport errors can echo request headers.
    #[error("Request failed")]
    Request,
}

/// Errors returned by the Parse.bot client
#[derive(Debug, Error)]
pub enum ParseBotError {
    #[error(
        "Parse.bot API key is required. Set PARSE_BOT_API_KEY environment variable or pass an api key."
    )]
    MissingApiKey,

    #[error("Parse.bot API key contains characters not allowed in a header")]
    InvalidApiKey,

    #[error("Failed to create HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    /// Status outside the retryable set; never retried
    #[error("API request failed with status {0}")]
    Status(u16),

    #[error("Failed after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: RetryReason },
}

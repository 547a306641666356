use crate::config::ParseBotConfig;
use crate::error::{ParseBotError, RetryReason};
use crate::models::{DocumentBundle, EndpointRecord, SectionRecord};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{info, warn};

pub const SCRAPE_PATH: &str = "/v1/scrape";

/// Statuses worth another attempt.
pub const RETRYABLE_STATUS_CODES: [u16; 5] = [500, 502, 503, 504, 429];

pub const SCRAPED_WITH: &str = "parse.bot";

const EXAMPLES_ITEM: &str = "4. Any code examples\n";
const EXAMPLES_FIELD: &str = "- examples: code examples (if available)\n";

pub const API_DOCUMENTATION_QUERY: &str = "
Extract all API documentation from this page including:
1. All API endpoints with their:
   - HTTP method (GET, POST, PUT, DELETE, PATCH)
   - Path/URL pattern
   - Description
   - Request parameters (name, type, required, description)
   - Request body schema
   - Response schema
   - Response codes
2. Authentication information
3. Rate limiting information
4. Any code examples
5. API versioning information
6. Base URL
7. Section headers and navigation structure

Return the data in a structured JSON format with:
- endpoints: array of endpoint objects
- authentication: authentication details
- sections: documentation sections
- examples: code examples (if available)
- metadata: general API information
";

/// Outcome of one failed attempt.
enum AttemptError {
    Retry(RetryReason),
    Fatal(ParseBotError),
}

/// Client for the Parse.bot AI extraction API.
pub struct ParseBotClient {
    endpoint: String,
    max_retries: u32,
    retry_delay: Duration,
    client: reqwest::Client,
}

impl ParseBotClient {
    pub fn new(config: ParseBotConfig) -> Result<Self, ParseBotError> {
        if config.api_key.trim().is_empty() {
            return Err(ParseBotError::MissingApiKey);
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| ParseBotError::InvalidApiKey)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(ParseBotError::ClientBuild)?;

        Ok(Self {
            endpoint: format!("{}{}", config.base_url.trim_end_matches('/'), SCRAPE_PATH),
            max_retries: config.max_retries.max(1),
            retry_delay: config.retry_delay,
            client,
        })
    }

    /// Key from the argument, falling back to `PARSE_BOT_API_KEY`.
    pub fn from_env(api_key: Option<String>) -> Result<Self, ParseBotError> {
        Self::new(ParseBotConfig::from_env(api_key)?)
    }

    /// Ask Parse.bot to extract `query` from `url` and return its raw JSON.
    ///
    /// Timeouts, transport errors, unparsable bodies and statuses in
    /// [`RETRYABLE_STATUS_CODES`] are retried with a linearly growing delay.
    /// Any other error status fails on the spot.
    pub async fn scrape(
        &self,
        url: &str,
        query: &str,
        variables: Option<&Value>,
    ) -> Result<Value, ParseBotError> {
        let mut payload = json!({ "url": url, "query": query });
        if let Some(variables) = variables {
            payload["variables"] = variables.clone();
        }

        let mut last_error = RetryReason::Request;
        for attempt in 1..=self.max_retries {
            match self.send_once(&payload).await {
                Ok(result) => return Ok(result),
                Err(AttemptError::Fatal(err)) => return Err(err),
                Err(AttemptError::Retry(reason)) => {
                    warn!("Attempt {}/{}: {}, retrying...", attempt, self.max_retries, reason);
                    last_error = reason;
                }
            }
            if attempt < self.max_retries {
                tokio::time::sleep(self.retry_delay * attempt).await;
            }
        }

        Err(ParseBotError::RetriesExhausted {
            attempts: self.max_retries,
            last_error,
        })
    }

    async fn send_once(&self, payload: &Value) -> Result<Value, AttemptError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await
            .map_err(|err| {
                AttemptError::Retry(if err.is_timeout() {
                    RetryReason::Timeout
                } else {
                    RetryReason::Request
                })
            })?;

        let status = response.status();
        if !status.is_success() {
            let code = status.as_u16();
            return Err(if RETRYABLE_STATUS_CODES.contains(&code) {
                AttemptError::Retry(RetryReason::ServerStatus(code))
            } else {
                AttemptError::Fatal(ParseBotError::Status(code))
            });
        }

        let body = response.text().await.map_err(|err| {
            AttemptError::Retry(if err.is_timeout() {
                RetryReason::Timeout
            } else {
                RetryReason::Request
            })
        })?;
        serde_json::from_str(&body).map_err(|_| AttemptError::Retry(RetryReason::InvalidJson))
    }

    /// Scrape with the built-in API documentation query.
    pub async fn scrape_api_documentation(
        &self,
        url: &str,
        include_examples: bool,
    ) -> Result<Value, ParseBotError> {
        self.scrape(url, &documentation_query(include_examples), None)
            .await
    }

    /// Scrape a documentation page and reshape the answer into a bundle.
    pub async fn scrape_docs(&self, url: &str) -> Result<DocumentBundle, ParseBotError> {
        info!(url = %url, "Scraping API documentation with Parse.bot");
        let raw = self.scrape_api_documentation(url, true).await?;
        Ok(format_result(raw, url))
    }

    /// Run the same query against several pages, one after another.
    ///
    /// A failing page is recorded as `{source_url, error}` and does not stop
    /// the remaining pages.
    pub async fn scrape_multiple_pages(
        &self,
        urls: &[String],
        query: &str,
        delay_between_requests: Duration,
    ) -> Vec<Value> {
        let mut results = Vec::with_capacity(urls.len());
        for (i, url) in urls.iter().enumerate() {
            info!("Scraping page {}/{}: {}", i + 1, urls.len(), url);
            match self.scrape(url, query, None).await {
                Ok(mut result) => {
                    if let Value::Object(map) = &mut result {
                        map.insert("source_url".to_string(), Value::String(url.clone()));
                    }
                    results.push(result);
                }
                Err(err) => {
                    warn!(url = %url, error = %err, "Error scraping page");
                    results.push(json!({ "source_url": url, "error": err.to_string() }));
                }
            }

            if i + 1 < urls.len() && !delay_between_requests.is_zero() {
                tokio::time::sleep(delay_between_requests).await;
            }
        }
        results
    }
}

/// The documentation query, optionally without the code-example requests.
pub fn documentation_query(include_examples: bool) -> String {
    if include_examples {
        API_DOCUMENTATION_QUERY.to_string()
    } else {
        API_DOCUMENTATION_QUERY
            .replace(EXAMPLES_ITEM, "")
            .replace(EXAMPLES_FIELD, "")
    }
}

/// Reshape a raw Parse.bot answer into a [`DocumentBundle`].
///
/// Endpoint and section entries that are not objects are dropped.
pub fn format_result(raw: Value, url: &str) -> DocumentBundle {
    let mut raw = match raw {
        Value::Object(map) => map,
        _ => Default::default(),
    };

    let mut bundle = DocumentBundle::new(url);
    bundle.endpoints = decode_entries::<EndpointRecord>(raw.remove("endpoints"));
    bundle.sections = decode_entries::<SectionRecord>(raw.remove("sections"));
    bundle.authentication = Some(raw.remove("authentication").unwrap_or_else(|| json!({})));
    bundle.metadata = Some(raw.remove("metadata").unwrap_or_else(|| json!({})));
    bundle.examples = raw.remove("examples");
    bundle.scraped_with = Some(SCRAPED_WITH.to_string());
    bundle.scraped_at = Some(chrono::Utc::now());
    bundle
}

fn decode_entries<T: DeserializeOwned>(value: Option<Value>) -> Vec<T> {
    match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HttpMethod;

    #[test]
    fn missing_key_fails_fast() {
        let mut config = ParseBotConfig::new("key").unwrap();
        config.api_key = String::new();
        assert!(matches!(
            ParseBotClient::new(config),
            Err(ParseBotError::MissingApiKey)
        ));
    }

    #[test]
    fn newline_in_key_is_rejected() {
        let config = ParseBotConfig::new("bad\nkey").unwrap();
        assert!(matches!(
            ParseBotClient::new(config),
            Err(ParseBotError::InvalidApiKey)
        ));
    }

    #[test]
    fn query_without_examples() {
        let query = documentation_query(false);
        assert!(!query.contains("code examples"));
        assert!(query.contains("5. API versioning information"));
        assert_eq!(documentation_query(true), API_DOCUMENTATION_QUERY);
    }

    #[test]
    fn format_result_reshapes_answer() {
        let raw = json!({
            "endpoints": [
                {"title": "Create Signal", "method": "post", "path": "/api/v1/signals"},
                "not an endpoint"
            ],
            "sections": [{"title": "Signals", "content": "Track usage"}],
            "authentication": {"type": "bearer"},
            "examples": [{"language": "curl"}],
            "rate_limits": "ignored"
        });
        let bundle = format_result(raw, "https://docs.paid.ai/api-reference/");

        assert_eq!(bundle.base_url, "https://docs.paid.ai/api-reference/");
        assert_eq!(bundle.endpoints.len(), 1);
        assert_eq!(bundle.endpoints[0].method, Some(HttpMethod::Post));
        assert_eq!(bundle.sections[0].title, "Signals");
        assert!(bundle.sections[0].links.is_empty());
        assert_eq!(bundle.authentication, Some(json!({"type": "bearer"})));
        assert_eq!(bundle.metadata, Some(json!({})));
        assert_eq!(bundle.examples, Some(json!([{"language": "curl"}])));
        assert_eq!(bundle.scraped_with.as_deref(), Some("parse.bot"));
    }

    #[test]
    fn format_result_keeps_irregular_entries() {
        let raw = json!({
            "endpoints": [
                {"title": "Get Order", "path": "/v1/orders/{id}", "responses": {"200": {"description": "OK"}}},
                {"title": null, "method": "DELETE", "path": "/v1/orders/{id}"},
                {"title": "Create Order", "parameters": {"amount": {"type": "number"}}}
            ],
            "sections": [{"title": "Orders", "links": ["https://docs.paid.ai/orders"]}]
        });
        let bundle = format_result(raw, "https://docs.paid.ai/api-reference/");

        assert_eq!(bundle.endpoints.len(), 3);
        assert_eq!(bundle.endpoints[0].responses.len(), 1);
        assert_eq!(bundle.endpoints[1].title, "");
        assert_eq!(bundle.endpoints[1].method, Some(HttpMethod::Delete));
        assert_eq!(bundle.endpoints[2].parameters[0].name, "amount");
        assert_eq!(bundle.sections.len(), 1);
        assert_eq!(bundle.sections[0].links[0].url, "https://docs.paid.ai/orders");
    }

    #[test]
    fn format_result_without_examples_omits_key() {
        let bundle = format_result(json!({}), "https://example.com/");
        assert!(bundle.endpoints.is_empty());
        let value = serde_json::to_value(&bundle).unwrap();
        assert!(value.get("examples").is_none());
        assert_eq!(value["authentication"], json!({}));
        assert_eq!(value["scraped_with"], "parse.bot");
    }
}

//! Scrapes API reference documentation into structured JSON.
//!
//! Two independent paths produce a [`DocumentBundle`]:
//! - [`DocsScraper`] fetches a documentation root, walks its HTML for
//!   endpoints and sections, and follows the root's navigation links one hop.
//! - [`ParseBotClient`] hands the page to the Parse.bot AI extraction service
//!   and reshapes its answer.

pub mod config;
pub mod crawler;
pub mod error;
pub mod extractor;
pub mod llm;
pub mod models;

pub use config::{CrawlerConfig, ParseBotConfig};
pub use crawler::{DocsScraper, PageExtract};
pub use error::{ParseBotError, RetryReason, ScrapeError};
pub use llm::ParseBotClient;
pub use models::{
    DocumentBundle, EndpointRecord, HttpMethod, LinkRecord, ParameterRecord, SectionRecord,
};

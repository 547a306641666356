use crate::config::CrawlerConfig;
use crate::error::ScrapeError;
use crate::extractor::navigation::page_key;
use crate::extractor::{extract_endpoints, extract_sections, find_navigation_links};
use crate::models::{DocumentBundle, EndpointRecord, SectionRecord};
use scraper::Html;
use std::collections::HashSet;
use tracing::{debug, info, warn};
use url::Url;

/// Endpoints and sections pulled from a single page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageExtract {
    pub endpoints: Vec<EndpointRecord>,
    pub sections: Vec<SectionRecord>,
}

impl PageExtract {
    pub fn from_document(document: &Html, page_url: &Url) -> Self {
        Self {
            endpoints: extract_endpoints(document),
            sections: extract_sections(document, page_url),
        }
    }
}

/// Scrapes a documentation root and the pages linked from its navigation.
pub struct DocsScraper {
    base_url: Url,
    client: reqwest::Client,
}

impl DocsScraper {
    pub fn new(config: CrawlerConfig) -> Result<Self, ScrapeError> {
        let base_url = Url::parse(&config.base_url)?;
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .build()
            .map_err(ScrapeError::ClientBuild)?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// GET a page and return its body; non-2xx statuses are errors.
    pub async fn fetch_html(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ScrapeError::from_reqwest)?
            .error_for_status()
            .map_err(ScrapeError::from_reqwest)?;
        response.text().await.map_err(ScrapeError::from_reqwest)
    }

    /// Fetch and extract one page, resolving its links against `url`.
    pub async fn scrape_page(&self, url: &str) -> Result<PageExtract, ScrapeError> {
        let page_url = Url::parse(url)?;
        let html = self.fetch_html(url).await?;
        let document = Html::parse_document(&html);
        Ok(PageExtract::from_document(&document, &page_url))
    }

    /// Crawl the root page plus every navigation target it links to.
    ///
    /// Sub-pages' own navigation is not followed. A page that fails to load
    /// is logged and skipped; a failed root yields an empty bundle.
    pub async fn scrape(&self) -> DocumentBundle {
        let base = self.base_url.as_str();
        let mut bundle = DocumentBundle::new(base);
        let mut visited: HashSet<String> = HashSet::from([page_key(&self.base_url)]);

        info!(url = %base, "Scraping API documentation");
        let html = match self.fetch_html(base).await {
            Ok(html) => html,
            Err(err) => {
                warn!(url = %base, error = %err, "Failed to fetch the main API reference page");
                bundle.scraped_at = Some(chrono::Utc::now());
                return bundle;
            }
        };

        let nav_links = {
            let document = Html::parse_document(&html);
            let page = PageExtract::from_document(&document, &self.base_url);
            bundle.endpoints = page.endpoints;
            bundle.sections = page.sections;
            find_navigation_links(&document, &self.base_url, &visited)
        };
        info!(
            endpoints = bundle.endpoints.len(),
            sections = bundle.sections.len(),
            "Extracted root page"
        );

        if !nav_links.is_empty() {
            info!("Found {} sub-pages to scrape", nav_links.len());
        }
        let total = nav_links.len();
        for (i, link) in nav_links.into_iter().enumerate() {
            if !visited.insert(link.clone()) {
                continue;
            }
            info!("Scraping sub-page {}/{}: {}", i + 1, total, link);
            match self.scrape_page(&link).await {
                Ok(page) => {
                    debug!(
                        url = %link,
                        endpoints = page.endpoints.len(),
                        sections = page.sections.len(),
                        "Extracted sub-page"
                    );
                    bundle.endpoints.extend(page.endpoints);
                    bundle.sections.extend(page.sections.into_iter().map(|mut section| {
                        section.source_url = Some(link.clone());
                        section
                    }));
                }
                Err(err) => warn!(url = %link, error = %err, "Skipping sub-page"),
            }
        }

        bundle.scraped_at = Some(chrono::Utc::now());
        info!(
            endpoints = bundle.endpoints.len(),
            sections = bundle.sections.len(),
            pages = visited.len(),
            "Scrape finished"
        );
        bundle
    }
}

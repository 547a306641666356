use super::predicates::{element_text, is_content_class, is_fragment_only};
use crate::models::{LinkRecord, SectionRecord};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use url::Url;

static CONTAINER: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("section, article, div").unwrap());
static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1, h2, h3").unwrap());
pub(crate) static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// Collect content containers (section/article/div carrying a content class).
///
/// Links are resolved against `page_url`. Containers with neither a title nor
/// a link are dropped.
pub fn extract_sections(document: &Html, page_url: &Url) -> Vec<SectionRecord> {
    document
        .select(&CONTAINER)
        .filter(|container| container.value().attr("class").is_some_and(is_content_class))
        .map(|container| section_from_container(container, page_url))
        .filter(SectionRecord::is_identifiable)
        .collect()
}

fn section_from_container(container: ElementRef<'_>, page_url: &Url) -> SectionRecord {
    SectionRecord {
        title: container
            .select(&TITLE)
            .next()
            .map(element_text)
            .unwrap_or_default(),
        content: element_text(container),
        links: container
            .select(&LINK)
            .filter_map(|anchor| {
                let href = anchor.value().attr("href")?;
                let url = resolve_href(page_url, href)?;
                Some(LinkRecord {
                    text: element_text(anchor),
                    url: url.into(),
                })
            })
            .collect(),
        source_url: None,
    }
}

/// Absolute URL for an href, or `None` for empty, fragment-only or unparsable hrefs.
pub(crate) fn resolve_href(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || is_fragment_only(href) {
        return None;
    }
    base.join(href).ok()
}

use super::predicates::is_nav_class;
use super::sections::{LINK, resolve_href};
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

static NAV_CONTAINER: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("nav, aside, div").unwrap());

/// Same-domain pages linked from navigation panels (nav/sidebar/menu/toc).
///
/// Fragments are dropped, so `page` and `page#params` are one link. Results
/// are in document order, without duplicates, and never include `base_url`
/// or anything already in `visited`.
pub fn find_navigation_links(
    document: &Html,
    base_url: &Url,
    visited: &HashSet<String>,
) -> Vec<String> {
    let base = page_key(base_url);
    let mut links: Vec<String> = Vec::new();

    let anchors = document
        .select(&NAV_CONTAINER)
        .filter(|nav| nav.value().attr("class").is_some_and(is_nav_class))
        .flat_map(|nav| nav.select(&LINK));

    for anchor in anchors {
        let Some(url) = anchor
            .value()
            .attr("href")
            .and_then(|href| resolve_href(base_url, href))
        else {
            continue;
        };
        if !same_origin(&url, base_url) {
            continue;
        }
        let url = page_key(&url);
        if url != base && !visited.contains(&url) && !links.contains(&url) {
            links.push(url);
        }
    }

    links
}

/// The URL with any fragment removed; identifies a fetchable page.
pub fn page_key(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    url.into()
}

/// Same host and explicit port, whatever the scheme.
fn same_origin(url: &Url, base: &Url) -> bool {
    url.host_str().is_some() && url.host_str() == base.host_str() && url.port() == base.port()
}

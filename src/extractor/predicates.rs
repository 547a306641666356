//! Pure classifiers used by the extractors.
//!
//! Everything here takes plain text or attribute values so the heuristics
//! can be tested without building a DOM.

use crate::models::HttpMethod;
use regex::Regex;
use scraper::ElementRef;
use std::sync::LazyLock;

static API_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/[a-zA-Z0-9/_\-{}.*]+$").unwrap());

const METHOD_BADGE_CLASSES: [&str; 5] = [
    "badge-get",
    "badge-post",
    "badge-put",
    "badge-delete",
    "badge-patch",
];

const CONTENT_CLASSES: [&str; 4] = ["content", "documentation", "api-section", "section"];

const NAV_CLASSES: [&str; 4] = ["nav", "sidebar", "menu", "toc"];

const MAX_LOOSE_PATH_LEN: usize = 100;

/// First HTTP method (in GET, POST, PUT, DELETE, PATCH order) contained in the badge text.
pub fn detect_method(badge_text: &str) -> Option<HttpMethod> {
    let upper = badge_text.to_uppercase();
    HttpMethod::ALL
        .into_iter()
        .find(|method| upper.contains(method.as_str()))
}

/// Does a `class` attribute mark an element as an HTTP method badge?
pub fn is_method_badge_class(class_attr: &str) -> bool {
    class_attr
        .split_whitespace()
        .any(|class| METHOD_BADGE_CLASSES.contains(&class))
}

/// Does the text look like an API path such as `/api/v1/orders/{id}`?
///
/// Strict form: only URL-path characters and placeholder braces. Loose form:
/// starts with `/`, shorter than 100 chars, no whitespace and no protocol prefix.
pub fn is_api_path(text: &str) -> bool {
    if API_PATH_RE.is_match(text) {
        return true;
    }
    text.starts_with('/')
        && text.chars().count() < MAX_LOOSE_PATH_LEN
        && !text.chars().any(char::is_whitespace)
        && !text.contains("http://")
        && !text.contains("https://")
}

pub fn is_content_class(class_attr: &str) -> bool {
    class_attr
        .split_whitespace()
        .any(|class| CONTENT_CLASSES.contains(&class))
}

/// Navigation markers are matched case-insensitively.
pub fn is_nav_class(class_attr: &str) -> bool {
    class_attr.split_whitespace().any(|class| {
        let lower = class.to_lowercase();
        NAV_CLASSES.contains(&lower.as_str())
    })
}

/// h1 and h2 close the region that belongs to the previous heading.
pub fn is_section_break(tag: &str) -> bool {
    matches!(tag, "h1" | "h2")
}

/// Hrefs that only point inside the current page.
pub fn is_fragment_only(href: &str) -> bool {
    href.starts_with('#')
}

/// Element text with each text node trimmed and joined by a single space.
pub fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Element text with text nodes trimmed and concatenated, for code and badges
/// where inline markup must not introduce spaces.
pub fn compact_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_detection_uses_first_match() {
        assert_eq!(detect_method("post"), Some(HttpMethod::Post));
        assert_eq!(detect_method(" Delete "), Some(HttpMethod::Delete));
        assert_eq!(detect_method("GET/POST"), Some(HttpMethod::Get));
        assert_eq!(detect_method("HEAD"), None);
    }

    #[test]
    fn badge_classes() {
        assert!(is_method_badge_class("badge badge-post"));
        assert!(is_method_badge_class("badge-patch"));
        assert!(!is_method_badge_class("badge"));
        assert!(!is_method_badge_class("badge-postal"));
    }

    #[test]
    fn strict_api_paths() {
        assert!(is_api_path("/api/v1/signals"));
        assert!(is_api_path("/customers/{id}"));
        assert!(is_api_path("/files/*.json"));
    }

    #[test]
    fn loose_api_paths() {
        assert!(is_api_path("/search?q=term&page=2"));
        assert!(!is_api_path("/has space"));
        assert!(!is_api_path("/redirect?to=https://example.com"));
        assert!(!is_api_path(&format!("/{}?x", "a".repeat(120))));
    }

    #[test]
    fn non_paths() {
        assert!(!is_api_path("api/v1/signals"));
        assert!(!is_api_path("curl -X POST /api"));
        assert!(!is_api_path(""));
    }

    #[test]
    fn content_and_nav_classes() {
        assert!(is_content_class("main api-section"));
        assert!(!is_content_class("contents"));
        assert!(!is_content_class("Content"));
        assert!(is_nav_class("Sidebar dark"));
        assert!(is_nav_class("toc"));
        assert!(!is_nav_class("navbar"));
    }

    #[test]
    fn section_breaks() {
        assert!(is_section_break("h1"));
        assert!(is_section_break("h2"));
        assert!(!is_section_break("h3"));
        assert!(!is_section_break("p"));
    }

    #[test]
    fn text_helpers() {
        let html = scraper::Html::parse_fragment(
            "<div>  Create <b>Signal</b>\n <code>/api/<span>{id}</span></code></div>",
        );
        let div = html
            .select(&scraper::Selector::parse("div").unwrap())
            .next()
            .unwrap();
        assert_eq!(element_text(div), "Create Signal /api/ {id}");
        let code = html
            .select(&scraper::Selector::parse("code").unwrap())
            .next()
            .unwrap();
        assert_eq!(compact_text(code), "/api/{id}");
    }
}

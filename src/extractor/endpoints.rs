use super::parameters::parse_parameter_table;
use super::predicates::{compact_text, detect_method, element_text, is_api_path, is_method_badge_class};
use super::siblings::FollowingSiblings;
use crate::models::EndpointRecord;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static HEADING: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1, h2, h3, h4").unwrap());
static BADGE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span, code").unwrap());
static CODE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("code, pre").unwrap());
static TABLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table").unwrap());

/// Walk every h1-h4 heading and build an endpoint from what follows it.
///
/// Headings that yield neither a method nor a path are ordinary content
/// headings and are dropped.
pub fn extract_endpoints(document: &Html) -> Vec<EndpointRecord> {
    document
        .select(&HEADING)
        .map(endpoint_from_heading)
        .filter(EndpointRecord::is_endpoint)
        .collect()
}

fn endpoint_from_heading(heading: ElementRef<'_>) -> EndpointRecord {
    let mut endpoint = EndpointRecord::new(element_text(heading));
    endpoint.method = heading
        .select(&BADGE)
        .find(|badge| badge.value().attr("class").is_some_and(is_method_badge_class))
        .and_then(|badge| detect_method(&compact_text(badge)));

    for sibling in FollowingSiblings::after(heading) {
        let tag = sibling.value().name();

        if endpoint.path.is_none() {
            endpoint.path = find_api_path(sibling);
        }

        if tag == "p" && endpoint.description.is_none() {
            let text = element_text(sibling);
            if !text.is_empty() {
                endpoint.description = Some(text);
            }
        }

        if tag == "table" {
            endpoint.parameters.extend(parse_parameter_table(sibling));
        } else {
            for table in sibling.select(&TABLE) {
                endpoint.parameters.extend(parse_parameter_table(table));
            }
        }
    }

    endpoint
}

/// The sibling itself when it is a code block, otherwise the first code
/// block inside it whose text is path-like.
fn find_api_path(element: ElementRef<'_>) -> Option<String> {
    if matches!(element.value().name(), "code" | "pre") {
        let text = compact_text(element);
        return is_api_path(&text).then_some(text);
    }
    element
        .select(&CODE)
        .map(compact_text)
        .find(|text| is_api_path(text))
}

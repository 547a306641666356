use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    /// Detection order used when scanning badge text.
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        let upper = text.trim().to_uppercase();
        Self::ALL.into_iter().find(|m| m.as_str() == upper)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_method")]
    pub method: Option<HttpMethod>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub path: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_parameters")]
    pub parameters: Vec<ParameterRecord>,
    #[serde(deserialize_with = "lenient_responses")]
    pub responses: Vec<Value>,
}

impl EndpointRecord {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// A heading only counts as an endpoint once it carries a method or a path.
    pub fn is_endpoint(&self) -> bool {
        self.method.is_some() || self.path.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub param_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub required: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub content: String,
    #[serde(deserialize_with = "lenient_links")]
    pub links: Vec<LinkRecord>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_opt_string"
    )]
    pub source_url: Option<String>,
}

impl SectionRecord {
    /// Content alone is not enough to keep a section around.
    pub fn is_identifiable(&self) -> bool {
        !self.title.is_empty() || !self.links.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentBundle {
    pub base_url: String,
    pub endpoints: Vec<EndpointRecord>,
    pub sections: Vec<SectionRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scraped_with: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scraped_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl DocumentBundle {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            endpoints: Vec::new(),
            sections: Vec::new(),
            authentication: None,
            metadata: None,
            examples: None,
            scraped_with: None,
            scraped_at: None,
        }
    }
}

// Remote extraction results are loosely typed: methods may be lowercase or
// unknown, scalars may be null, numbers or booleans, and lists may come back
// as maps. A malformed item is skipped without losing its parent record.
fn lenient_method<'de, D>(deserializer: D) -> Result<Option<HttpMethod>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_str).and_then(HttpMethod::parse))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// Responses pass through as given; a single object (e.g. keyed by status
/// code) becomes one entry.
fn lenient_responses<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items,
        Some(other) => vec![other],
    })
}

/// Accepts a list of parameter objects or a map keyed by parameter name.
fn lenient_parameters<'de, D>(deserializer: D) -> Result<Vec<ParameterRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        Some(Value::Object(map)) => map
            .into_iter()
            .map(|(name, item)| {
                let mut param: ParameterRecord = match item {
                    Value::Object(_) => serde_json::from_value(item).unwrap_or_default(),
                    Value::String(description) => ParameterRecord {
                        description,
                        ..Default::default()
                    },
                    _ => ParameterRecord::default(),
                };
                if param.name.is_empty() {
                    param.name = name;
                }
                param
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Link objects, or bare URL strings.
fn lenient_links<'de, D>(deserializer: D) -> Result<Vec<LinkRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Array(items)) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(url) => Some(LinkRecord {
                text: String::new(),
                url,
            }),
            Value::Object(_) => serde_json::from_value(item).ok(),
            _ => None,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_bundle() -> DocumentBundle {
        let mut bundle = DocumentBundle::new("https://docs.paid.ai/api-reference/");
        bundle.endpoints.push(EndpointRecord {
            title: "POST Create Signal".to_string(),
            method: Some(HttpMethod::Post),
            path: Some("/api/v1/signals".to_string()),
            description: Some("Send a signal.".to_string()),
            parameters: vec![ParameterRecord {
                name: "order".to_string(),
                description: "Unique identifier".to_string(),
                param_type: "string".to_string(),
                required: "Yes".to_string(),
            }],
            responses: Vec::new(),
        });
        bundle.sections.push(SectionRecord {
            title: "Signals".to_string(),
            content: "Signals track usage".to_string(),
            links: vec![LinkRecord {
                text: "Guide".to_string(),
                url: "https://docs.paid.ai/guide".to_string(),
            }],
            source_url: Some("https://docs.paid.ai/api-reference/signals".to_string()),
        });
        bundle.scraped_at = Some(chrono::Utc::now());
        bundle
    }

    #[test]
    fn bundle_round_trips_through_json() {
        let bundle = sample_bundle();
        let encoded = serde_json::to_string_pretty(&bundle).unwrap();
        let decoded: DocumentBundle = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, bundle);
    }

    #[test]
    fn serialized_shape_uses_expected_keys() {
        let value = serde_json::to_value(sample_bundle()).unwrap();
        assert_eq!(value["endpoints"][0]["method"], "POST");
        assert_eq!(value["endpoints"][0]["parameters"][0]["type"], "string");
        assert_eq!(
            value["sections"][0]["source_url"],
            "https://docs.paid.ai/api-reference/signals"
        );
        assert!(value.get("authentication").is_none());
    }

    #[test]
    fn root_sections_omit_source_url() {
        let section = SectionRecord {
            title: "Intro".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(section).unwrap();
        assert!(value.get("source_url").is_none());
    }

    #[test]
    fn lenient_decoding_of_remote_endpoint() {
        let endpoint: EndpointRecord = serde_json::from_value(json!({
            "method": "get",
            "path": "/v1/orders",
            "parameters": [{"name": "limit", "required": false, "type": "integer"}],
            "extra": "ignored"
        }))
        .unwrap();
        assert_eq!(endpoint.method, Some(HttpMethod::Get));
        assert_eq!(endpoint.title, "");
        assert_eq!(endpoint.parameters[0].required, "false");
        assert_eq!(endpoint.parameters[0].description, "");
    }

    #[test]
    fn endpoint_with_null_title_and_mapped_responses() {
        let endpoint: EndpointRecord = serde_json::from_value(json!({
            "title": null,
            "path": "/v1/orders",
            "description": 42,
            "responses": {"200": {"description": "OK"}}
        }))
        .unwrap();
        assert_eq!(endpoint.title, "");
        assert_eq!(endpoint.description.as_deref(), Some("42"));
        assert_eq!(endpoint.responses, vec![json!({"200": {"description": "OK"}})]);
    }

    #[test]
    fn parameters_given_as_map() {
        let endpoint: EndpointRecord = serde_json::from_value(json!({
            "parameters": {
                "limit": {"type": "integer", "required": false},
                "cursor": "Opaque pagination cursor"
            }
        }))
        .unwrap();
        let mut params = endpoint.parameters;
        params.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(params[0].name, "cursor");
        assert_eq!(params[0].description, "Opaque pagination cursor");
        assert_eq!(params[1].name, "limit");
        assert_eq!(params[1].param_type, "integer");
        assert_eq!(params[1].required, "false");
    }

    #[test]
    fn bad_parameter_items_are_skipped() {
        let endpoint: EndpointRecord = serde_json::from_value(json!({
            "parameters": ["loose", {"name": "id"}, 7]
        }))
        .unwrap();
        assert_eq!(endpoint.parameters.len(), 1);
        assert_eq!(endpoint.parameters[0].name, "id");
    }

    #[test]
    fn section_links_as_strings() {
        let section: SectionRecord = serde_json::from_value(json!({
            "title": "Customers",
            "links": ["https://docs.paid.ai/customers", {"text": "Guide", "url": "https://docs.paid.ai/guide"}, null]
        }))
        .unwrap();
        assert_eq!(
            section.links,
            vec![
                LinkRecord {
                    text: String::new(),
                    url: "https://docs.paid.ai/customers".to_string(),
                },
                LinkRecord {
                    text: "Guide".to_string(),
                    url: "https://docs.paid.ai/guide".to_string(),
                },
            ]
        );
    }

    #[test]
    fn unknown_method_decodes_as_none() {
        let endpoint: EndpointRecord =
            serde_json::from_value(json!({"title": "x", "method": "OPTIONS"})).unwrap();
        assert_eq!(endpoint.method, None);
    }
}

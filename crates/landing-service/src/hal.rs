//! HAL document shaping.
//!
//! Minimal support for building `application/hal+json` response bodies: a
//! payload with a `_links` map where each relation holds one link or a list
//! of links.

use axum::{
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// A single HAL link.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Link {
    /// Target of the link.
    pub href: String,

    /// Optional secondary key for distinguishing links under one relation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Link {
    pub fn new<S>(href: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            href: href.into(),
            name: None,
        }
    }
}

impl From<&str> for Link {
    fn from(href: &str) -> Self {
        Link::new(href)
    }
}

impl From<String> for Link {
    fn from(href: String) -> Self {
        Link::new(href)
    }
}

/// The links under a single relation: either one link or several.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Links {
    Single(Link),
    Multiple(Vec<Link>),
}

impl Links {
    /// Append another link to the relation, flattening into a list.
    pub fn append(self, link: Link) -> Self {
        let links = match self {
            Links::Single(previous) => vec![previous, link],
            Links::Multiple(mut previous) => {
                previous.push(link);
                previous
            }
        };

        Links::Multiple(links)
    }
}

/// A HAL document: arbitrary payload data plus a `_links` map.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct HalDocument {
    #[serde(flatten)]
    pub data: Value,

    #[serde(rename = "_links", skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<String, Links>,
}

impl HalDocument {
    /// Create a new document with the given payload and no links.
    pub fn new(data: Value) -> Self {
        Self {
            data,
            links: BTreeMap::new(),
        }
    }

    /// Add a link under a relation, accumulating repeated relations into a
    /// list.
    pub fn with_link<N, L>(mut self, name: N, link: L) -> Self
    where
        N: Into<String>,
        L: Into<Link>,
    {
        let name = name.into();
        let link = link.into();

        let links = match self.links.remove(&name) {
            None => Links::Single(link),
            Some(links) => links.append(link),
        };

        self.links.insert(name, links);

        self
    }
}

impl IntoResponse for HalDocument {
    fn into_response(self) -> Response {
        let mut response = Json(self).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/hal+json"),
        );
        response
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_without_links() {
        let document = HalDocument::new(json!({"name": "landing-service"}));

        let serialized = serde_json::to_value(&document).unwrap();
        assert_eq!(serialized, json!({"name": "landing-service"}));
    }

    #[test]
    fn test_document_with_single_links() {
        let document = HalDocument::new(json!({"name": "landing-service"}))
            .with_link("self", "/")
            .with_link("whoami", "/whoami");

        let serialized = serde_json::to_value(&document).unwrap();
        assert_eq!(
            serialized,
            json!({
                "name": "landing-service",
                "_links": {
                    "self": {"href": "/"},
                    "whoami": {"href": "/whoami"}
                }
            })
        );
    }

    #[test]
    fn test_repeated_relation_becomes_list() {
        let document = HalDocument::new(json!({}))
            .with_link("item", "/items/1")
            .with_link("item", "/items/2")
            .with_link("item", "/items/3");

        let serialized = serde_json::to_value(&document).unwrap();
        assert_eq!(
            serialized,
            json!({
                "_links": {
                    "item": [
                        {"href": "/items/1"},
                        {"href": "/items/2"},
                        {"href": "/items/3"}
                    ]
                }
            })
        );
    }

    #[test]
    fn test_link_name_serialized_when_present() {
        let link = Link {
            href: "/docs".to_string(),
            name: Some("documentation".to_string()),
        };

        let serialized = serde_json::to_value(&link).unwrap();
        assert_eq!(
            serialized,
            json!({"href": "/docs", "name": "documentation"})
        );
    }

    #[test]
    fn test_append_to_multiple_preserves_order() {
        let links = Links::Multiple(vec![Link::new("/a"), Link::new("/c")]);
        let result = links.append(Link::new("/b"));

        assert_eq!(
            result,
            Links::Multiple(vec![Link::new("/a"), Link::new("/c"), Link::new("/b")])
        );
    }

    #[tokio::test]
    async fn test_into_response_sets_hal_content_type() {
        let document = HalDocument::new(json!({"name": "landing-service"})).with_link("self", "/");
        let response = document.into_response();

        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("application/hal+json")
        );
    }
}

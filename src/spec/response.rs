//! Response objects.

use indexmap::IndexMap;

use super::{Header, Link, MediaType, SchemaRef};

/// A single response, keyed by status code or range.
///
/// The `code` is an HTTP status, a range pattern like `2XX`, or `default`.
/// A description is required unless the response is a `$ref`.
///
/// See <https://spec.openapis.org/oas/v3.2.0#response-object>.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    /// The status code key this response was stored under.
    pub code: String,
    /// A `$ref` to a components response, when referenced.
    pub ref_path: Option<String>,
    /// A description of the response. REQUIRED unless `$ref`.
    pub description: Option<String>,
    /// A short summary (only meaningful alongside `$ref`).
    pub summary: Option<String>,
    /// Response headers, in document order (`Content-Type` entries are
    /// dropped on load).
    pub headers: Vec<Header>,
    /// The content map, in document order.
    pub content: Vec<MediaType>,
    /// Links, keyed by name.
    pub links: IndexMap<String, Link>,
    /// Specification extensions.
    pub extensions: IndexMap<String, serde_json::Value>,
}

impl Response {
    /// The primary response schema: the first content entry's schema.
    pub fn schema(&self) -> Option<&SchemaRef> {
        self.content.iter().find_map(|mt| mt.schema.as_ref())
    }
}

//! Media type and encoding objects.

use indexmap::IndexMap;

use super::{Any, Example, Header, SchemaRef};

/// A media type with its schema and encoding information.
///
/// See <https://spec.openapis.org/oas/v3.2.0#media-type-object>.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaType {
    /// The media range this entry was keyed by (e.g. `application/json`).
    pub name: String,
    /// The schema describing the content.
    pub schema: Option<SchemaRef>,
    /// Singular example; exclusive with `examples`.
    pub example: Option<Any>,
    /// Named examples; exclusive with `example`.
    pub examples: IndexMap<String, Example>,
    /// Per-property encoding for form/multipart bodies, in document order.
    pub encoding: Vec<Encoding>,
    /// Specification extensions.
    pub extensions: IndexMap<String, serde_json::Value>,
}

/// Serialization rules for one request body property.
///
/// See <https://spec.openapis.org/oas/v3.2.0#encoding-object>.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Encoding {
    /// The schema property this encoding applies to.
    pub name: String,
    /// The Content-Type for this part.
    pub content_type: Option<String>,
    /// Additional part headers (`Content-Type` is ignored here).
    pub headers: Vec<Header>,
    /// Parameter serialization style.
    pub style: Option<String>,
    /// Explode flag for the style.
    pub explode: Option<bool>,
    /// Pass reserved characters through unencoded.
    pub allow_reserved: Option<bool>,
    /// Specification extensions.
    pub extensions: IndexMap<String, serde_json::Value>,
}

//! Header objects.

use indexmap::IndexMap;

use super::{Any, Example, MediaType, SchemaRef};

/// A response or encoding header.
///
/// Follows the parameter structure minus `name`-in-object and `in`; the
/// name comes from the containing map key. Only `simple` style is legal.
///
/// See <https://spec.openapis.org/oas/v3.2.0#header-object>.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    /// The header name (from the map key).
    pub name: String,
    /// A description of the header.
    pub description: Option<String>,
    /// Whether the header is mandatory.
    pub required: Option<bool>,
    /// Deprecation flag.
    pub deprecated: Option<bool>,
    /// Explode flag (style is always `simple`).
    pub explode: Option<bool>,
    /// The schema describing the header value; exclusive with content.
    pub schema: Option<SchemaRef>,
    /// The single content media range, when content-typed.
    pub content_type: Option<String>,
    /// Content media types (exactly one entry when present).
    pub content_media_types: Vec<MediaType>,
    /// Singular example; exclusive with `examples`.
    pub example: Option<Any>,
    /// Named examples; exclusive with `example`.
    pub examples: IndexMap<String, Example>,
    /// Specification extensions.
    pub extensions: IndexMap<String, serde_json::Value>,
}

//! Request body objects.

use indexmap::IndexMap;

use super::{MediaType, SchemaRef};

/// A request body.
///
/// See <https://spec.openapis.org/oas/v3.2.0#request-body-object>.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestBody {
    /// A `$ref` to a components request body, when referenced.
    pub ref_path: Option<String>,
    /// A description of the body.
    pub description: Option<String>,
    /// Whether the body is required in requests.
    pub required: Option<bool>,
    /// The content map, in document order. REQUIRED when not a `$ref`.
    pub content: Vec<MediaType>,
    /// Specification extensions.
    pub extensions: IndexMap<String, serde_json::Value>,
}

impl RequestBody {
    /// The primary body schema: the first content entry's schema.
    pub fn schema(&self) -> Option<&SchemaRef> {
        self.content.iter().find_map(|mt| mt.schema.as_ref())
    }

    /// Media range names, in order.
    pub fn media_types(&self) -> Vec<&str> {
        self.content.iter().map(|mt| mt.name.as_str()).collect()
    }
}

//! Tag objects.

use indexmap::IndexMap;

use super::ExternalDoc;

/// Metadata for a single tag.
///
/// See <https://spec.openapis.org/oas/v3.2.0#tag-object>.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tag {
    /// The tag name. REQUIRED; unique across the document.
    pub name: String,
    /// A short summary.
    pub summary: Option<String>,
    /// A description for the tag.
    pub description: Option<String>,
    /// The name of a parent tag; the parent chain must be declared and
    /// acyclic.
    pub parent: Option<String>,
    /// A machine-readable kind (e.g. `nav`, `badge`).
    pub kind: Option<String>,
    /// Additional external documentation.
    pub external_docs: Option<ExternalDoc>,
    /// Specification extensions.
    pub extensions: IndexMap<String, serde_json::Value>,
}

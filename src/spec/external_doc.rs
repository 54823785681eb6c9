//! External documentation objects.

use indexmap::IndexMap;

/// A reference to external documentation.
///
/// See <https://spec.openapis.org/oas/v3.2.0#external-documentation-object>.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExternalDoc {
    /// The URL for the documentation. REQUIRED.
    pub url: String,
    /// A description of the target documentation.
    pub description: Option<String>,
    /// Specification extensions.
    pub extensions: IndexMap<String, serde_json::Value>,
}

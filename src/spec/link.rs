//! Link objects.

use indexmap::IndexMap;

use super::Server;

/// A design-time link to another operation.
///
/// See <https://spec.openapis.org/oas/v3.2.0#link-object>.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Link {
    /// A `$ref`-style URI to the target operation; exclusive with
    /// `operation_id`.
    pub operation_ref: Option<String>,
    /// The `operationId` of the target operation.
    pub operation_id: Option<String>,
    /// Parameter values or runtime expressions, keyed by parameter name.
    pub parameters: IndexMap<String, serde_json::Value>,
    /// A value or runtime expression for the target request body.
    pub request_body: Option<serde_json::Value>,
    /// A description of the link.
    pub description: Option<String>,
    /// A server object to be used by the target operation.
    pub server: Option<Server>,
    /// Specification extensions.
    pub extensions: IndexMap<String, serde_json::Value>,
}

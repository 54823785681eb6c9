//! The components container.

use indexmap::IndexMap;

use super::{
    Callback, Example, Header, Link, MediaType, Parameter, PathItem, RequestBody, Response,
    SecurityScheme,
};

/// Reusable objects for the rest of the document, all keyed by component
/// name in document order.
///
/// Schemas live on the [`Spec`](super::Spec) itself (`defined_schemas` and
/// `raw_schemas`) because the loader lowers them into an emit-ready shape;
/// every other component kind keeps its loaded object form here.
///
/// See <https://spec.openapis.org/oas/v3.2.0#components-object>.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Components {
    /// Reusable parameters.
    pub parameters: IndexMap<String, Parameter>,
    /// Reusable headers.
    pub headers: IndexMap<String, Header>,
    /// Reusable responses.
    pub responses: IndexMap<String, Response>,
    /// Reusable request bodies.
    pub request_bodies: IndexMap<String, RequestBody>,
    /// Reusable media types (OpenAPI 3.2).
    pub media_types: IndexMap<String, MediaType>,
    /// Reusable examples.
    pub examples: IndexMap<String, Example>,
    /// Reusable links.
    pub links: IndexMap<String, Link>,
    /// Reusable callbacks.
    pub callbacks: IndexMap<String, Callback>,
    /// Reusable path items.
    pub path_items: IndexMap<String, PathItem>,
    /// Security scheme definitions.
    pub security_schemes: IndexMap<String, SecurityScheme>,
    /// Extensions found directly on the components object.
    pub extensions: IndexMap<String, serde_json::Value>,
}

impl Components {
    /// `true` when nothing was declared.
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
            && self.headers.is_empty()
            && self.responses.is_empty()
            && self.request_bodies.is_empty()
            && self.media_types.is_empty()
            && self.examples.is_empty()
            && self.links.is_empty()
            && self.callbacks.is_empty()
            && self.path_items.is_empty()
            && self.security_schemes.is_empty()
            && self.extensions.is_empty()
    }
}

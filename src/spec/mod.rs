//! Structures used in parsing, navigating, and re-emitting OpenAPI
//! specifications.
//!
//! High-level structures include [`Spec`], [`Components`], [`SchemaRef`] &
//! [`StructFields`]. The model is pure data: the [`loader`](crate::loader)
//! materialises it, the [`writer`](crate::writer) serialises it, and the
//! [`codegen`](crate::codegen) module lowers it to C.

use indexmap::IndexMap;

mod any;
mod components;
mod error;
mod example;
mod external_doc;
mod header;
mod info;
mod link;
mod media_type;
mod operation;
mod parameter;
mod path_item;
mod r#ref;
mod registry;
mod request_body;
mod response;
mod schema;
mod security;
mod server;
mod struct_fields;
mod tag;

pub use self::{
    any::Any,
    components::Components,
    error::Error,
    example::Example,
    external_doc::ExternalDoc,
    header::Header,
    info::{Contact, Info, License},
    link::Link,
    media_type::{Encoding, MediaType},
    operation::{Operation, Verb},
    parameter::{ExampleLocation, Parameter, ParameterIn, ParameterStyle},
    path_item::{Callback, PathItem},
    r#ref::{resolve_ref, RefError, RefTarget, ResolvedRef},
    registry::DocumentRegistry,
    request_body::RequestBody,
    response::Response,
    schema::{Discriminator, MultipartField, SchemaRef, Xml, XmlNodeType},
    security::{OAuthFlow, OAuthFlows, SecurityRequirement, SecurityScheme, SecuritySchemeKind},
    server::{Server, ServerVariable},
    struct_fields::{CompositeKind, Field, StructFields},
    tag::Tag,
};

pub(crate) use self::r#ref::local_component_name;

/// Supported OpenAPI major versions.
const OPENAPI_SUPPORTED_MAJOR_VERSIONS: &[u64] = &[2, 3];

/// A complete, validated OpenAPI document (or a bare JSON Schema document).
///
/// Owns its whole tree; cross-document relationships go through a
/// [`DocumentRegistry`] which outlives any single `Spec`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spec {
    /// The `openapi` version string of the source document.
    pub openapi_version: Option<String>,

    /// The document's `$self` URI, authoritative for its base URI.
    pub self_uri: Option<String>,

    /// The URI this document was retrieved from, used as base when `$self`
    /// is absent.
    pub document_uri: Option<String>,

    /// The `jsonSchemaDialect` value, passed through.
    pub json_schema_dialect: Option<String>,

    /// Metadata about the API.
    pub info: Option<Info>,

    /// Additional external documentation.
    pub external_docs: Option<ExternalDoc>,

    /// Declared tags, in document order.
    pub tags: Vec<Tag>,

    /// Server objects, in document order.
    pub servers: Vec<Server>,

    /// Path items, in document order.
    pub paths: Vec<PathItem>,

    /// Webhooks; path items keyed by event name (stored in `route`).
    pub webhooks: Vec<PathItem>,

    /// Root security requirements.
    ///
    /// `None` means the field was absent; `Some(vec![])` is an explicit
    /// "no security"; an empty requirement map inside the list is a valid
    /// optional-auth marker and is preserved.
    pub security: Option<Vec<SecurityRequirement>>,

    /// Reusable component objects other than schemas.
    pub components: Components,

    /// Component schemas that lowered to a struct/enum/union shape,
    /// in document order.
    pub defined_schemas: IndexMap<String, StructFields>,

    /// Component schemas kept as verbatim JSON (scalars, boolean schemas,
    /// root arrays, and anything else that does not fit the composite mold).
    pub raw_schemas: IndexMap<String, serde_json::Value>,

    /// Names of `components/schemas` entries in their original document
    /// order, across both `defined_schemas` and `raw_schemas`. Promoted
    /// inline components are not listed here; the writer appends them.
    pub schema_order: Vec<String>,

    /// `$id` registrations: id URI to component schema name.
    pub schema_ids: IndexMap<String, String>,

    /// `$anchor` registrations: anchor name to component schema name.
    pub anchors: IndexMap<String, String>,

    /// `$dynamicAnchor` registrations: anchor name to component schema name.
    pub dynamic_anchors: IndexMap<String, String>,

    /// `true` when the document was a bare JSON Schema rather than an
    /// OpenAPI description; `schema_root_json` then holds the whole root.
    pub is_schema_document: bool,

    /// Verbatim root of a schema document.
    pub schema_root_json: Option<serde_json::Value>,

    /// Root-level specification extensions (`x-` keys), verbatim.
    pub extensions: IndexMap<String, serde_json::Value>,
}

impl Spec {
    /// Validates the `openapi` version field against the supported majors.
    pub fn validate_version(&self) -> Result<semver::Version, Error> {
        let Some(version) = self.openapi_version.as_deref() else {
            return Err(Error::NotOpenApi);
        };
        let sem_ver = lenient_version(version)?;
        if OPENAPI_SUPPORTED_MAJOR_VERSIONS.contains(&sem_ver.major) {
            Ok(sem_ver)
        } else {
            Err(Error::UnsupportedVersion(version.to_owned()))
        }
    }

    /// Returns the base URI for reference resolution: `$self` wins,
    /// otherwise the retrieval URI.
    pub fn base_uri(&self) -> Option<&str> {
        self.self_uri.as_deref().or(self.document_uri.as_deref())
    }

    /// Returns a reference to the operation with given `operation_id`, or
    /// `None` if not found.
    pub fn operation_by_id(&self, operation_id: &str) -> Option<&Operation> {
        self.operations()
            .find(|(_, op)| op.operation_id.as_deref() == Some(operation_id))
            .map(|(_, op)| op)
    }

    /// Iterates over all operations in paths and webhooks, with their routes.
    pub fn operations(&self) -> impl Iterator<Item = (&str, &Operation)> {
        self.paths
            .iter()
            .chain(self.webhooks.iter())
            .flat_map(|item| {
                item.operations
                    .iter()
                    .map(move |op| (item.route.as_str(), op))
            })
    }

    /// Looks up a defined component schema by name.
    pub fn defined_schema(&self, name: &str) -> Option<&StructFields> {
        self.defined_schemas.get(name)
    }
}

/// Parses a version string, tolerating the `"3.2"` two-segment form some
/// documents use.
fn lenient_version(version: &str) -> Result<semver::Version, Error> {
    match semver::Version::parse(version) {
        Ok(v) => Ok(v),
        Err(err) => {
            let padded = format!("{version}.0");
            semver::Version::parse(&padded).map_err(|_| Error::SemVer(err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_gate_accepts_major_2_and_3() {
        let mut spec = Spec {
            openapi_version: Some("3.2.0".to_owned()),
            ..Spec::default()
        };
        assert!(spec.validate_version().is_ok());

        spec.openapi_version = Some("3.1".to_owned());
        assert!(spec.validate_version().is_ok());

        spec.openapi_version = Some("4.0.0".to_owned());
        assert!(matches!(
            spec.validate_version(),
            Err(Error::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn base_uri_prefers_self() {
        let spec = Spec {
            self_uri: Some("https://api.example.com/openapi.json".to_owned()),
            document_uri: Some("file:///tmp/spec.json".to_owned()),
            ..Spec::default()
        };
        assert_eq!(spec.base_uri(), Some("https://api.example.com/openapi.json"));
    }
}

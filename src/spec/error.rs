//! Spec errors.

use derive_more::derive::{Display, Error};

use super::r#ref::RefError;

/// Validation and loading errors.
///
/// Every variant corresponds to an input-validation failure; the loader and
/// the writer's final checks both produce these.
#[derive(Debug, Display, Error)]
pub enum Error {
    /// Document is neither OpenAPI nor a schema document.
    #[display("document has neither `openapi` nor `swagger` and is not a schema document")]
    NotOpenApi,

    /// Version outside the supported majors.
    #[display("unsupported OpenAPI version: {_0}")]
    UnsupportedVersion(#[error(not(source))] String),

    /// Unparseable version string.
    #[display("semver error")]
    SemVer(semver::Error),

    /// A node was not the JSON type the spec requires.
    #[display("expected {expected} for `{object}`")]
    WrongType {
        /// The offending node, by JSON path or name.
        object: String,
        /// What was required.
        expected: &'static str,
    },

    /// A required field was absent.
    #[display("`{field}` is required in {object}")]
    MissingField {
        /// The missing key.
        field: &'static str,
        /// The containing object.
        object: String,
    },

    /// License object set both `identifier` and `url`.
    #[display("license must not set both `identifier` and `url`")]
    LicenseConflict,

    /// Server URL with `?` or `#`.
    #[display("server url must not contain a query or fragment: {_0}")]
    ServerUrlQueryFragment(#[error(not(source))] String),

    /// Duplicate server `name`.
    #[display("duplicate server name: {_0}")]
    DuplicateServerName(#[error(not(source))] String),

    /// A URL template variable without a matching declaration.
    #[display("server variable `{_0}` has no declaration with a default")]
    ServerVariableUndeclared(#[error(not(source))] String),

    /// Duplicate tag name.
    #[display("duplicate tag name: {_0}")]
    DuplicateTag(#[error(not(source))] String),

    /// Tag `parent` naming an unknown tag.
    #[display("tag parent `{_0}` is not a declared tag")]
    UnknownTagParent(#[error(not(source))] String),

    /// A cycle in the tag parent chain.
    #[display("tag parent chain contains a cycle at `{_0}`")]
    TagParentCycle(#[error(not(source))] String),

    /// A component key outside `[a-zA-Z0-9._-]`.
    #[display("invalid component key: {_0}")]
    InvalidComponentKey(#[error(not(source))] String),

    /// A route that does not start with `/`.
    #[display("path `{_0}` must start with '/'")]
    PathMissingSlash(#[error(not(source))] String),

    /// Sibling templates that differ only in variable names.
    #[display("path templates `{_0}` and `{_1}` differ only in variable names")]
    AmbiguousPathTemplates(
        #[error(not(source))] String,
        #[error(not(source))] String,
    ),

    /// A template variable without a required path parameter.
    #[display("path template variable `{{{var}}}` in `{route}` has no required path parameter")]
    MissingPathParameter {
        /// The route template.
        route: String,
        /// The unmatched variable.
        var: String,
    },

    /// A path parameter that is not `required: true`.
    #[display("path parameter `{_0}` must be required")]
    PathParameterNotRequired(#[error(not(source))] String),

    /// A `(name, in)` pair that appears twice after merging.
    #[display("duplicate parameter `{name}` in `{location}`")]
    DuplicateParameter {
        /// Parameter name.
        name: String,
        /// Parameter location keyword.
        location: String,
    },

    /// `querystring` alongside `query` parameters, or two `querystring`s.
    #[display("`querystring` parameters are exclusive with `query` parameters")]
    QuerystringConflict,

    /// Parameter missing `name` or `in`.
    #[display("parameter requires both `name` and `in`")]
    ParameterMissingNameOrIn,

    /// Unknown `in` keyword.
    #[display("unknown parameter location: {_0}")]
    UnknownParameterIn(#[error(not(source))] String),

    /// Unknown `style` keyword.
    #[display("unknown parameter style: {_0}")]
    UnknownStyle(#[error(not(source))] String),

    /// `allowEmptyValue` on a non-query parameter.
    #[display("`allowEmptyValue` is only valid on query parameters")]
    AllowEmptyValueNotQuery,

    /// A header declaring a style other than `simple`.
    #[display("header `{_0}` only supports `simple` style")]
    HeaderStyleNotSimple(#[error(not(source))] String),

    /// Both `schema` and `content` on a parameter or header.
    #[display("`{_0}` must not carry both `schema` and `content`")]
    SchemaContentConflict(#[error(not(source))] String),

    /// A parameter/header `content` with other than exactly one entry.
    #[display("`{_0}` content must hold exactly one media type")]
    ContentNotSingular(#[error(not(source))] String),

    /// Duplicate `operationId`.
    #[display("duplicate operationId: {_0}")]
    DuplicateOperationId(#[error(not(source))] String),

    /// Response key not matching `[1-5][0-9X][0-9X]` or `default`.
    #[display("invalid response code key: {_0}")]
    InvalidResponseCode(#[error(not(source))] String),

    /// A response without `$ref` or description.
    #[display("response `{_0}` requires a description")]
    ResponseMissingDescription(#[error(not(source))] String),

    /// An operation without a responses object.
    #[display("operation `{_0}` requires `responses`")]
    MissingResponses(#[error(not(source))] String),

    /// `example` next to `examples`.
    #[display("`example` and `examples` are mutually exclusive in {_0}")]
    ExampleConflict(#[error(not(source))] String),

    /// An example object with conflicting value fields.
    #[display("example `{_0}` sets mutually exclusive value fields")]
    ExampleValueConflict(#[error(not(source))] String),

    /// A standard HTTP method inside `additionalOperations`.
    #[display("standard HTTP method `{_0}` is not allowed in additionalOperations")]
    StandardMethodInAdditional(#[error(not(source))] String),

    /// An outermost `allOf` carrying a discriminator.
    #[display("`allOf` must not carry a discriminator at its outermost level")]
    AllOfWithDiscriminator,

    /// An `encoding` map without a sibling schema.
    #[display("media type `encoding` requires a sibling `schema`")]
    EncodingWithoutSchema,

    /// An `encoding` entry naming no schema property.
    #[display("encoding entry `{_0}` does not match a schema property")]
    EncodingUnknownProperty(#[error(not(source))] String),

    /// An unknown OAuth flow key.
    #[display("unknown OAuth flow kind: {_0}")]
    UnknownOAuthFlow(#[error(not(source))] String),

    /// A flow missing one of its required fields.
    #[display("OAuth flow `{flow}` requires `{field}`")]
    OAuthFlowMissingField {
        /// The flow kind key.
        flow: String,
        /// The missing field.
        field: &'static str,
    },

    /// An unknown security scheme `type`.
    #[display("unknown security scheme type: {_0}")]
    UnknownSecuritySchemeType(#[error(not(source))] String),

    /// A scheme missing one of its required fields.
    #[display("security scheme `{scheme}` requires `{field}`")]
    SecuritySchemeMissingField {
        /// The scheme type.
        scheme: String,
        /// The missing field.
        field: &'static str,
    },

    /// Reference error.
    #[display("reference error")]
    Ref(RefError),
}

impl From<semver::Error> for Error {
    fn from(err: semver::Error) -> Self {
        Error::SemVer(err)
    }
}

impl From<RefError> for Error {
    fn from(err: RefError) -> Self {
        Error::Ref(err)
    }
}

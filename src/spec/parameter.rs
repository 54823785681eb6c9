//! Parameter objects.

use indexmap::IndexMap;

use super::{Any, Error, Example, MediaType, SchemaRef};

/// Where a parameter is carried.
///
/// `querystring` describes the entire query string as one content-typed
/// value and is mutually exclusive with ordinary `query` parameters on the
/// same operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterIn {
    /// Part of the path template.
    Path,
    /// One query parameter.
    Query,
    /// The whole query string.
    Querystring,
    /// A request header.
    Header,
    /// A cookie.
    Cookie,
}

impl ParameterIn {
    /// The document keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            ParameterIn::Path => "path",
            ParameterIn::Query => "query",
            ParameterIn::Querystring => "querystring",
            ParameterIn::Header => "header",
            ParameterIn::Cookie => "cookie",
        }
    }

    /// Parses the document keyword.
    pub fn parse(s: &str) -> Result<Self, Error> {
        Ok(match s {
            "path" => ParameterIn::Path,
            "query" => ParameterIn::Query,
            "querystring" => ParameterIn::Querystring,
            "header" => ParameterIn::Header,
            "cookie" => ParameterIn::Cookie,
            other => return Err(Error::UnknownParameterIn(other.to_owned())),
        })
    }
}

/// Serialization style keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterStyle {
    /// `form` (query/cookie default).
    Form,
    /// `simple` (path/header default).
    Simple,
    /// `matrix`.
    Matrix,
    /// `label`.
    Label,
    /// `spaceDelimited`.
    SpaceDelimited,
    /// `pipeDelimited`.
    PipeDelimited,
    /// `deepObject`.
    DeepObject,
    /// `cookie` (OpenAPI 3.2 cookie rendering).
    Cookie,
}

impl ParameterStyle {
    /// The document keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            ParameterStyle::Form => "form",
            ParameterStyle::Simple => "simple",
            ParameterStyle::Matrix => "matrix",
            ParameterStyle::Label => "label",
            ParameterStyle::SpaceDelimited => "spaceDelimited",
            ParameterStyle::PipeDelimited => "pipeDelimited",
            ParameterStyle::DeepObject => "deepObject",
            ParameterStyle::Cookie => "cookie",
        }
    }

    /// Parses the document keyword.
    pub fn parse(s: &str) -> Result<Self, Error> {
        Ok(match s {
            "form" => ParameterStyle::Form,
            "simple" => ParameterStyle::Simple,
            "matrix" => ParameterStyle::Matrix,
            "label" => ParameterStyle::Label,
            "spaceDelimited" => ParameterStyle::SpaceDelimited,
            "pipeDelimited" => ParameterStyle::PipeDelimited,
            "deepObject" => ParameterStyle::DeepObject,
            "cookie" => ParameterStyle::Cookie,
            other => return Err(Error::UnknownStyle(other.to_owned())),
        })
    }

    /// The runtime expansion style this keyword selects.
    pub fn expansion(self) -> crate::url::Style {
        match self {
            ParameterStyle::Form => crate::url::Style::Form,
            ParameterStyle::Simple => crate::url::Style::Simple,
            ParameterStyle::Matrix => crate::url::Style::Matrix,
            ParameterStyle::Label => crate::url::Style::Label,
            ParameterStyle::SpaceDelimited => crate::url::Style::SpaceDelimited,
            ParameterStyle::PipeDelimited => crate::url::Style::PipeDelimited,
            ParameterStyle::DeepObject => crate::url::Style::DeepObject,
            ParameterStyle::Cookie => crate::url::Style::Cookie,
        }
    }
}

/// Where a parameter's examples were written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExampleLocation {
    /// Directly on the parameter/header object.
    #[default]
    Object,
    /// Inside the content media type.
    Media,
}

/// Describes a single operation parameter.
///
/// A unique parameter is defined by the combination of `name` and
/// `location`; path parameters are always required.
///
/// See <https://spec.openapis.org/oas/v3.2.0#parameter-object>.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// The parameter name. REQUIRED.
    pub name: String,
    /// The parameter location. REQUIRED.
    pub location: ParameterIn,
    /// A description.
    pub description: Option<String>,
    /// Whether the parameter is mandatory (always `true` for paths).
    pub required: Option<bool>,
    /// Deprecation flag.
    pub deprecated: Option<bool>,
    /// Allow empty values (query only).
    pub allow_empty_value: Option<bool>,
    /// Serialization style.
    pub style: Option<ParameterStyle>,
    /// Explode flag.
    pub explode: Option<bool>,
    /// Pass reserved characters through unencoded.
    pub allow_reserved: Option<bool>,
    /// The schema describing the value; exclusive with content.
    pub schema: Option<SchemaRef>,
    /// The single content media range, when content-typed.
    pub content_type: Option<String>,
    /// Content media types (exactly one entry when present).
    pub content_media_types: Vec<MediaType>,
    /// Singular example; exclusive with `examples`.
    pub example: Option<Any>,
    /// Named examples; exclusive with `example`.
    pub examples: IndexMap<String, Example>,
    /// Where the examples were declared.
    pub example_location: ExampleLocation,
    /// Specification extensions.
    pub extensions: IndexMap<String, serde_json::Value>,
}

impl Default for Parameter {
    fn default() -> Self {
        Self {
            name: String::new(),
            location: ParameterIn::Query,
            description: None,
            required: None,
            deprecated: None,
            allow_empty_value: None,
            style: None,
            explode: None,
            allow_reserved: None,
            schema: None,
            content_type: None,
            content_media_types: Vec::new(),
            example: None,
            examples: IndexMap::new(),
            example_location: ExampleLocation::default(),
            extensions: IndexMap::new(),
        }
    }
}

impl Parameter {
    /// Reserved header names that OpenAPI forbids describing as parameters;
    /// the loader silently drops these.
    pub fn is_reserved_header(&self) -> bool {
        self.location == ParameterIn::Header
            && ["accept", "content-type", "authorization"]
                .contains(&self.name.to_ascii_lowercase().as_str())
    }
}

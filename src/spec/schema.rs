//! The schema descriptor used at every schema position.

use indexmap::IndexMap;

use super::{Any, ExternalDoc};

/// How an XML schema node serializes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum XmlNodeType {
    /// Element node (the default).
    #[default]
    Element,
    /// Attribute node.
    Attribute,
    /// Text content.
    Text,
    /// CDATA section.
    Cdata,
    /// No node; children are inlined.
    None,
}

impl XmlNodeType {
    /// The keyword used in documents.
    pub fn as_str(self) -> &'static str {
        match self {
            XmlNodeType::Element => "element",
            XmlNodeType::Attribute => "attribute",
            XmlNodeType::Text => "text",
            XmlNodeType::Cdata => "cdata",
            XmlNodeType::None => "none",
        }
    }

    /// Parses the document keyword.
    pub fn from_str_opt(s: &str) -> Option<Self> {
        Some(match s {
            "element" => XmlNodeType::Element,
            "attribute" => XmlNodeType::Attribute,
            "text" => XmlNodeType::Text,
            "cdata" => XmlNodeType::Cdata,
            "none" => XmlNodeType::None,
            _ => return None,
        })
    }
}

/// XML serialization metadata for a schema.
///
/// See <https://spec.openapis.org/oas/v3.2.0#xml-object>.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Xml {
    /// Replaces the element/attribute name.
    pub name: Option<String>,
    /// Namespace URI.
    pub namespace: Option<String>,
    /// Namespace prefix.
    pub prefix: Option<String>,
    /// Node type, when stated.
    pub node_type: Option<XmlNodeType>,
    /// Legacy attribute flag.
    pub attribute: Option<bool>,
    /// Wraps array items in an enclosing element.
    pub wrapped: Option<bool>,
    /// Specification extensions.
    pub extensions: IndexMap<String, serde_json::Value>,
}

/// Discriminator for polymorphic composition.
///
/// See <https://spec.openapis.org/oas/v3.2.0#discriminator-object>.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Discriminator {
    /// The property whose value selects a variant.
    pub property_name: String,
    /// Explicit value-to-schema mapping, in document order.
    pub mapping: IndexMap<String, String>,
    /// Schema used when the property value matches no mapping entry.
    pub default_mapping: Option<String>,
    /// Specification extensions.
    pub extensions: IndexMap<String, serde_json::Value>,
}

/// One field of a multipart request body schema.
#[derive(Debug, Clone, PartialEq)]
pub struct MultipartField {
    /// Part name.
    pub name: String,
    /// Logical type of the part.
    pub ty: String,
    /// `true` for binary parts (`format: binary` strings).
    pub is_binary: bool,
}

/// The single polymorphic schema descriptor.
///
/// One structure covers every schema position: component definitions,
/// property schemas, `items`, parameter schemas, and request/response body
/// schemas. Exactly which fields are populated depends on the position; the
/// writer only emits fields that are set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaRef {
    /// `$ref` target, as written (URI or JSON pointer).
    pub ref_path: Option<String>,
    /// `true` when the reference was a `$dynamicRef`.
    pub ref_is_dynamic: bool,
    /// Resolved local component key, when the reference points into
    /// `components/schemas` of a registered document.
    pub ref_name: Option<String>,

    /// Primitive type for inline schemas
    /// (`string|integer|number|boolean|object|array|null`).
    pub inline_type: Option<String>,
    /// `true`/`false` schemas, which JSON Schema permits.
    pub boolean: Option<bool>,
    /// Ordered type union for `"type": [...]` forms.
    pub type_union: Vec<String>,

    /// `true` when this position is an array schema.
    pub is_array: bool,
    /// Item schema of an array, with the same descriptor shape.
    pub items: Option<Box<SchemaRef>>,

    /// `format` annotation.
    pub format: Option<String>,
    /// `contentMediaType` annotation.
    pub content_media_type: Option<String>,
    /// `contentEncoding` annotation.
    pub content_encoding: Option<String>,
    /// `contentSchema`, nested.
    pub content_schema: Option<Box<SchemaRef>>,

    /// `minimum` bound.
    pub minimum: Option<f64>,
    /// `maximum` bound.
    pub maximum: Option<f64>,
    /// Exclusive-minimum flag.
    pub exclusive_minimum: bool,
    /// Exclusive-maximum flag.
    pub exclusive_maximum: bool,
    /// `minLength`.
    pub min_length: Option<u64>,
    /// `maxLength`.
    pub max_length: Option<u64>,
    /// `pattern` (ECMA regex source).
    pub pattern: Option<String>,
    /// `minItems`.
    pub min_items: Option<u64>,
    /// `maxItems`.
    pub max_items: Option<u64>,
    /// `uniqueItems`.
    pub unique_items: Option<bool>,

    /// Ordered `enum` values.
    pub enum_values: Vec<Any>,
    /// `const` value.
    pub const_value: Option<Any>,
    /// `default` value.
    pub default: Option<Any>,

    /// `title` annotation.
    pub title: Option<String>,
    /// `summary` annotation.
    pub summary: Option<String>,
    /// `description` annotation.
    pub description: Option<String>,
    /// `deprecated` flag.
    pub deprecated: Option<bool>,
    /// `readOnly` flag.
    pub read_only: Option<bool>,
    /// `writeOnly` flag.
    pub write_only: Option<bool>,
    /// Singular `example`.
    pub example: Option<Any>,
    /// `examples` array.
    pub examples: Vec<Any>,

    /// Unknown keywords, preserved verbatim and merged back on write
    /// without overriding already-set keys.
    pub extra: Option<serde_json::Value>,

    /// Multipart body fields; when non-empty, the writer emits a
    /// `{type: object, properties: ...}` shape from these and ignores the
    /// rest of the schema content.
    pub multipart_fields: Vec<MultipartField>,

    /// `externalDocs` on the schema.
    pub external_docs: Option<ExternalDoc>,
    /// `discriminator` on the schema.
    pub discriminator: Option<Discriminator>,
    /// `xml` metadata.
    pub xml: Option<Xml>,
}

impl SchemaRef {
    /// A schema that is just a reference.
    pub fn reference(path: impl Into<String>) -> Self {
        Self {
            ref_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// A schema that is just an inline primitive type.
    pub fn inline(ty: impl Into<String>) -> Self {
        Self {
            inline_type: Some(ty.into()),
            ..Self::default()
        }
    }

    /// Whether the union (or the wider type shape) admits `null`.
    pub fn nullable(&self) -> bool {
        self.type_union.iter().any(|t| t == "null") || self.inline_type.as_deref() == Some("null")
    }

    /// `true` when no descriptor field is set at all; such positions write
    /// as the empty schema `{}`.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nullable_projects_from_type_union() {
        let mut schema = SchemaRef::inline("string");
        assert!(!schema.nullable());

        schema.type_union = vec!["string".to_owned(), "null".to_owned()];
        assert!(schema.nullable());
    }

    #[test]
    fn default_is_empty_schema() {
        assert!(SchemaRef::default().is_empty());
        assert!(!SchemaRef::inline("integer").is_empty());
    }
}
